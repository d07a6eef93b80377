use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{cliente, domicilio, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "factura")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub numero_factura: i32,
    pub fecha_emision: DateTimeWithTimeZone,
    pub fecha_vencimiento: DateTimeWithTimeZone,
    pub consumo_mensual: f64,
    pub consumo_total: f64,
    pub cliente_id: Uuid,
    pub domicilio_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Cliente,
    Domicilio,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Cliente => Entity::belongs_to(cliente::Entity)
                .from(Column::ClienteId)
                .to(cliente::Column::Id)
                .into(),
            Relation::Domicilio => Entity::belongs_to(domicilio::Entity)
                .from(Column::DomicilioId)
                .to(domicilio::Column::Id)
                .into(),
        }
    }
}

impl Related<cliente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl Related<domicilio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Domicilio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    numero_factura: i32,
    fecha_emision: DateTimeWithTimeZone,
    fecha_vencimiento: DateTimeWithTimeZone,
    consumo_mensual: f64,
    consumo_total: f64,
    cliente_id: Uuid,
    domicilio_id: Uuid,
) -> Result<Model, errors::ModelError> {
    if consumo_mensual < 0.0 || consumo_total < 0.0 {
        return Err(errors::ModelError::Validation("consumo must not be negative".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        numero_factura: Set(numero_factura),
        fecha_emision: Set(fecha_emision),
        fecha_vencimiento: Set(fecha_vencimiento),
        consumo_mensual: Set(consumo_mensual),
        consumo_total: Set(consumo_total),
        cliente_id: Set(cliente_id),
        domicilio_id: Set(domicilio_id),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_numero(
    db: &DatabaseConnection,
    numero_factura: i32,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::NumeroFactura.eq(numero_factura))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
