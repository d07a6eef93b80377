use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{cliente, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "domicilio")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub numero_medidor: i32,
    pub calle: String,
    pub numero: i32,
    pub piso: Option<String>,
    pub departamento: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Cliente,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Cliente => Entity::belongs_to(cliente::Entity)
                .from(Column::ClienteId)
                .to(cliente::Column::Id)
                .into(),
        }
    }
}

impl Related<cliente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    cliente_id: Uuid,
    numero_medidor: i32,
    calle: &str,
    numero: i32,
    piso: Option<&str>,
    departamento: Option<&str>,
) -> Result<Model, errors::ModelError> {
    if calle.trim().is_empty() {
        return Err(errors::ModelError::Validation("calle required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        cliente_id: Set(cliente_id),
        numero_medidor: Set(numero_medidor),
        calle: Set(calle.to_string()),
        numero: Set(numero),
        piso: Set(piso.map(|s| s.to_string())),
        departamento: Set(departamento.map(|s| s.to_string())),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_numero_medidor(
    db: &DatabaseConnection,
    numero_medidor: i32,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::NumeroMedidor.eq(numero_medidor))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
