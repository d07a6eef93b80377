use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domicilio, errors, factura};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cliente")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub numero_cliente: i32,
    pub dni: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Domicilio,
    Factura,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Domicilio => Entity::has_many(domicilio::Entity).into(),
            Relation::Factura => Entity::has_many(factura::Entity).into(),
        }
    }
}

impl Related<domicilio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Domicilio.def()
    }
}

impl Related<factura::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factura.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_nombre(nombre: &str) -> Result<(), errors::ModelError> {
    if nombre.trim().is_empty() {
        return Err(errors::ModelError::Validation("nombre required".into()));
    }
    Ok(())
}

pub fn validate_dni(dni: i32) -> Result<(), errors::ModelError> {
    if dni <= 0 {
        return Err(errors::ModelError::Validation("dni must be positive".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    numero_cliente: i32,
    dni: i32,
    nombre: &str,
    apellido: &str,
    email: &str,
) -> Result<Model, errors::ModelError> {
    validate_dni(dni)?;
    validate_nombre(nombre)?;
    validate_nombre(apellido)?;
    validate_email(email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        numero_cliente: Set(numero_cliente),
        dni: Set(dni),
        nombre: Set(nombre.to_string()),
        apellido: Set(apellido.to_string()),
        email: Set(email.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_dni(db: &DatabaseConnection, dni: i32) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Dni.eq(dni))
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
