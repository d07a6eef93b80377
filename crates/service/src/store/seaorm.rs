use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, Set,
};

use models::{cliente, domicilio, factura, usuario_registrado};

use crate::domain::{
    Cliente, Domicilio, Factura, FacturaConRelaciones, FacturaPatch, FotoPerfil, NuevoCliente,
    Usuario,
};
use crate::store::{RecordStore, StoreError};

/// SeaORM-backed implementation of the record store.
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: DbErr) -> StoreError {
    let msg = e.to_string();
    // Unique-key violations and write races are both concurrency-control
    // conflicts from the service's point of view
    if msg.contains("duplicate key value violates unique constraint")
        || matches!(e, DbErr::RecordNotUpdated)
    {
        StoreError::Conflict(msg)
    } else {
        StoreError::Db(msg)
    }
}

fn model_err(e: models::errors::ModelError) -> StoreError {
    match e {
        models::errors::ModelError::Db(msg)
            if msg.contains("duplicate key value violates unique constraint") =>
        {
            StoreError::Conflict(msg)
        }
        other => StoreError::Db(other.to_string()),
    }
}

impl From<cliente::Model> for Cliente {
    fn from(m: cliente::Model) -> Self {
        Self {
            numero_cliente: m.numero_cliente,
            dni: m.dni,
            nombre: m.nombre,
            apellido: m.apellido,
            email: m.email,
        }
    }
}

impl From<domicilio::Model> for Domicilio {
    fn from(m: domicilio::Model) -> Self {
        Self {
            numero_medidor: m.numero_medidor,
            calle: m.calle,
            numero: m.numero,
            piso: m.piso,
            departamento: m.departamento,
        }
    }
}

impl From<factura::Model> for Factura {
    fn from(m: factura::Model) -> Self {
        Self {
            numero_factura: m.numero_factura,
            fecha_emision: m.fecha_emision,
            fecha_vencimiento: m.fecha_vencimiento,
            consumo_mensual: m.consumo_mensual,
            consumo_total: m.consumo_total,
        }
    }
}

impl From<usuario_registrado::Model> for Usuario {
    fn from(m: usuario_registrado::Model) -> Self {
        Self {
            username: m.username,
            foto_perfil: m.foto_perfil,
            tipo_contenido_foto: m.tipo_contenido_foto,
        }
    }
}

impl SeaOrmStore {
    async fn attach(&self, row: factura::Model) -> Result<FacturaConRelaciones, StoreError> {
        let cli = cliente::Entity::find_by_id(row.cliente_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| StoreError::Db("dangling cliente reference".into()))?;
        let dom = domicilio::Entity::find_by_id(row.domicilio_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| StoreError::Db("dangling domicilio reference".into()))?;
        Ok(FacturaConRelaciones {
            factura: row.into(),
            cliente: cli.into(),
            domicilio: dom.into(),
        })
    }

    async fn attach_all(
        &self,
        rows: Vec<factura::Model>,
    ) -> Result<Vec<FacturaConRelaciones>, StoreError> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(self.attach(row).await?);
        }
        Ok(out)
    }
}

#[async_trait]
impl RecordStore for SeaOrmStore {
    async fn list_clientes(&self) -> Result<Vec<Cliente>, StoreError> {
        let rows = cliente::Entity::find().all(&self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Cliente::from).collect())
    }

    async fn find_cliente_by_dni(&self, dni: i32) -> Result<Option<Cliente>, StoreError> {
        let row = cliente::find_by_dni(&self.db, dni).await.map_err(model_err)?;
        Ok(row.map(Cliente::from))
    }

    async fn find_cliente_with_relations(
        &self,
        dni: i32,
    ) -> Result<Option<(Cliente, Vec<Domicilio>, Vec<Factura>)>, StoreError> {
        let Some(row) = cliente::find_by_dni(&self.db, dni).await.map_err(model_err)? else {
            return Ok(None);
        };
        let domicilios = row
            .find_related(domicilio::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let facturas = row
            .find_related(factura::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(Some((
            row.into(),
            domicilios.into_iter().map(Domicilio::from).collect(),
            facturas.into_iter().map(Factura::from).collect(),
        )))
    }

    async fn insert_cliente(&self, nuevo: NuevoCliente) -> Result<Cliente, StoreError> {
        let created = cliente::create(
            &self.db,
            nuevo.numero_cliente,
            nuevo.dni,
            &nuevo.nombre,
            &nuevo.apellido,
            &nuevo.email,
        )
        .await
        .map_err(model_err)?;
        Ok(created.into())
    }

    async fn replace_cliente(&self, record: Cliente) -> Result<(), StoreError> {
        let Some(row) = cliente::find_by_dni(&self.db, record.dni).await.map_err(model_err)?
        else {
            return Err(StoreError::Conflict("row vanished during update".into()));
        };
        let mut am: cliente::ActiveModel = row.into();
        am.numero_cliente = Set(record.numero_cliente);
        am.nombre = Set(record.nombre);
        am.apellido = Set(record.apellido);
        am.email = Set(record.email);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete_cliente(&self, dni: i32) -> Result<bool, StoreError> {
        let res = cliente::Entity::delete_many()
            .filter(cliente::Column::Dni.eq(dni))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn list_facturas(&self) -> Result<Vec<FacturaConRelaciones>, StoreError> {
        let rows = factura::Entity::find().all(&self.db).await.map_err(db_err)?;
        self.attach_all(rows).await
    }

    async fn find_factura(
        &self,
        numero_factura: i32,
    ) -> Result<Option<FacturaConRelaciones>, StoreError> {
        let Some(row) = factura::find_by_numero(&self.db, numero_factura)
            .await
            .map_err(model_err)?
        else {
            return Ok(None);
        };
        Ok(Some(self.attach(row).await?))
    }

    async fn facturas_by_cliente_dni(
        &self,
        dni: i32,
    ) -> Result<Vec<FacturaConRelaciones>, StoreError> {
        let Some(cli) = cliente::find_by_dni(&self.db, dni).await.map_err(model_err)? else {
            return Ok(Vec::new());
        };
        let rows = factura::Entity::find()
            .filter(factura::Column::ClienteId.eq(cli.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.attach_all(rows).await
    }

    async fn facturas_by_numero_medidor(
        &self,
        numero_medidor: i32,
    ) -> Result<Vec<FacturaConRelaciones>, StoreError> {
        let Some(dom) = domicilio::find_by_numero_medidor(&self.db, numero_medidor)
            .await
            .map_err(model_err)?
        else {
            return Ok(Vec::new());
        };
        let rows = factura::Entity::find()
            .filter(factura::Column::DomicilioId.eq(dom.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.attach_all(rows).await
    }

    async fn find_domicilio_by_medidor(
        &self,
        numero_medidor: i32,
    ) -> Result<Option<Domicilio>, StoreError> {
        let row = domicilio::find_by_numero_medidor(&self.db, numero_medidor)
            .await
            .map_err(model_err)?;
        Ok(row.map(Domicilio::from))
    }

    async fn insert_factura(
        &self,
        cliente_dni: i32,
        numero_medidor: i32,
        factura_in: Factura,
    ) -> Result<Factura, StoreError> {
        let cli = cliente::find_by_dni(&self.db, cliente_dni)
            .await
            .map_err(model_err)?
            .ok_or_else(|| StoreError::Db("cliente vanished before insert".into()))?;
        let dom = domicilio::find_by_numero_medidor(&self.db, numero_medidor)
            .await
            .map_err(model_err)?
            .ok_or_else(|| StoreError::Db("domicilio vanished before insert".into()))?;
        let created = factura::create(
            &self.db,
            factura_in.numero_factura,
            factura_in.fecha_emision,
            factura_in.fecha_vencimiento,
            factura_in.consumo_mensual,
            factura_in.consumo_total,
            cli.id,
            dom.id,
        )
        .await
        .map_err(model_err)?;
        Ok(created.into())
    }

    async fn update_factura(
        &self,
        numero_factura: i32,
        patch: FacturaPatch,
    ) -> Result<bool, StoreError> {
        let Some(row) = factura::find_by_numero(&self.db, numero_factura)
            .await
            .map_err(model_err)?
        else {
            return Ok(false);
        };
        let mut am: factura::ActiveModel = row.into();
        am.fecha_vencimiento = Set(patch.fecha_vencimiento);
        am.consumo_mensual = Set(patch.consumo_mensual);
        am.update(&self.db).await.map_err(db_err)?;
        Ok(true)
    }

    async fn delete_factura(&self, numero_factura: i32) -> Result<bool, StoreError> {
        let res = factura::Entity::delete_many()
            .filter(factura::Column::NumeroFactura.eq(numero_factura))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn find_usuario(&self, username: &str) -> Result<Option<Usuario>, StoreError> {
        let row = usuario_registrado::find_by_username(&self.db, username)
            .await
            .map_err(model_err)?;
        Ok(row.map(Usuario::from))
    }

    async fn store_foto(&self, username: &str, foto: FotoPerfil) -> Result<(), StoreError> {
        let row = usuario_registrado::find_by_username(&self.db, username)
            .await
            .map_err(model_err)?
            .ok_or_else(|| StoreError::Db(format!("usuario {} not found", username)))?;
        usuario_registrado::set_foto(&self.db, row.id, foto.bytes, &foto.content_type)
            .await
            .map_err(model_err)?;
        Ok(())
    }
}
