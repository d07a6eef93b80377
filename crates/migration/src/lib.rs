//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_cliente;
mod m20240901_000002_create_domicilio;
mod m20240901_000003_create_factura;
mod m20240901_000004_create_usuario_registrado;
mod m20240901_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_cliente::Migration),
            Box::new(m20240901_000002_create_domicilio::Migration),
            Box::new(m20240901_000003_create_factura::Migration),
            Box::new(m20240901_000004_create_usuario_registrado::Migration),
            // Indexes should always be applied last
            Box::new(m20240901_000005_add_indexes::Migration),
        ]
    }
}
