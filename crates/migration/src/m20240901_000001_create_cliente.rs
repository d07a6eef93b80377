//! Create `cliente` table.
//!
//! DNI and numero_cliente are business keys and must stay unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cliente::Table)
                    .if_not_exists()
                    .col(uuid(Cliente::Id).primary_key())
                    .col(integer(Cliente::NumeroCliente).unique_key().not_null())
                    .col(integer(Cliente::Dni).unique_key().not_null())
                    .col(string_len(Cliente::Nombre, 128).not_null())
                    .col(string_len(Cliente::Apellido, 128).not_null())
                    .col(string_len(Cliente::Email, 255).not_null())
                    .col(timestamp_with_time_zone(Cliente::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Cliente::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Cliente::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Cliente { Table, Id, NumeroCliente, Dni, Nombre, Apellido, Email, CreatedAt, UpdatedAt }
