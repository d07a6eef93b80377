//! Create `domicilio` table with FK to `cliente`.
//!
//! A domicilio never exists without its owning cliente.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Domicilio::Table)
                    .if_not_exists()
                    .col(uuid(Domicilio::Id).primary_key())
                    .col(uuid(Domicilio::ClienteId).not_null())
                    .col(integer(Domicilio::NumeroMedidor).unique_key().not_null())
                    .col(string_len(Domicilio::Calle, 255).not_null())
                    .col(integer(Domicilio::Numero).not_null())
                    .col(
                        ColumnDef::new(Domicilio::Piso)
                            .string_len(16)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Domicilio::Departamento)
                            .string_len(16)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_domicilio_cliente")
                            .from(Domicilio::Table, Domicilio::ClienteId)
                            .to(Cliente::Table, Cliente::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Domicilio::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Domicilio { Table, Id, ClienteId, NumeroMedidor, Calle, Numero, Piso, Departamento }

#[derive(DeriveIden)]
enum Cliente { Table, Id }
