//! Create `usuario_registrado` table.
//!
//! The profile photo is stored inline as a byte blob with a companion
//! content-type column; both are nullable and always set or cleared together.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsuarioRegistrado::Table)
                    .if_not_exists()
                    .col(uuid(UsuarioRegistrado::Id).primary_key())
                    .col(string_len(UsuarioRegistrado::Username, 128).unique_key().not_null())
                    .col(
                        ColumnDef::new(UsuarioRegistrado::FotoPerfil)
                            .binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UsuarioRegistrado::TipoContenidoFoto)
                            .string_len(64)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(UsuarioRegistrado::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(UsuarioRegistrado::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsuarioRegistrado::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UsuarioRegistrado { Table, Id, Username, FotoPerfil, TipoContenidoFoto, CreatedAt, UpdatedAt }
