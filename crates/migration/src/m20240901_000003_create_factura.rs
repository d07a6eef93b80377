//! Create `factura` table with FKs to `cliente` and `domicilio`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Factura::Table)
                    .if_not_exists()
                    .col(uuid(Factura::Id).primary_key())
                    .col(integer(Factura::NumeroFactura).unique_key().not_null())
                    .col(timestamp_with_time_zone(Factura::FechaEmision).not_null())
                    .col(timestamp_with_time_zone(Factura::FechaVencimiento).not_null())
                    .col(double(Factura::ConsumoMensual).not_null())
                    .col(double(Factura::ConsumoTotal).not_null())
                    .col(uuid(Factura::ClienteId).not_null())
                    .col(uuid(Factura::DomicilioId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_factura_cliente")
                            .from(Factura::Table, Factura::ClienteId)
                            .to(Cliente::Table, Cliente::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_factura_domicilio")
                            .from(Factura::Table, Factura::DomicilioId)
                            .to(Domicilio::Table, Domicilio::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Factura::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Factura { Table, Id, NumeroFactura, FechaEmision, FechaVencimiento, ConsumoMensual, ConsumoTotal, ClienteId, DomicilioId }

#[derive(DeriveIden)]
enum Cliente { Table, Id }

#[derive(DeriveIden)]
enum Domicilio { Table, Id }
