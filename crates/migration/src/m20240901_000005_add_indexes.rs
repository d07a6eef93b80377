use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Domicilio: index on cliente_id for the eager-include traversal
        manager
            .create_index(
                Index::create()
                    .name("idx_domicilio_cliente")
                    .table(Domicilio::Table)
                    .col(Domicilio::ClienteId)
                    .to_owned(),
            )
            .await?;

        // Factura: index on cliente_id for per-client invoice listings
        manager
            .create_index(
                Index::create()
                    .name("idx_factura_cliente")
                    .table(Factura::Table)
                    .col(Factura::ClienteId)
                    .to_owned(),
            )
            .await?;

        // Factura: index on domicilio_id for per-meter invoice listings
        manager
            .create_index(
                Index::create()
                    .name("idx_factura_domicilio")
                    .table(Factura::Table)
                    .col(Factura::DomicilioId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_domicilio_cliente").table(Domicilio::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_factura_cliente").table(Factura::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_factura_domicilio").table(Factura::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Domicilio { Table, ClienteId }

#[derive(DeriveIden)]
enum Factura { Table, ClienteId, DomicilioId }
