use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::{Factura, FacturaConRelaciones, FacturaDraft, FacturaPatch};
use crate::errors::ServiceError;
use crate::identity::Caller;
use crate::store::RecordStore;

/// Invoice operations. Creation always bills the authenticated caller's
/// Cliente; listings come back with client and address eagerly attached.
pub struct FacturaService {
    store: Arc<dyn RecordStore>,
}

impl FacturaService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Persist a new invoice billed to the caller. A client reference in the
    /// draft is ignored and overwritten with the resolved caller's Cliente.
    #[instrument(skip(self, caller, draft), fields(username = %caller.username, numero_factura = draft.numero_factura))]
    pub async fn create_factura(
        &self,
        caller: &Caller,
        draft: FacturaDraft,
    ) -> Result<Factura, ServiceError> {
        let dni = caller
            .dni
            .ok_or_else(|| ServiceError::Unauthorized("caller has no resolvable DNI claim".into()))?;
        let cliente = self
            .store
            .find_cliente_by_dni(dni)
            .await?
            .ok_or_else(|| ServiceError::not_found("cliente"))?;
        self.store
            .find_domicilio_by_medidor(draft.numero_medidor)
            .await?
            .ok_or_else(|| ServiceError::not_found("domicilio"))?;

        let factura = Factura {
            numero_factura: draft.numero_factura,
            fecha_emision: draft.fecha_emision,
            fecha_vencimiento: draft.fecha_vencimiento,
            consumo_mensual: draft.consumo_mensual,
            consumo_total: draft.consumo_total,
        };
        let created = self
            .store
            .insert_factura(cliente.dni, draft.numero_medidor, factura)
            .await?;
        info!(numero_factura = created.numero_factura, dni = cliente.dni, "factura_created");
        Ok(created)
    }

    /// All invoices with relations attached, read-only.
    pub async fn list_facturas(&self) -> Result<Vec<FacturaConRelaciones>, ServiceError> {
        Ok(self.store.list_facturas().await?)
    }

    pub async fn get_factura(
        &self,
        numero_factura: i32,
    ) -> Result<FacturaConRelaciones, ServiceError> {
        self.store
            .find_factura(numero_factura)
            .await?
            .ok_or_else(|| ServiceError::not_found("factura"))
    }

    /// Invoices billed to the cliente with the given DNI. An empty result is
    /// reported as NotFound: this surface does not distinguish "no such key"
    /// from "key exists but has no invoices yet".
    pub async fn facturas_by_cliente_dni(
        &self,
        dni: i32,
    ) -> Result<Vec<FacturaConRelaciones>, ServiceError> {
        let rows = self.store.facturas_by_cliente_dni(dni).await?;
        if rows.is_empty() {
            return Err(ServiceError::NotFound(format!("no facturas for cliente DNI {}", dni)));
        }
        Ok(rows)
    }

    /// Invoices measured at the given meter; same empty-is-NotFound contract
    /// as the per-client listing.
    pub async fn facturas_by_numero_medidor(
        &self,
        numero_medidor: i32,
    ) -> Result<Vec<FacturaConRelaciones>, ServiceError> {
        let rows = self.store.facturas_by_numero_medidor(numero_medidor).await?;
        if rows.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "no facturas for numero_medidor {}",
                numero_medidor
            )));
        }
        Ok(rows)
    }

    /// Only the due date and the monthly consumption are mutable; every other
    /// stored field is preserved.
    #[instrument(skip(self, patch))]
    pub async fn update_factura(
        &self,
        numero_factura: i32,
        patch: FacturaPatch,
    ) -> Result<(), ServiceError> {
        if !self.store.update_factura(numero_factura, patch).await? {
            return Err(ServiceError::not_found("factura"));
        }
        info!(numero_factura, "factura_updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_factura(&self, numero_factura: i32) -> Result<(), ServiceError> {
        if !self.store.delete_factura(numero_factura).await? {
            return Err(ServiceError::not_found("factura"));
        }
        info!(numero_factura, "factura_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clientes::ClienteService;
    use crate::identity::Rol;
    use crate::store::memory::MemoryStore;
    use crate::test_support::{caller, factura_draft, nuevo_cliente, seed_domicilio};

    fn services() -> (ClienteService, FacturaService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            ClienteService::new(store.clone()),
            FacturaService::new(store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn create_requires_resolvable_dni_claim() {
        let (_, facturas, _) = services();
        let err = facturas
            .create_factura(&caller("anon", Rol::Cliente, None), factura_draft(1, 555))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn create_fails_when_caller_has_no_cliente_row() {
        let (_, facturas, _) = services();
        let err = facturas
            .create_factura(&caller("ghost", Rol::Cliente, Some(4040)), factura_draft(1, 555))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_overwrites_submitted_client_reference() {
        let (clientes, facturas, store) = services();
        clientes.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();
        clientes.create_cliente(nuevo_cliente(1002, "Luis")).await.unwrap();
        seed_domicilio(&store, 1001, 555);

        // The draft claims the invoice belongs to Luis; the store must record Ana
        let mut draft = factura_draft(42, 555);
        draft.cliente_dni = Some(1002);
        facturas
            .create_factura(&caller("ana", Rol::Cliente, Some(1001)), draft)
            .await
            .unwrap();

        let stored = facturas.get_factura(42).await.unwrap();
        assert_eq!(stored.cliente.dni, 1001);
        assert_eq!(stored.cliente.nombre, "Ana");
    }

    #[tokio::test]
    async fn get_absent_factura_is_not_found() {
        let (_, facturas, _) = services();
        let err = facturas.get_factura(31415).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn listings_attach_cliente_and_domicilio() {
        let (clientes, facturas, store) = services();
        clientes.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();
        seed_domicilio(&store, 1001, 555);
        facturas
            .create_factura(&caller("ana", Rol::Cliente, Some(1001)), factura_draft(1, 555))
            .await
            .unwrap();

        let all = facturas.list_facturas().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].cliente.dni, 1001);
        assert_eq!(all[0].domicilio.numero_medidor, 555);

        let by_dni = facturas.facturas_by_cliente_dni(1001).await.unwrap();
        assert_eq!(by_dni.len(), 1);
        let by_medidor = facturas.facturas_by_numero_medidor(555).await.unwrap();
        assert_eq!(by_medidor.len(), 1);
    }

    #[tokio::test]
    async fn empty_filtered_listing_is_not_found() {
        let (clientes, facturas, _) = services();
        // Cliente exists but has no invoices: documented behavior still 404s
        clientes.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();
        let err = facturas.facturas_by_cliente_dni(1001).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let err = facturas.facturas_by_numero_medidor(90210).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_touches_only_mutable_fields() {
        let (clientes, facturas, store) = services();
        clientes.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();
        seed_domicilio(&store, 1001, 555);
        let created = facturas
            .create_factura(&caller("ana", Rol::Cliente, Some(1001)), factura_draft(1, 555))
            .await
            .unwrap();

        let new_due = created.fecha_vencimiento + chrono::Duration::days(30);
        facturas
            .update_factura(1, FacturaPatch { fecha_vencimiento: new_due, consumo_mensual: 99.0 })
            .await
            .unwrap();

        let stored = facturas.get_factura(1).await.unwrap().factura;
        assert_eq!(stored.fecha_vencimiento, new_due);
        assert_eq!(stored.consumo_mensual, 99.0);
        // Preserved fields
        assert_eq!(stored.fecha_emision, created.fecha_emision);
        assert_eq!(stored.consumo_total, created.consumo_total);
    }

    #[tokio::test]
    async fn update_and_delete_absent_factura_are_not_found() {
        let (_, facturas, _) = services();
        let patch = FacturaPatch {
            fecha_vencimiento: chrono::Utc::now().fixed_offset(),
            consumo_mensual: 1.0,
        };
        assert!(matches!(
            facturas.update_factura(31415, patch).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            facturas.delete_factura(31415).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }
}
