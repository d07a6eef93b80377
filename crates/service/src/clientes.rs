use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::{Cliente, NuevoCliente};
use crate::dto::{ClienteDto, ListadoClientes};
use crate::errors::ServiceError;
use crate::identity::{Caller, ClientScope};
use crate::store::{RecordStore, StoreError};

/// Role-scoped query service over the Cliente collection.
pub struct ClienteService {
    store: Arc<dyn RecordStore>,
}

impl ClienteService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Staff roles see every Cliente; role Cliente resolves to its own row.
    #[instrument(skip(self, caller), fields(rol = %caller.rol, username = %caller.username))]
    pub async fn list_clientes(&self, caller: &Caller) -> Result<ListadoClientes, ServiceError> {
        match caller.rol.client_scope(caller.dni) {
            ClientScope::All => {
                let rows = self.store.list_clientes().await?;
                Ok(ListadoClientes::Todos(rows.iter().map(ClienteDto::from).collect()))
            }
            ClientScope::Own(dni) => {
                let row = self
                    .store
                    .find_cliente_by_dni(dni)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("cliente"))?;
                Ok(ListadoClientes::Propio(ClienteDto::from(&row)))
            }
            // An unparsable claim means the caller cannot be resolved to a
            // Cliente row; report the lookup failure, not an empty list
            ClientScope::Unresolvable => Err(ServiceError::not_found("cliente")),
        }
    }

    /// Resolve the caller's own Cliente with addresses and invoices eagerly
    /// attached. Any role may call this; the DNI claim is mandatory here.
    #[instrument(skip(self, caller), fields(rol = %caller.rol, username = %caller.username))]
    pub async fn own_profile(&self, caller: &Caller) -> Result<ClienteDto, ServiceError> {
        let dni = caller
            .dni
            .ok_or_else(|| ServiceError::Validation("DNI claim missing or invalid".into()))?;
        let (cliente, domicilios, facturas) = self
            .store
            .find_cliente_with_relations(dni)
            .await?
            .ok_or_else(|| ServiceError::not_found("cliente"))?;
        Ok(ClienteDto::with_relations(&cliente, &domicilios, &facturas))
    }

    #[instrument(skip(self, nuevo), fields(dni = nuevo.dni))]
    pub async fn create_cliente(&self, nuevo: NuevoCliente) -> Result<Cliente, ServiceError> {
        nuevo.validate()?;
        if self.store.find_cliente_by_dni(nuevo.dni).await?.is_some() {
            return Err(ServiceError::Conflict("a cliente with that DNI already exists".into()));
        }
        let created = self.store.insert_cliente(nuevo).await?;
        info!(dni = created.dni, numero_cliente = created.numero_cliente, "cliente_created");
        Ok(created)
    }

    /// Full replacement keyed by DNI. The DNI (and with it the business key)
    /// is immutable via this path: the submitted record must carry the same
    /// DNI as the path key.
    #[instrument(skip(self, record), fields(dni = key_dni))]
    pub async fn update_cliente(&self, key_dni: i32, record: Cliente) -> Result<(), ServiceError> {
        if key_dni != record.dni {
            return Err(ServiceError::Validation(
                "numero de cliente and DNI cannot change; resubmit the current values".into(),
            ));
        }
        match self.store.replace_cliente(record).await {
            Ok(()) => Ok(()),
            Err(StoreError::Conflict(msg)) => {
                // Concurrency race: if the row vanished report NotFound,
                // otherwise surface the conflict as fatal, never retry
                if self.store.find_cliente_by_dni(key_dni).await?.is_none() {
                    Err(ServiceError::not_found("cliente"))
                } else {
                    Err(ServiceError::Fatal(format!("concurrent modification: {}", msg)))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_cliente(&self, dni: i32) -> Result<(), ServiceError> {
        if !self.store.delete_cliente(dni).await? {
            return Err(ServiceError::not_found("cliente"));
        }
        info!(dni, "cliente_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Rol;
    use crate::store::memory::MemoryStore;
    use crate::test_support::{caller, nuevo_cliente};
    use std::sync::atomic::Ordering;

    fn service_with_store() -> (ClienteService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ClienteService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn duplicate_dni_is_rejected_without_mutation() {
        let (svc, store) = service_with_store();
        svc.create_cliente(nuevo_cliente(30111222, "Ana")).await.unwrap();

        let mut second = nuevo_cliente(30111222, "Otra");
        second.numero_cliente = 99;
        let err = svc.create_cliente(second).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // The stored record is untouched
        let stored = store.find_cliente_by_dni(30111222).await.unwrap().unwrap();
        assert_eq!(stored.nombre, "Ana");
    }

    #[tokio::test]
    async fn staff_roles_list_every_cliente() {
        let (svc, _) = service_with_store();
        svc.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();
        svc.create_cliente(nuevo_cliente(1002, "Luis")).await.unwrap();

        for rol in [Rol::Administracion, Rol::Manager, Rol::Tecnico] {
            let listado = svc.list_clientes(&caller("staff", rol, None)).await.unwrap();
            match listado {
                ListadoClientes::Todos(rows) => assert_eq!(rows.len(), 2),
                ListadoClientes::Propio(_) => panic!("staff must get the full listing"),
            }
        }
    }

    #[tokio::test]
    async fn cliente_role_sees_only_its_own_row() {
        let (svc, _) = service_with_store();
        svc.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();
        svc.create_cliente(nuevo_cliente(1002, "Luis")).await.unwrap();

        let listado = svc
            .list_clientes(&caller("ana", Rol::Cliente, Some(1001)))
            .await
            .unwrap();
        match listado {
            ListadoClientes::Propio(dto) => {
                assert_eq!(dto.dni, 1001);
                assert_eq!(dto.nombre, "Ana");
            }
            ListadoClientes::Todos(_) => panic!("cliente must get a single record"),
        }
    }

    #[tokio::test]
    async fn cliente_role_with_unknown_dni_gets_lookup_failure() {
        let (svc, _) = service_with_store();
        let err = svc
            .list_clientes(&caller("ghost", Rol::Cliente, Some(4040)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // Unparsable claim is the same lookup failure, not an empty list
        let err = svc
            .list_clientes(&caller("ghost", Rol::Cliente, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn own_profile_requires_dni_claim() {
        let (svc, _) = service_with_store();
        let err = svc
            .own_profile(&caller("staff", Rol::Administracion, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn own_profile_attaches_relations() {
        let (svc, store) = service_with_store();
        svc.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();
        store.seed_domicilio(
            1001,
            crate::domain::Domicilio {
                numero_medidor: 555,
                calle: "Av. Mitre".into(),
                numero: 120,
                piso: None,
                departamento: None,
            },
        );

        let dto = svc
            .own_profile(&caller("ana", Rol::Cliente, Some(1001)))
            .await
            .unwrap();
        assert_eq!(dto.nombre, "Ana");
        assert_eq!(dto.domicilios.as_ref().map(Vec::len), Some(1));
        // No invoices yet: the eager include still carries the empty list
        assert_eq!(dto.facturas.as_ref().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn update_with_mismatched_key_fails_and_leaves_store_unchanged() {
        let (svc, store) = service_with_store();
        let created = svc.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();

        let mut tampered = created.clone();
        tampered.dni = 9999;
        let err = svc.update_cliente(1001, tampered).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let stored = store.find_cliente_by_dni(1001).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn update_of_vanished_row_reports_not_found() {
        let (svc, _) = service_with_store();
        let ghost = Cliente {
            numero_cliente: 7,
            dni: 7777,
            nombre: "Nadie".into(),
            apellido: "X".into(),
            email: "n@x.com".into(),
        };
        let err = svc.update_cliente(7777, ghost).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn concurrency_conflict_on_existing_row_is_fatal() {
        let (svc, store) = service_with_store();
        let created = svc.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();

        store.conflict_on_replace.store(true, Ordering::SeqCst);
        let err = svc.update_cliente(1001, created).await.unwrap_err();
        assert!(matches!(err, ServiceError::Fatal(_)));
    }

    #[tokio::test]
    async fn deleting_absent_cliente_is_not_found() {
        let (svc, _) = service_with_store();
        let err = svc.delete_cliente(31415).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_lookup_is_gone() {
        let (svc, _) = service_with_store();
        svc.create_cliente(nuevo_cliente(1001, "Ana")).await.unwrap();
        svc.delete_cliente(1001).await.unwrap();
        let err = svc
            .list_clientes(&caller("ana", Rol::Cliente, Some(1001)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
