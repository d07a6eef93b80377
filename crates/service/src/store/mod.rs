use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Cliente, Domicilio, Factura, FacturaConRelaciones, FacturaPatch, FotoPerfil, NuevoCliente,
    Usuario,
};

pub mod seaorm;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness violation or concurrent-modification race.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

/// Abstract CRUD + relational-include operations over the three entity
/// collections. Services depend on this trait only, never on the engine.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_clientes(&self) -> Result<Vec<Cliente>, StoreError>;
    async fn find_cliente_by_dni(&self, dni: i32) -> Result<Option<Cliente>, StoreError>;
    /// Eager include: the cliente row plus its domicilios and facturas.
    async fn find_cliente_with_relations(
        &self,
        dni: i32,
    ) -> Result<Option<(Cliente, Vec<Domicilio>, Vec<Factura>)>, StoreError>;
    async fn insert_cliente(&self, nuevo: NuevoCliente) -> Result<Cliente, StoreError>;
    /// Full replacement keyed by DNI. A concurrent-modification race (or a
    /// row that vanished underneath the writer) surfaces as `Conflict`; the
    /// caller decides whether that means NotFound or a fatal error.
    async fn replace_cliente(&self, record: Cliente) -> Result<(), StoreError>;
    /// Returns false when no row matched the DNI.
    async fn delete_cliente(&self, dni: i32) -> Result<bool, StoreError>;

    async fn list_facturas(&self) -> Result<Vec<FacturaConRelaciones>, StoreError>;
    async fn find_factura(&self, numero_factura: i32)
        -> Result<Option<FacturaConRelaciones>, StoreError>;
    async fn facturas_by_cliente_dni(
        &self,
        dni: i32,
    ) -> Result<Vec<FacturaConRelaciones>, StoreError>;
    async fn facturas_by_numero_medidor(
        &self,
        numero_medidor: i32,
    ) -> Result<Vec<FacturaConRelaciones>, StoreError>;
    async fn find_domicilio_by_medidor(
        &self,
        numero_medidor: i32,
    ) -> Result<Option<Domicilio>, StoreError>;
    /// Persist an invoice billed to the given cliente at the given meter.
    async fn insert_factura(
        &self,
        cliente_dni: i32,
        numero_medidor: i32,
        factura: Factura,
    ) -> Result<Factura, StoreError>;
    /// Applies the mutable subset; returns false when no row matched.
    async fn update_factura(
        &self,
        numero_factura: i32,
        patch: FacturaPatch,
    ) -> Result<bool, StoreError>;
    async fn delete_factura(&self, numero_factura: i32) -> Result<bool, StoreError>;

    async fn find_usuario(&self, username: &str) -> Result<Option<Usuario>, StoreError>;
    /// Replace the stored photo payload and its content-type tag together.
    async fn store_foto(&self, username: &str, foto: FotoPerfil) -> Result<(), StoreError>;
}

/// In-memory store for tests and doc examples.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        clientes: Mutex<HashMap<i32, Cliente>>, // key: dni
        domicilios: Mutex<HashMap<i32, (Domicilio, i32)>>, // key: numero_medidor, value carries owner dni
        facturas: Mutex<HashMap<i32, (Factura, i32, i32)>>, // key: numero_factura, owner dni, medidor
        usuarios: Mutex<HashMap<String, Usuario>>, // key: username
        /// Test hook: force the next replace to report a concurrency race.
        pub conflict_on_replace: AtomicBool,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed_domicilio(&self, owner_dni: i32, domicilio: Domicilio) {
            self.domicilios
                .lock()
                .unwrap()
                .insert(domicilio.numero_medidor, (domicilio, owner_dni));
        }

        pub fn seed_usuario(&self, usuario: Usuario) {
            self.usuarios
                .lock()
                .unwrap()
                .insert(usuario.username.clone(), usuario);
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn list_clientes(&self) -> Result<Vec<Cliente>, StoreError> {
            let mut rows: Vec<Cliente> = self.clientes.lock().unwrap().values().cloned().collect();
            rows.sort_by_key(|c| c.numero_cliente);
            Ok(rows)
        }

        async fn find_cliente_by_dni(&self, dni: i32) -> Result<Option<Cliente>, StoreError> {
            Ok(self.clientes.lock().unwrap().get(&dni).cloned())
        }

        async fn find_cliente_with_relations(
            &self,
            dni: i32,
        ) -> Result<Option<(Cliente, Vec<Domicilio>, Vec<Factura>)>, StoreError> {
            let Some(cliente) = self.clientes.lock().unwrap().get(&dni).cloned() else {
                return Ok(None);
            };
            let domicilios = self
                .domicilios
                .lock()
                .unwrap()
                .values()
                .filter(|(_, owner)| *owner == dni)
                .map(|(d, _)| d.clone())
                .collect();
            let facturas = self
                .facturas
                .lock()
                .unwrap()
                .values()
                .filter(|(_, owner, _)| *owner == dni)
                .map(|(f, _, _)| f.clone())
                .collect();
            Ok(Some((cliente, domicilios, facturas)))
        }

        async fn insert_cliente(&self, nuevo: NuevoCliente) -> Result<Cliente, StoreError> {
            let mut clientes = self.clientes.lock().unwrap();
            if clientes.contains_key(&nuevo.dni) {
                return Err(StoreError::Conflict("dni already registered".into()));
            }
            let cliente = Cliente {
                numero_cliente: nuevo.numero_cliente,
                dni: nuevo.dni,
                nombre: nuevo.nombre,
                apellido: nuevo.apellido,
                email: nuevo.email,
            };
            clientes.insert(cliente.dni, cliente.clone());
            Ok(cliente)
        }

        async fn replace_cliente(&self, record: Cliente) -> Result<(), StoreError> {
            if self.conflict_on_replace.load(Ordering::SeqCst) {
                return Err(StoreError::Conflict("concurrent modification".into()));
            }
            let mut clientes = self.clientes.lock().unwrap();
            if !clientes.contains_key(&record.dni) {
                return Err(StoreError::Conflict("row vanished during update".into()));
            }
            clientes.insert(record.dni, record);
            Ok(())
        }

        async fn delete_cliente(&self, dni: i32) -> Result<bool, StoreError> {
            Ok(self.clientes.lock().unwrap().remove(&dni).is_some())
        }

        async fn list_facturas(&self) -> Result<Vec<FacturaConRelaciones>, StoreError> {
            let facturas = self.facturas.lock().unwrap();
            let mut out = Vec::with_capacity(facturas.len());
            for (f, owner, medidor) in facturas.values() {
                out.push(self.attach(f, *owner, *medidor)?);
            }
            out.sort_by_key(|fc| fc.factura.numero_factura);
            Ok(out)
        }

        async fn find_factura(
            &self,
            numero_factura: i32,
        ) -> Result<Option<FacturaConRelaciones>, StoreError> {
            let row = self.facturas.lock().unwrap().get(&numero_factura).cloned();
            match row {
                Some((f, owner, medidor)) => Ok(Some(self.attach(&f, owner, medidor)?)),
                None => Ok(None),
            }
        }

        async fn facturas_by_cliente_dni(
            &self,
            dni: i32,
        ) -> Result<Vec<FacturaConRelaciones>, StoreError> {
            let rows: Vec<(Factura, i32, i32)> = self
                .facturas
                .lock()
                .unwrap()
                .values()
                .filter(|(_, owner, _)| *owner == dni)
                .cloned()
                .collect();
            rows.iter().map(|(f, o, m)| self.attach(f, *o, *m)).collect()
        }

        async fn facturas_by_numero_medidor(
            &self,
            numero_medidor: i32,
        ) -> Result<Vec<FacturaConRelaciones>, StoreError> {
            let rows: Vec<(Factura, i32, i32)> = self
                .facturas
                .lock()
                .unwrap()
                .values()
                .filter(|(_, _, medidor)| *medidor == numero_medidor)
                .cloned()
                .collect();
            rows.iter().map(|(f, o, m)| self.attach(f, *o, *m)).collect()
        }

        async fn find_domicilio_by_medidor(
            &self,
            numero_medidor: i32,
        ) -> Result<Option<Domicilio>, StoreError> {
            Ok(self
                .domicilios
                .lock()
                .unwrap()
                .get(&numero_medidor)
                .map(|(d, _)| d.clone()))
        }

        async fn insert_factura(
            &self,
            cliente_dni: i32,
            numero_medidor: i32,
            factura: Factura,
        ) -> Result<Factura, StoreError> {
            let mut facturas = self.facturas.lock().unwrap();
            if facturas.contains_key(&factura.numero_factura) {
                return Err(StoreError::Conflict("numero_factura already exists".into()));
            }
            facturas.insert(
                factura.numero_factura,
                (factura.clone(), cliente_dni, numero_medidor),
            );
            Ok(factura)
        }

        async fn update_factura(
            &self,
            numero_factura: i32,
            patch: FacturaPatch,
        ) -> Result<bool, StoreError> {
            let mut facturas = self.facturas.lock().unwrap();
            match facturas.get_mut(&numero_factura) {
                Some((f, _, _)) => {
                    f.fecha_vencimiento = patch.fecha_vencimiento;
                    f.consumo_mensual = patch.consumo_mensual;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete_factura(&self, numero_factura: i32) -> Result<bool, StoreError> {
            Ok(self.facturas.lock().unwrap().remove(&numero_factura).is_some())
        }

        async fn find_usuario(&self, username: &str) -> Result<Option<Usuario>, StoreError> {
            Ok(self.usuarios.lock().unwrap().get(username).cloned())
        }

        async fn store_foto(&self, username: &str, foto: FotoPerfil) -> Result<(), StoreError> {
            let mut usuarios = self.usuarios.lock().unwrap();
            let Some(u) = usuarios.get_mut(username) else {
                return Err(StoreError::Db(format!("usuario {} not found", username)));
            };
            u.foto_perfil = Some(foto.bytes);
            u.tipo_contenido_foto = Some(foto.content_type);
            Ok(())
        }
    }

    impl MemoryStore {
        fn attach(
            &self,
            factura: &Factura,
            owner_dni: i32,
            numero_medidor: i32,
        ) -> Result<FacturaConRelaciones, StoreError> {
            let cliente = self
                .clientes
                .lock()
                .unwrap()
                .get(&owner_dni)
                .cloned()
                .ok_or_else(|| StoreError::Db("dangling cliente reference".into()))?;
            let domicilio = self
                .domicilios
                .lock()
                .unwrap()
                .get(&numero_medidor)
                .map(|(d, _)| d.clone())
                .ok_or_else(|| StoreError::Db("dangling domicilio reference".into()))?;
            Ok(FacturaConRelaciones { factura: factura.clone(), cliente, domicilio })
        }
    }
}
