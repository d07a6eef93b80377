#![cfg(test)]
use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Domicilio, FacturaDraft, NuevoCliente};
use crate::identity::{Caller, Rol};
use crate::store::memory::MemoryStore;

pub fn caller(username: &str, rol: Rol, dni: Option<i32>) -> Caller {
    Caller { username: username.to_string(), rol, dni }
}

/// A valid creation input; numero_cliente mirrors the DNI for readability.
pub fn nuevo_cliente(dni: i32, nombre: &str) -> NuevoCliente {
    NuevoCliente {
        numero_cliente: dni,
        dni,
        nombre: nombre.to_string(),
        apellido: "Perez".to_string(),
        email: format!("{}@example.com", nombre.to_lowercase()),
    }
}

pub fn factura_draft(numero_factura: i32, numero_medidor: i32) -> FacturaDraft {
    let now = Utc::now().fixed_offset();
    FacturaDraft {
        numero_factura,
        fecha_emision: now,
        fecha_vencimiento: now + chrono::Duration::days(15),
        consumo_mensual: 12.5,
        consumo_total: 120.0,
        numero_medidor,
        cliente_dni: None,
    }
}

pub fn seed_domicilio(store: &Arc<MemoryStore>, owner_dni: i32, numero_medidor: i32) {
    store.seed_domicilio(
        owner_dni,
        Domicilio {
            numero_medidor,
            calle: "Av. Siempreviva".into(),
            numero: 742,
            piso: None,
            departamento: None,
        },
    );
}
