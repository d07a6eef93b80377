use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Business view of a Cliente, decoupled from the persistence model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cliente {
    pub numero_cliente: i32,
    pub dni: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

/// Creation input for a Cliente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuevoCliente {
    pub numero_cliente: i32,
    pub dni: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

impl NuevoCliente {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.dni <= 0 {
            return Err(ServiceError::Validation("dni must be positive".into()));
        }
        if self.nombre.trim().is_empty() || self.apellido.trim().is_empty() {
            return Err(ServiceError::Validation("nombre and apellido required".into()));
        }
        if !self.email.contains('@') {
            return Err(ServiceError::Validation("invalid email".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domicilio {
    pub numero_medidor: i32,
    pub calle: String,
    pub numero: i32,
    pub piso: Option<String>,
    pub departamento: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factura {
    pub numero_factura: i32,
    pub fecha_emision: DateTime<FixedOffset>,
    pub fecha_vencimiento: DateTime<FixedOffset>,
    pub consumo_mensual: f64,
    pub consumo_total: f64,
}

/// Invoice submitted by a caller. The client reference, if supplied, is
/// ignored: the stored invoice is always billed to the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacturaDraft {
    pub numero_factura: i32,
    pub fecha_emision: DateTime<FixedOffset>,
    pub fecha_vencimiento: DateTime<FixedOffset>,
    pub consumo_mensual: f64,
    pub consumo_total: f64,
    /// Meter the consumption was measured at.
    pub numero_medidor: i32,
    #[serde(default)]
    pub cliente_dni: Option<i32>,
}

/// Mutable subset for invoice updates; every other stored field is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacturaPatch {
    pub fecha_vencimiento: DateTime<FixedOffset>,
    pub consumo_mensual: f64,
}

/// An invoice with its client and address eagerly attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacturaConRelaciones {
    pub factura: Factura,
    pub cliente: Cliente,
    pub domicilio: Domicilio,
}

/// Registered user as seen by the photo handler.
#[derive(Debug, Clone)]
pub struct Usuario {
    pub username: String,
    pub foto_perfil: Option<Vec<u8>>,
    pub tipo_contenido_foto: Option<String>,
}

/// An opaque photo payload with its content-type tag; the pair is only ever
/// stored or returned together.
#[derive(Debug, Clone, PartialEq)]
pub struct FotoPerfil {
    pub bytes: Vec<u8>,
    pub content_type: String,
}
