use serde::{Deserialize, Serialize};

use crate::domain::{Cliente, Domicilio, Factura};

/// External-facing projection of a Cliente. The nested collections are only
/// populated by the eager-include profile read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClienteDto {
    pub numero_cliente: i32,
    pub dni: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domicilios: Option<Vec<DomicilioDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facturas: Option<Vec<FacturaDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomicilioDto {
    pub numero_medidor: i32,
    pub calle: String,
    pub numero: i32,
    pub piso: Option<String>,
    pub departamento: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacturaDto {
    pub numero_factura: i32,
    pub fecha_emision: chrono::DateTime<chrono::FixedOffset>,
    pub fecha_vencimiento: chrono::DateTime<chrono::FixedOffset>,
    pub consumo_mensual: f64,
    pub consumo_total: f64,
}

impl From<&Cliente> for ClienteDto {
    fn from(c: &Cliente) -> Self {
        Self {
            numero_cliente: c.numero_cliente,
            dni: c.dni,
            nombre: c.nombre.clone(),
            apellido: c.apellido.clone(),
            email: c.email.clone(),
            domicilios: None,
            facturas: None,
        }
    }
}

impl ClienteDto {
    /// Composed projection with addresses and invoices attached.
    pub fn with_relations(c: &Cliente, domicilios: &[Domicilio], facturas: &[Factura]) -> Self {
        let mut dto = Self::from(c);
        dto.domicilios = Some(domicilios.iter().map(DomicilioDto::from).collect());
        dto.facturas = Some(facturas.iter().map(FacturaDto::from).collect());
        dto
    }
}

impl From<&Domicilio> for DomicilioDto {
    fn from(d: &Domicilio) -> Self {
        Self {
            numero_medidor: d.numero_medidor,
            calle: d.calle.clone(),
            numero: d.numero,
            piso: d.piso.clone(),
            departamento: d.departamento.clone(),
        }
    }
}

impl From<&Factura> for FacturaDto {
    fn from(f: &Factura) -> Self {
        Self {
            numero_factura: f.numero_factura,
            fecha_emision: f.fecha_emision,
            fecha_vencimiento: f.fecha_vencimiento,
            consumo_mensual: f.consumo_mensual,
            consumo_total: f.consumo_total,
        }
    }
}

/// Result of a role-scoped client listing: staff get the full collection,
/// a Cliente gets their single record.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ListadoClientes {
    Todos(Vec<ClienteDto>),
    Propio(ClienteDto),
}
