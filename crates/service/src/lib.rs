//! Business layer for the biodigestor billing backend.
//! - Role-scoped record access independent of the web framework.
//! - Projections (DTOs) for the external HTTP surface.
//! - Storage behind the `RecordStore` trait so services stay testable
//!   without a database.

pub mod clientes;
pub mod domain;
pub mod dto;
pub mod errors;
pub mod facturas;
pub mod fotos;
pub mod identity;
pub mod store;

#[cfg(test)]
mod test_support;
