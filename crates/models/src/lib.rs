pub mod cliente;
pub mod db;
pub mod domicilio;
pub mod errors;
pub mod factura;
pub mod usuario_registrado;
