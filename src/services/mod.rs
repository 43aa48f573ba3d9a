//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación.
//! Los servicios encapsulan operaciones complejas que pueden involucrar
//! múltiples modelos o integraciones externas.

pub mod admin_init;
pub mod availability;

pub use availability::*;
