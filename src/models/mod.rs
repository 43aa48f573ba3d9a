//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod car;
pub mod client;
pub mod dashboard;
pub mod image;
pub mod manager;
pub mod reservation;
