//! # Rental Management API
//!
//! Backend de gestión para una agencia de alquiler de coches: flota,
//! clientes, reservas con control de solapes, cuentas del personal y
//! panel de resumen.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
