//! DTOs de la API
//!
//! Requests y responses que no pertenecen a un modelo concreto.

pub mod api_response;
pub mod auth_dto;

pub use api_response::ApiResponse;
