//! Modelo de Client
//!
//! Este módulo contiene el struct Client y sus variantes para CRUD operations.
//! La dirección se guarda como subdocumento JSONB en la columna address.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use validator::Validate;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::utils::validation::{validate_not_empty, validate_phone};

/// Dirección postal del cliente (subdocumento JSONB)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Address {
    #[validate(custom = "validate_not_empty")]
    pub street: String,

    pub building: Option<String>,

    pub apartment: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub city: String,

    #[validate(length(min = 4, max = 10))]
    pub postal_code: String,
}

/// Client principal - mapea exactamente a la tabla clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Json<Address>,
    pub license_category: String,
    pub license_number: String,
    pub license_expires_on: Option<NaiveDate>,
    pub id_card_number: String,
    pub created_at: DateTime<Utc>,
}

/// Request para registrar un nuevo cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub first_name: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom = "validate_phone")]
    pub phone: String,

    #[validate]
    pub address: Address,

    #[validate(length(min = 1, max = 5))]
    pub license_category: String,

    #[validate(length(min = 2, max = 50))]
    pub license_number: String,

    pub license_expires_on: Option<NaiveDate>,

    #[validate(length(min = 2, max = 50))]
    pub id_card_number: String,
}

/// Request para actualizar un cliente existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate]
    pub address: Option<Address>,

    #[validate(length(min = 1, max = 5))]
    pub license_category: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub license_number: Option<String>,

    pub license_expires_on: Option<NaiveDate>,

    #[validate(length(min = 2, max = 50))]
    pub id_card_number: Option<String>,
}

/// Response de cliente para la API
#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub license_category: String,
    pub license_number: String,
    pub license_expires_on: Option<NaiveDate>,
    pub id_card_number: String,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de clientes
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFilters {
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            phone: client.phone,
            address: client.address.0,
            license_category: client.license_category,
            license_number: client.license_number,
            license_expires_on: client.license_expires_on,
            id_card_number: client.id_card_number,
            created_at: client.created_at,
        }
    }
}
