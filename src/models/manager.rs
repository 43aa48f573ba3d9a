//! Modelo de Manager
//!
//! Este módulo contiene el struct Manager para las cuentas del personal
//! de la agencia. El rol admin habilita la gestión de las propias cuentas.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::validation::{validate_manager_role, validate_manager_status, validate_not_empty, validate_phone};

/// Rol del gestor - mapea al ENUM manager_role
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "manager_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ManagerRole {
    Admin,
    Manager,
}

impl ManagerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagerRole::Admin => "admin",
            ManagerRole::Manager => "manager",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(ManagerRole::Admin),
            "manager" => Some(ManagerRole::Manager),
            _ => None,
        }
    }
}

/// Estado de la cuenta - mapea al ENUM manager_status
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "manager_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ManagerStatus {
    Active,
    Inactive,
}

impl ManagerStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(ManagerStatus::Active),
            "inactive" => Some(ManagerStatus::Inactive),
            _ => None,
        }
    }
}

/// Manager principal - mapea exactamente a la tabla managers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Manager {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: ManagerRole,
    pub manager_status: ManagerStatus,
    pub created_at: DateTime<Utc>,
}

impl Manager {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ManagerRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.manager_status == ManagerStatus::Active
    }
}

/// Request para crear una cuenta de gestor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateManagerRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub first_name: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(custom = "validate_manager_role")]
    pub role: Option<String>,
}

/// Request para actualizar una cuenta de gestor
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateManagerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(custom = "validate_manager_role")]
    pub role: Option<String>,

    #[validate(custom = "validate_manager_status")]
    pub manager_status: Option<String>,
}

/// Response de gestor para la API
#[derive(Debug, Clone, Serialize)]
pub struct ManagerResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: ManagerRole,
    pub manager_status: ManagerStatus,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de gestores
#[derive(Debug, Clone, Deserialize)]
pub struct ManagerFilters {
    pub role: Option<String>,
    pub manager_status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<Manager> for ManagerResponse {
    fn from(manager: Manager) -> Self {
        Self {
            id: manager.id,
            first_name: manager.first_name,
            last_name: manager.last_name,
            email: manager.email,
            phone: manager.phone,
            role: manager.role,
            manager_status: manager.manager_status,
            created_at: manager.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_manager() -> Manager {
        Manager {
            id: Uuid::new_v4(),
            first_name: "Sara".to_string(),
            last_name: "Martín".to_string(),
            email: "sara@rental.test".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            phone: None,
            role: ManagerRole::Admin,
            manager_status: ManagerStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn role_parse_accepts_known_values() {
        assert_eq!(ManagerRole::parse("admin"), Some(ManagerRole::Admin));
        assert_eq!(ManagerRole::parse("manager"), Some(ManagerRole::Manager));
        assert!(ManagerRole::parse("root").is_none());
    }

    #[test]
    fn serialized_manager_never_exposes_password_hash() {
        let json = serde_json::to_value(sample_manager()).expect("serialization failed");
        assert!(json.get("password_hash").is_none());

        let response = serde_json::to_value(ManagerResponse::from(sample_manager()))
            .expect("serialization failed");
        assert!(response.get("password_hash").is_none());
    }

    #[test]
    fn full_name_joins_first_and_last() {
        assert_eq!(sample_manager().full_name(), "Sara Martín");
    }
}
