//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidationError;

/// Tipos de carburante aceptados por la flota
pub const FUEL_TYPES: [&str; 5] = ["essence", "diesel", "hybrid", "electric", "lpg"];

/// Catálogo de opciones de equipamiento de un coche
pub const CAR_OPTIONS: [&str; 8] = [
    "gps",
    "air_conditioning",
    "bluetooth",
    "rear_camera",
    "heated_seats",
    "sunroof",
    "cruise_control",
    "parking_assist",
];

/// Estados válidos del ciclo de vida de una reserva
pub const RESERVATION_STATUSES: [&str; 3] = ["pending", "accepted", "refused"];

/// Métodos de pago aceptados
pub const PAYMENT_METHODS: [&str; 3] = ["card", "cash", "cheque"];

/// Estados de pago aceptados
pub const PAYMENT_STATUSES: [&str; 2] = ["paid", "unpaid"];

/// Roles del personal de la agencia
pub const MANAGER_ROLES: [&str; 2] = ["admin", "manager"];

/// Estados de cuenta del personal
pub const MANAGER_STATUSES: [&str; 2] = ["active", "inactive"];

lazy_static! {
    /// Matrícula estilo AB-123-CD
    pub static ref LICENSE_PLATE_RE: Regex =
        Regex::new(r"^[A-Z]{2}-\d{3}-[A-Z]{2}$").expect("regex de matrícula inválida");
}

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_digit(10)).collect::<String>();
    if clean_phone.len() < 10 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en una lista de valores permitidos
pub fn validate_enum<T: PartialEq + std::fmt::Display + std::fmt::Debug + serde::Serialize>(
    value: T,
    allowed_values: &[T],
) -> Result<(), ValidationError> {
    if !allowed_values.contains(&value) {
        let mut error = ValidationError::new("enum");
        error.add_param("value".into(), &value);
        error.add_param("allowed_values".into(), &format!("{:?}", allowed_values));
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un precio decimal sea estrictamente positivo
pub fn validate_positive_price(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)
}

/// Validar tipo de carburante contra el catálogo
pub fn validate_fuel_type(value: &str) -> Result<(), ValidationError> {
    validate_enum(value, &FUEL_TYPES).map_err(|_| {
        let mut error = ValidationError::new("fuel_type");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &FUEL_TYPES.join(", "));
        error
    })
}

/// Validar que todas las opciones pertenezcan al catálogo
pub fn validate_car_options(values: &[String]) -> Result<(), ValidationError> {
    for option in values {
        if !CAR_OPTIONS.contains(&option.as_str()) {
            let mut error = ValidationError::new("car_option");
            error.add_param("value".into(), option);
            error.add_param("allowed_values".into(), &CAR_OPTIONS.join(", "));
            return Err(error);
        }
    }
    Ok(())
}

/// Validar estado de reserva contra el ciclo de vida
pub fn validate_reservation_status(value: &str) -> Result<(), ValidationError> {
    validate_enum(value, &RESERVATION_STATUSES).map_err(|_| {
        let mut error = ValidationError::new("reservation_status");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &RESERVATION_STATUSES.join(", "));
        error
    })
}

/// Validar método de pago contra el catálogo
pub fn validate_payment_method(value: &str) -> Result<(), ValidationError> {
    validate_enum(value, &PAYMENT_METHODS).map_err(|_| {
        let mut error = ValidationError::new("payment_method");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &PAYMENT_METHODS.join(", "));
        error
    })
}

/// Validar estado de pago
pub fn validate_payment_status(value: &str) -> Result<(), ValidationError> {
    validate_enum(value, &PAYMENT_STATUSES).map_err(|_| {
        let mut error = ValidationError::new("payment_status");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &PAYMENT_STATUSES.join(", "));
        error
    })
}

/// Validar rol de gestor
pub fn validate_manager_role(value: &str) -> Result<(), ValidationError> {
    validate_enum(value, &MANAGER_ROLES).map_err(|_| {
        let mut error = ValidationError::new("manager_role");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &MANAGER_ROLES.join(", "));
        error
    })
}

/// Validar estado de cuenta de gestor
pub fn validate_manager_status(value: &str) -> Result<(), ValidationError> {
    validate_enum(value, &MANAGER_STATUSES).map_err(|_| {
        let mut error = ValidationError::new("manager_status");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &MANAGER_STATUSES.join(", "));
        error
    })
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    if !LICENSE_PLATE_RE.is_match(value) {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"AB-123-CD".to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uuid() {
        let valid_uuid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(valid_uuid).is_ok());

        let invalid_uuid = "invalid-uuid";
        assert!(validate_uuid(invalid_uuid).is_err());
    }

    #[test]
    fn test_validate_date() {
        let valid_date = "2026-01-15";
        assert!(validate_date(valid_date).is_ok());

        let invalid_date = "2026/01/15";
        assert!(validate_date(invalid_date).is_err());
        assert!(validate_date("15-01-2026").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Renault").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0612345678").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_enum() {
        let allowed = vec!["admin", "manager"];
        assert!(validate_enum("admin", &allowed).is_ok());
        assert!(validate_enum("user", &allowed).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }

    #[test]
    fn test_validate_positive_price() {
        assert!(validate_positive_price(&Decimal::new(4550, 2)).is_ok());
        assert!(validate_positive_price(&Decimal::ZERO).is_err());
        assert!(validate_positive_price(&Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn test_validate_fuel_type() {
        assert!(validate_fuel_type("diesel").is_ok());
        assert!(validate_fuel_type("electric").is_ok());
        assert!(validate_fuel_type("kerosene").is_err());
    }

    #[test]
    fn test_validate_car_options() {
        let valid = vec!["gps".to_string(), "bluetooth".to_string()];
        assert!(validate_car_options(&valid).is_ok());

        let invalid = vec!["gps".to_string(), "jacuzzi".to_string()];
        assert!(validate_car_options(&invalid).is_err());
    }

    #[test]
    fn test_validate_reservation_status() {
        assert!(validate_reservation_status("pending").is_ok());
        assert!(validate_reservation_status("accepted").is_ok());
        assert!(validate_reservation_status("cancelled").is_err());
    }

    #[test]
    fn test_validate_payment_method() {
        assert!(validate_payment_method("card").is_ok());
        assert!(validate_payment_method("cash").is_ok());
        assert!(validate_payment_method("bitcoin").is_err());
    }

    #[test]
    fn test_validate_payment_status() {
        assert!(validate_payment_status("paid").is_ok());
        assert!(validate_payment_status("pending").is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("AB-123-CD").is_ok());
        assert!(validate_license_plate("ab-123-cd").is_err());
        assert!(validate_license_plate("ABC-12-DE").is_err());
        assert!(validate_license_plate("AB123CD").is_err());
    }
}
