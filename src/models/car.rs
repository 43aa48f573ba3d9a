//! Modelo de Car
//!
//! Este módulo contiene el struct Car y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

use crate::utils::validation::{
    validate_car_options, validate_fuel_type, validate_license_plate, validate_not_empty,
    validate_positive_price,
};

/// Tipo de carburante - mapea al ENUM fuel_type
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "fuel_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Essence,
    Diesel,
    Hybrid,
    Electric,
    Lpg,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Essence => "essence",
            FuelType::Diesel => "diesel",
            FuelType::Hybrid => "hybrid",
            FuelType::Electric => "electric",
            FuelType::Lpg => "lpg",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "essence" => Some(FuelType::Essence),
            "diesel" => Some(FuelType::Diesel),
            "hybrid" => Some(FuelType::Hybrid),
            "electric" => Some(FuelType::Electric),
            "lpg" => Some(FuelType::Lpg),
            _ => None,
        }
    }
}

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: String,
    pub mileage: i32,
    pub daily_price: Decimal,
    pub fuel_type: FuelType,
    pub seats: i32,
    pub options: Vec<String>,
    pub image_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request para crear un nuevo coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 2, max = 100), custom = "validate_not_empty")]
    pub brand: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[validate(custom = "validate_license_plate")]
    pub license_plate: String,

    #[validate(length(min = 2, max = 50))]
    pub color: String,

    #[validate(range(min = 0))]
    pub mileage: i32,

    #[validate(custom = "validate_positive_price")]
    pub daily_price: Decimal,

    #[validate(custom = "validate_fuel_type")]
    pub fuel_type: String,

    #[validate(range(min = 1, max = 9))]
    pub seats: i32,

    #[serde(default)]
    #[validate(custom = "validate_car_options")]
    pub options: Vec<String>,
}

/// Request para actualizar un coche existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    #[validate(custom = "validate_license_plate")]
    pub license_plate: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub color: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    #[validate(custom = "validate_positive_price")]
    pub daily_price: Option<Decimal>,

    #[validate(custom = "validate_fuel_type")]
    pub fuel_type: Option<String>,

    #[validate(range(min = 1, max = 9))]
    pub seats: Option<i32>,

    #[validate(custom = "validate_car_options")]
    pub options: Option<Vec<String>>,
}

/// Response de coche para la API
///
/// `car_status` no existe en base de datos: se deriva de las reservas
/// aceptadas que cubren la fecha actual.
#[derive(Debug, Clone, Serialize)]
pub struct CarResponse {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: String,
    pub mileage: i32,
    pub daily_price: Decimal,
    pub fuel_type: FuelType,
    pub seats: i32,
    pub options: Vec<String>,
    pub car_status: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CarResponse {
    pub fn from_car(car: Car, occupied_today: bool) -> Self {
        let image_url = car.image_id.map(|image_id| format!("/api/image/{}", image_id));
        Self {
            id: car.id,
            brand: car.brand,
            model: car.model,
            year: car.year,
            license_plate: car.license_plate,
            color: car.color,
            mileage: car.mileage,
            daily_price: car.daily_price,
            fuel_type: car.fuel_type,
            seats: car.seats,
            options: car.options,
            car_status: if occupied_today { "rented".to_string() } else { "available".to_string() },
            image_url,
            created_at: car.created_at,
        }
    }
}

/// Filtros para búsqueda de coches
#[derive(Debug, Clone, Deserialize)]
pub struct CarFilters {
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query params para consultar disponibilidad en un período
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: String,
    pub end_date: String,
}
