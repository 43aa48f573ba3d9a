//! Modelos del dashboard
//!
//! Structs de solo lectura que alimentan las vistas de resumen, próximas
//! reservas y calendario. Ninguno mapea a una tabla propia.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::reservation::ReservationStatus;

/// Resumen global de la agencia
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_cars: i64,
    pub available_cars: i64,
    pub rented_cars: i64,
    pub total_clients: i64,
    pub total_reservations: i64,
    pub pending_reservations: i64,
    pub accepted_reservations: i64,
    pub refused_reservations: i64,
    pub total_revenue: Decimal,
}

/// Reserva próxima con los datos del cliente y del coche ya unidos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UpcomingReservation {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reservation_status: ReservationStatus,
    pub client_first_name: String,
    pub client_last_name: String,
    pub car_brand: String,
    pub car_model: String,
    pub car_license_plate: String,
}

/// Entrada del calendario de reservas
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CalendarReservation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reservation_status: ReservationStatus,
    pub client_first_name: String,
    pub client_last_name: String,
    pub car_brand: String,
    pub car_model: String,
}

/// Query params del calendario
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub car_id: Option<String>,
}

/// Query params de próximas reservas
#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<i64>,
}
