//! Modelo de Reservation
//!
//! Este módulo contiene el struct Reservation, los enums de estado y el
//! ciclo de vida pending -> accepted | refused. Los períodos son intervalos
//! semiabiertos [start_date, end_date).

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

use crate::utils::validation::{
    validate_payment_method, validate_payment_status, validate_positive_price,
    validate_reservation_status,
};

/// Estado de la reserva - mapea al ENUM reservation_status
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Accepted,
    Refused,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Accepted => "accepted",
            ReservationStatus::Refused => "refused",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReservationStatus::Pending),
            "accepted" => Some(ReservationStatus::Accepted),
            "refused" => Some(ReservationStatus::Refused),
            _ => None,
        }
    }

    /// Transiciones permitidas del ciclo de vida. `accepted` y `refused`
    /// son estados terminales.
    pub fn can_transition_to(&self, next: &ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Pending, ReservationStatus::Accepted)
                | (ReservationStatus::Pending, ReservationStatus::Refused)
        )
    }
}

/// Método de pago - mapea al ENUM payment_method
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
    Cheque,
}

impl PaymentMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "card" => Some(PaymentMethod::Card),
            "cash" => Some(PaymentMethod::Cash),
            "cheque" => Some(PaymentMethod::Cheque),
            _ => None,
        }
    }
}

/// Estado del pago - mapea al ENUM payment_status
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(PaymentStatus::Paid),
            "unpaid" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }
}

/// Días de alquiler de un intervalo semiabierto
pub fn rental_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days()
}

/// Precio por defecto cuando la reserva no trae uno: días × tarifa diaria
pub fn compute_total_price(daily_price: Decimal, start_date: NaiveDate, end_date: NaiveDate) -> Decimal {
    daily_price * Decimal::from(rental_days(start_date, end_date))
}

/// Reservation principal - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub reservation_status: ReservationStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    pub created_at: DateTime<Utc>,
}

/// Request para crear una nueva reserva
///
/// Las fechas llegan como strings YYYY-MM-DD y se parsean en el servicio de
/// disponibilidad para poder devolver un error de rango y no un 422 genérico.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub client_id: Uuid,

    pub car_id: Uuid,

    pub start_date: String,

    pub end_date: String,

    #[validate(custom = "validate_positive_price")]
    pub total_price: Option<Decimal>,

    #[validate(custom = "validate_payment_method")]
    pub payment_method: Option<String>,

    #[validate(custom = "validate_payment_status")]
    pub payment_status: Option<String>,
}

/// Request para actualizar una reserva existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReservationRequest {
    pub client_id: Option<Uuid>,

    pub car_id: Option<Uuid>,

    pub start_date: Option<String>,

    pub end_date: Option<String>,

    #[validate(custom = "validate_positive_price")]
    pub total_price: Option<Decimal>,

    #[validate(custom = "validate_payment_method")]
    pub payment_method: Option<String>,

    #[validate(custom = "validate_payment_status")]
    pub payment_status: Option<String>,
}

/// Request para la transición de estado de una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReservationStatusRequest {
    #[validate(custom = "validate_reservation_status")]
    pub status: String,
}

/// Request para registrar el pago de una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaymentRequest {
    #[validate(custom = "validate_payment_method")]
    pub payment_method: Option<String>,

    #[validate(custom = "validate_payment_status")]
    pub payment_status: String,
}

/// Response de reserva para la API
#[derive(Debug, Clone, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rental_days: i64,
    pub total_price: Decimal,
    pub reservation_status: ReservationStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de reservas
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationFilters {
    pub reservation_status: Option<String>,
    pub car_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        let days = rental_days(reservation.start_date, reservation.end_date);
        Self {
            id: reservation.id,
            client_id: reservation.client_id,
            car_id: reservation.car_id,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            rental_days: days,
            total_price: reservation.total_price,
            reservation_status: reservation.reservation_status,
            payment_method: reservation.payment_method,
            payment_status: reservation.payment_status,
            created_at: reservation.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_move_to_accepted_or_refused() {
        assert!(ReservationStatus::Pending.can_transition_to(&ReservationStatus::Accepted));
        assert!(ReservationStatus::Pending.can_transition_to(&ReservationStatus::Refused));
    }

    #[test]
    fn accepted_and_refused_are_terminal() {
        for terminal in [ReservationStatus::Accepted, ReservationStatus::Refused] {
            assert!(!terminal.can_transition_to(&ReservationStatus::Pending));
            assert!(!terminal.can_transition_to(&ReservationStatus::Accepted));
            assert!(!terminal.can_transition_to(&ReservationStatus::Refused));
        }
    }

    #[test]
    fn pending_cannot_stay_pending_via_transition() {
        assert!(!ReservationStatus::Pending.can_transition_to(&ReservationStatus::Pending));
    }

    #[test]
    fn rental_days_is_half_open() {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2026, 7, 4).expect("valid date");
        assert_eq!(rental_days(start, end), 3);
    }

    #[test]
    fn total_price_defaults_to_days_times_daily_rate() {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2026, 7, 8).expect("valid date");
        let daily_price = Decimal::new(4550, 2); // 45.50

        assert_eq!(compute_total_price(daily_price, start, end), Decimal::new(31850, 2));
    }

    #[test]
    fn status_parse_rejects_unknown_values() {
        assert_eq!(ReservationStatus::parse("accepted"), Some(ReservationStatus::Accepted));
        assert!(ReservationStatus::parse("cancelled").is_none());
    }
}
