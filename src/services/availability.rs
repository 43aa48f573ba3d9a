//! Servicio de disponibilidad
//!
//! Toda la lógica de solapes de reservas vive aquí. Los intervalos son
//! semiabiertos [start_date, end_date): una reserva que termina el día que
//! otra empieza no pisa a la segunda.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::Car;
use crate::models::reservation::Reservation;
use crate::repositories::{CarRepository, ReservationRepository};
use crate::utils::errors::{invalid_range_error, AppError};
use crate::utils::validation::validate_date;

/// Dos intervalos semiabiertos [a_start, a_end) y [b_start, b_end) se solapan
/// si y solo si cada uno empieza antes de que el otro termine.
pub fn is_overlapping(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub struct AvailabilityService {
    cars: CarRepository,
    reservations: ReservationRepository,
}

impl AvailabilityService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool),
        }
    }

    /// Parsea y valida un período YYYY-MM-DD. Tanto una fecha malformada
    /// como un rango invertido o vacío son errores de rango.
    pub fn parse_period(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
        let start_date = validate_date(start)
            .map_err(|_| invalid_range_error("start_date must be a valid YYYY-MM-DD date"))?;
        let end_date = validate_date(end)
            .map_err(|_| invalid_range_error("end_date must be a valid YYYY-MM-DD date"))?;

        if start_date >= end_date {
            return Err(invalid_range_error("start_date must be strictly before end_date"));
        }

        Ok((start_date, end_date))
    }

    /// Reservas pending/accepted del coche que solapan [start_date, end_date).
    /// `exclude_id` deja fuera una reserva concreta al reprogramarla.
    pub async fn find_conflicts(
        &self,
        car_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<Reservation>, AppError> {
        if start_date >= end_date {
            return Err(invalid_range_error("start_date must be strictly before end_date"));
        }

        let candidates = self.reservations.find_active_by_car(car_id, exclude_id).await?;
        let conflicts = candidates
            .into_iter()
            .filter(|reservation| {
                is_overlapping(start_date, end_date, reservation.start_date, reservation.end_date)
            })
            .collect();

        Ok(conflicts)
    }

    /// Coches sin conflicto en el período. Se recalcula en cada llamada.
    pub async fn list_available_cars(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Car>, AppError> {
        if start_date >= end_date {
            return Err(invalid_range_error("start_date must be strictly before end_date"));
        }

        self.cars.find_available(start_date, end_date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn overlapping_periods_are_detected() {
        // Solape parcial por la derecha
        assert!(is_overlapping(
            date(2026, 7, 1),
            date(2026, 7, 10),
            date(2026, 7, 5),
            date(2026, 7, 15),
        ));
        // Contenido por completo
        assert!(is_overlapping(
            date(2026, 7, 1),
            date(2026, 7, 31),
            date(2026, 7, 10),
            date(2026, 7, 12),
        ));
        // Idéntico
        assert!(is_overlapping(
            date(2026, 7, 1),
            date(2026, 7, 10),
            date(2026, 7, 1),
            date(2026, 7, 10),
        ));
    }

    #[test]
    fn back_to_back_periods_do_not_overlap() {
        // [1, 10) y [10, 20) comparten solo la frontera
        assert!(!is_overlapping(
            date(2026, 7, 1),
            date(2026, 7, 10),
            date(2026, 7, 10),
            date(2026, 7, 20),
        ));
        assert!(!is_overlapping(
            date(2026, 7, 10),
            date(2026, 7, 20),
            date(2026, 7, 1),
            date(2026, 7, 10),
        ));
    }

    #[test]
    fn disjoint_periods_do_not_overlap() {
        assert!(!is_overlapping(
            date(2026, 7, 1),
            date(2026, 7, 5),
            date(2026, 8, 1),
            date(2026, 8, 5),
        ));
    }

    #[test]
    fn parse_period_accepts_valid_ranges() {
        let (start, end) = AvailabilityService::parse_period("2026-07-01", "2026-07-10")
            .expect("valid period");
        assert_eq!(start, date(2026, 7, 1));
        assert_eq!(end, date(2026, 7, 10));
    }

    #[test]
    fn parse_period_rejects_reversed_and_empty_ranges() {
        assert!(matches!(
            AvailabilityService::parse_period("2026-07-10", "2026-07-01"),
            Err(AppError::InvalidRange(_))
        ));
        assert!(matches!(
            AvailabilityService::parse_period("2026-07-10", "2026-07-10"),
            Err(AppError::InvalidRange(_))
        ));
    }

    #[test]
    fn parse_period_rejects_malformed_dates() {
        assert!(matches!(
            AvailabilityService::parse_period("01/07/2026", "2026-07-10"),
            Err(AppError::InvalidRange(_))
        ));
        assert!(matches!(
            AvailabilityService::parse_period("2026-07-01", "not-a-date"),
            Err(AppError::InvalidRange(_))
        ));
        assert!(matches!(
            AvailabilityService::parse_period("2026-02-30", "2026-03-01"),
            Err(AppError::InvalidRange(_))
        ));
    }
}
