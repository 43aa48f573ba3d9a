//! Repositorio del dashboard
//!
//! Consultas agregadas de solo lectura para el panel de la agencia.

use sqlx::PgPool;
use uuid::Uuid;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::dashboard::{CalendarReservation, DashboardStats, UpcomingReservation};
use crate::utils::errors::AppError;

pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resumen global contado en una sola consulta.
    pub async fn stats(&self, today: NaiveDate) -> Result<DashboardStats, AppError> {
        let row: (i64, i64, i64, i64, i64, i64, i64, Decimal) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM cars),
                (SELECT COUNT(*) FROM clients),
                (SELECT COUNT(*) FROM reservations),
                (SELECT COUNT(*) FROM reservations WHERE reservation_status = 'pending'),
                (SELECT COUNT(*) FROM reservations WHERE reservation_status = 'accepted'),
                (SELECT COUNT(*) FROM reservations WHERE reservation_status = 'refused'),
                (SELECT COUNT(DISTINCT car_id) FROM reservations
                    WHERE reservation_status = 'accepted'
                      AND start_date <= $1 AND end_date > $1),
                (SELECT COALESCE(SUM(total_price), 0) FROM reservations
                    WHERE payment_status = 'paid')
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        let (
            total_cars,
            total_clients,
            total_reservations,
            pending_reservations,
            accepted_reservations,
            refused_reservations,
            rented_cars,
            total_revenue,
        ) = row;

        Ok(DashboardStats {
            total_cars,
            available_cars: total_cars - rented_cars,
            rented_cars,
            total_clients,
            total_reservations,
            pending_reservations,
            accepted_reservations,
            refused_reservations,
            total_revenue,
        })
    }

    /// Próximas reservas a partir de hoy, con cliente y coche unidos.
    pub async fn upcoming(
        &self,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<UpcomingReservation>, AppError> {
        let reservations = sqlx::query_as::<_, UpcomingReservation>(
            r#"
            SELECT r.id, r.start_date, r.end_date, r.reservation_status,
                   cl.first_name AS client_first_name, cl.last_name AS client_last_name,
                   c.brand AS car_brand, c.model AS car_model, c.license_plate AS car_license_plate
            FROM reservations r
            JOIN clients cl ON cl.id = r.client_id
            JOIN cars c ON c.id = r.car_id
            WHERE r.start_date >= $1
              AND r.reservation_status IN ('pending', 'accepted')
            ORDER BY r.start_date ASC
            LIMIT $2
            "#,
        )
        .bind(today)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Todas las reservas para la vista de calendario, filtrable por coche.
    pub async fn calendar(&self, car_id: Option<Uuid>) -> Result<Vec<CalendarReservation>, AppError> {
        let reservations = sqlx::query_as::<_, CalendarReservation>(
            r#"
            SELECT r.id, r.client_id, r.car_id, r.start_date, r.end_date, r.reservation_status,
                   cl.first_name AS client_first_name, cl.last_name AS client_last_name,
                   c.brand AS car_brand, c.model AS car_model
            FROM reservations r
            JOIN clients cl ON cl.id = r.client_id
            JOIN cars c ON c.id = r.car_id
            WHERE ($1::uuid IS NULL OR r.car_id = $1)
            ORDER BY r.start_date ASC
            "#,
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }
}
