//! Repositorio de reservas
//!
//! Acceso a la tabla reservations. Las operaciones que tocan fechas se
//! ejecutan en una transacción que bloquea la fila del coche (FOR UPDATE)
//! para serializar creaciones concurrentes; la exclusion constraint
//! reservations_no_overlap queda como red de seguridad.

use sqlx::PgPool;
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::reservation::{
    PaymentMethod, PaymentStatus, Reservation, ReservationFilters, ReservationStatus,
};
use crate::utils::errors::{not_found_error, AppError};

/// Datos ya resueltos para insertar una reserva
#[derive(Debug)]
pub struct NewReservation {
    pub client_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}

/// Datos ya resueltos para reprogramar una reserva
#[derive(Debug)]
pub struct ReservationChanges {
    pub client_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    pub async fn find_all(&self, filters: &ReservationFilters) -> Result<Vec<Reservation>, AppError> {
        let reservation_status = match filters.reservation_status.as_deref() {
            Some(raw) => ReservationStatus::parse(raw),
            None => None,
        };

        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE ($1::reservation_status IS NULL OR reservation_status = $1)
              AND ($2::uuid IS NULL OR car_id = $2)
              AND ($3::uuid IS NULL OR client_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(reservation_status)
        .bind(filters.car_id)
        .bind(filters.client_id)
        .bind(filters.limit.unwrap_or(100))
        .bind(filters.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Reservas pending/accepted de un coche, opcionalmente excluyendo una
    /// (la propia, al reprogramar). El filtrado por solape lo hace el
    /// servicio de disponibilidad.
    pub async fn find_active_by_car(
        &self,
        car_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE car_id = $1
              AND reservation_status IN ('pending', 'accepted')
              AND ($2::uuid IS NULL OR id != $2)
            ORDER BY start_date ASC
            "#,
        )
        .bind(car_id)
        .bind(exclude_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Inserta una reserva serializando contra las demás del mismo coche.
    ///
    /// Bloquea la fila del coche, re-comprueba el solape dentro de la
    /// transacción y recién entonces inserta. Si aun así dos transacciones
    /// se cruzan, la exclusion constraint corta la segunda y el error llega
    /// como Conflict.
    pub async fn create_guarded(&self, new: &NewReservation) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        let car: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM cars WHERE id = $1 FOR UPDATE")
            .bind(new.car_id)
            .fetch_optional(&mut *tx)
            .await?;
        car.ok_or_else(|| not_found_error("Car", &new.car_id.to_string()))?;

        let client_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
                .bind(new.client_id)
                .fetch_one(&mut *tx)
                .await?;
        if !client_exists.0 {
            return Err(not_found_error("Client", &new.client_id.to_string()));
        }

        let conflict: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE car_id = $1
                  AND reservation_status IN ('pending', 'accepted')
                  AND start_date < $3
                  AND end_date > $2
            )
            "#,
        )
        .bind(new.car_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .fetch_one(&mut *tx)
        .await?;
        if conflict.0 {
            return Err(AppError::Conflict(
                "Car is already reserved for an overlapping period".to_string(),
            ));
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (id, client_id, car_id, start_date, end_date, total_price, reservation_status, payment_method, payment_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.client_id)
        .bind(new.car_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.total_price)
        .bind(new.payment_method.clone())
        .bind(new.payment_status.clone())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Reprograma una reserva con el mismo guard que la creación, excluyendo
    /// la propia reserva del chequeo de solape.
    pub async fn update_guarded(
        &self,
        id: Uuid,
        changes: &ReservationChanges,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("Reservation", &id.to_string()))?;

        let car: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM cars WHERE id = $1 FOR UPDATE")
            .bind(changes.car_id)
            .fetch_optional(&mut *tx)
            .await?;
        car.ok_or_else(|| not_found_error("Car", &changes.car_id.to_string()))?;

        let client_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
                .bind(changes.client_id)
                .fetch_one(&mut *tx)
                .await?;
        if !client_exists.0 {
            return Err(not_found_error("Client", &changes.client_id.to_string()));
        }

        // Una reserva rechazada no bloquea a nadie, así que tampoco exige guard
        let needs_guard = matches!(
            current.reservation_status,
            ReservationStatus::Pending | ReservationStatus::Accepted
        );
        if needs_guard {
            let conflict: (bool,) = sqlx::query_as(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM reservations
                    WHERE car_id = $1
                      AND reservation_status IN ('pending', 'accepted')
                      AND id != $4
                      AND start_date < $3
                      AND end_date > $2
                )
                "#,
            )
            .bind(changes.car_id)
            .bind(changes.start_date)
            .bind(changes.end_date)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if conflict.0 {
                return Err(AppError::Conflict(
                    "Car is already reserved for an overlapping period".to_string(),
                ));
            }
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET client_id = $2, car_id = $3, start_date = $4, end_date = $5,
                total_price = $6, payment_method = $7, payment_status = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.client_id)
        .bind(changes.car_id)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.total_price)
        .bind(changes.payment_method.clone())
        .bind(changes.payment_status.clone())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Transición de estado del ciclo de vida pending -> accepted | refused.
    pub async fn update_status(
        &self,
        id: Uuid,
        next: &ReservationStatus,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("Reservation", &id.to_string()))?;

        if !current.reservation_status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot change reservation status from '{}' to '{}'",
                current.reservation_status.as_str(),
                next.as_str()
            )));
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET reservation_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(next.clone())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    pub async fn update_payment(
        &self,
        id: Uuid,
        payment_method: Option<PaymentMethod>,
        payment_status: PaymentStatus,
    ) -> Result<Reservation, AppError> {
        // Obtener reserva actual
        let current = self.find_by_id(id).await?
            .ok_or_else(|| not_found_error("Reservation", &id.to_string()))?;

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET payment_method = $2, payment_status = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_method.or(current.payment_method))
        .bind(payment_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(reservation)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_by_id(id).await?
            .ok_or_else(|| not_found_error("Reservation", &id.to_string()))?;

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Coches con una reserva aceptada que cubre la fecha dada.
    pub async fn find_car_ids_rented_on(&self, date: NaiveDate) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT car_id FROM reservations
            WHERE reservation_status = 'accepted'
              AND start_date <= $1
              AND end_date > $1
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}
