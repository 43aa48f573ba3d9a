//! Repositorio de coches
//!
//! Acceso a las tablas cars y car_images. La foto vive en car_images y el
//! coche apunta a ella por image_id.

use sqlx::PgPool;
use uuid::Uuid;
use chrono::{NaiveDate, Utc};

use crate::models::car::{Car, CarFilters, CreateCarRequest, FuelType, UpdateCarRequest};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateCarRequest) -> Result<Car, AppError> {
        let id = Uuid::new_v4();
        let fuel_type = FuelType::parse(&request.fuel_type)
            .ok_or_else(|| bad_request_error("Unknown fuel type"))?;

        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (id, brand, model, year, license_plate, color, mileage, daily_price, fuel_type, seats, options, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.brand)
        .bind(&request.model)
        .bind(request.year)
        .bind(&request.license_plate)
        .bind(&request.color)
        .bind(request.mileage)
        .bind(request.daily_price)
        .bind(fuel_type)
        .bind(request.seats)
        .bind(&request.options)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    pub async fn find_all(&self, filters: &CarFilters) -> Result<Vec<Car>, AppError> {
        let brand_pattern = filters.brand.as_ref().map(|brand| format!("%{}%", brand));
        let fuel_type = match filters.fuel_type.as_deref() {
            Some(raw) => Some(
                FuelType::parse(raw).ok_or_else(|| bad_request_error("Unknown fuel type"))?,
            ),
            None => None,
        };

        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE ($1::text IS NULL OR brand ILIKE $1)
              AND ($2::fuel_type IS NULL OR fuel_type = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(brand_pattern)
        .bind(fuel_type)
        .bind(filters.limit.unwrap_or(100))
        .bind(filters.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Coches sin ninguna reserva pending/accepted que solape [start, end).
    /// Siempre se recalcula contra las reservas, nunca se cachea.
    pub async fn find_available(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT c.* FROM cars c
            WHERE NOT EXISTS (
                SELECT 1 FROM reservations r
                WHERE r.car_id = c.id
                  AND r.reservation_status IN ('pending', 'accepted')
                  AND r.start_date < $2
                  AND r.end_date > $1
            )
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    pub async fn license_plate_exists(&self, license_plate: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM cars WHERE license_plate = $1)"
        )
        .bind(license_plate)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateCarRequest) -> Result<Car, AppError> {
        // Obtener coche actual
        let current = self.find_by_id(id).await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;

        let fuel_type = match request.fuel_type.as_deref() {
            Some(raw) => FuelType::parse(raw).ok_or_else(|| bad_request_error("Unknown fuel type"))?,
            None => current.fuel_type,
        };

        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET brand = $2, model = $3, year = $4, license_plate = $5, color = $6,
                mileage = $7, daily_price = $8, fuel_type = $9, seats = $10, options = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.brand.clone().unwrap_or(current.brand))
        .bind(request.model.clone().unwrap_or(current.model))
        .bind(request.year.unwrap_or(current.year))
        .bind(request.license_plate.clone().unwrap_or(current.license_plate))
        .bind(request.color.clone().unwrap_or(current.color))
        .bind(request.mileage.unwrap_or(current.mileage))
        .bind(request.daily_price.unwrap_or(current.daily_price))
        .bind(fuel_type)
        .bind(request.seats.unwrap_or(current.seats))
        .bind(request.options.clone().unwrap_or(current.options))
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    /// Borra el coche, sus reservas (cascade) y su foto si la tiene.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;

        sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(image_id) = car.image_id {
            sqlx::query("DELETE FROM car_images WHERE id = $1")
                .bind(image_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Guarda la foto nueva, la engancha al coche y elimina la anterior.
    pub async fn attach_image(
        &self,
        car_id: Uuid,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<(Car, Uuid), AppError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT image_id FROM cars WHERE id = $1 FOR UPDATE")
                .bind(car_id)
                .fetch_optional(&mut *tx)
                .await?;
        let old_image_id = current
            .ok_or_else(|| not_found_error("Car", &car_id.to_string()))?
            .0;

        let image_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO car_images (id, file_name, content_type, data, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(image_id)
        .bind(file_name)
        .bind(content_type)
        .bind(data)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let car = sqlx::query_as::<_, Car>(
            "UPDATE cars SET image_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(car_id)
        .bind(image_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(old_id) = old_image_id {
            sqlx::query("DELETE FROM car_images WHERE id = $1")
                .bind(old_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok((car, image_id))
    }
}
