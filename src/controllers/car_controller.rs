use crate::dto::api_response::ApiResponse;
use crate::models::car::{
    AvailabilityQuery, CarFilters, CarResponse, CreateCarRequest, UpdateCarRequest,
};
use crate::models::image::{is_allowed_image_type, UploadImageResponse, MAX_IMAGE_BYTES};
use crate::repositories::{CarRepository, ReservationRepository};
use crate::services::AvailabilityService;
use crate::utils::errors::{bad_request_error, conflict_error, AppError};
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

pub struct CarController {
    repository: CarRepository,
    reservations: ReservationRepository,
    availability: AvailabilityService,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            availability: AvailabilityService::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateCarRequest,
    ) -> Result<ApiResponse<CarResponse>, AppError> {
        // Validar campos
        request.validate()?;

        // Verificar que la matrícula no exista
        if self.repository.license_plate_exists(&request.license_plate).await? {
            return Err(conflict_error("Car", "license plate", &request.license_plate));
        }

        let car = self.repository.create(&request).await?;

        // Un coche recién creado no tiene reservas todavía
        Ok(ApiResponse::success_with_message(
            CarResponse::from_car(car, false),
            "Coche creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CarResponse, AppError> {
        let car = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coche no encontrado".to_string()))?;

        let rented_today = self.rented_today().await?;
        Ok(CarResponse::from_car(car, rented_today.contains(&id)))
    }

    pub async fn list(&self, filters: CarFilters) -> Result<Vec<CarResponse>, AppError> {
        let cars = self.repository.find_all(&filters).await?;
        let rented_today = self.rented_today().await?;

        let response = cars
            .into_iter()
            .map(|car| {
                let occupied = rented_today.contains(&car.id);
                CarResponse::from_car(car, occupied)
            })
            .collect();

        Ok(response)
    }

    /// Coches libres en el período pedido. El estado derivado sigue
    /// reflejando el día de hoy, no el período consultado.
    pub async fn list_available(
        &self,
        query: AvailabilityQuery,
    ) -> Result<Vec<CarResponse>, AppError> {
        let (start_date, end_date) =
            AvailabilityService::parse_period(&query.start_date, &query.end_date)?;

        let cars = self.availability.list_available_cars(start_date, end_date).await?;
        let rented_today = self.rented_today().await?;

        let response = cars
            .into_iter()
            .map(|car| {
                let occupied = rented_today.contains(&car.id);
                CarResponse::from_car(car, occupied)
            })
            .collect();

        Ok(response)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCarRequest,
    ) -> Result<ApiResponse<CarResponse>, AppError> {
        request.validate()?;

        let car = self.repository.update(id, &request).await?;
        let rented_today = self.rented_today().await?;

        Ok(ApiResponse::success_with_message(
            CarResponse::from_car(car, rented_today.contains(&id)),
            "Coche actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        Ok(())
    }

    pub async fn upload_image(
        &self,
        id: Uuid,
        file_name: String,
        content_type: String,
        data: Vec<u8>,
    ) -> Result<ApiResponse<UploadImageResponse>, AppError> {
        if !is_allowed_image_type(&content_type) {
            return Err(bad_request_error(
                "Unsupported image type, expected JPEG, PNG, GIF or WebP",
            ));
        }
        if data.is_empty() {
            return Err(bad_request_error("Image payload is empty"));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(bad_request_error("Image exceeds the 5 MB limit"));
        }

        let (car, image_id) = self
            .repository
            .attach_image(id, &file_name, &content_type, &data)
            .await?;

        Ok(ApiResponse::success_with_message(
            UploadImageResponse {
                image_id,
                image_url: format!("/api/image/{}", image_id),
            },
            format!("Imagen de {} {} subida exitosamente", car.brand, car.model),
        ))
    }

    /// Ids de coches con una reserva aceptada que cubre el día de hoy.
    async fn rented_today(&self) -> Result<HashSet<Uuid>, AppError> {
        let ids = self
            .reservations
            .find_car_ids_rented_on(Utc::now().date_naive())
            .await?;
        Ok(ids.into_iter().collect())
    }
}
