use crate::dto::api_response::ApiResponse;
use crate::models::reservation::{
    compute_total_price, CreateReservationRequest, PaymentMethod, PaymentStatus,
    ReservationFilters, ReservationResponse, ReservationStatus, UpdatePaymentRequest,
    UpdateReservationRequest, UpdateReservationStatusRequest,
};
use crate::repositories::{
    CarRepository, NewReservation, ReservationChanges, ReservationRepository,
};
use crate::services::AvailabilityService;
use crate::utils::errors::{bad_request_error, invalid_range_error, AppError};
use crate::utils::validation::validate_date;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct ReservationController {
    repository: ReservationRepository,
    cars: CarRepository,
    availability: AvailabilityService,
}

impl ReservationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReservationRepository::new(pool.clone()),
            cars: CarRepository::new(pool.clone()),
            availability: AvailabilityService::new(pool),
        }
    }

    /// Crea una reserva en estado pending. Si la request no trae precio se
    /// calcula como días × tarifa diaria del coche.
    pub async fn create(
        &self,
        request: CreateReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        // Validar campos
        request.validate()?;

        let (start_date, end_date) =
            AvailabilityService::parse_period(&request.start_date, &request.end_date)?;

        let car = self
            .cars
            .find_by_id(request.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coche no encontrado".to_string()))?;

        // Chequeo amistoso de solape; el repositorio lo repite dentro de la
        // transacción antes de insertar
        let conflicts = self
            .availability
            .find_conflicts(request.car_id, start_date, end_date, None)
            .await?;
        if !conflicts.is_empty() {
            return Err(AppError::Conflict(
                "Car is already reserved for an overlapping period".to_string(),
            ));
        }

        let total_price = request
            .total_price
            .unwrap_or_else(|| compute_total_price(car.daily_price, start_date, end_date));

        let payment_method = request.payment_method.as_deref().and_then(PaymentMethod::parse);
        let payment_status = request
            .payment_status
            .as_deref()
            .and_then(PaymentStatus::parse)
            .or(Some(PaymentStatus::Unpaid));

        let reservation = self
            .repository
            .create_guarded(&NewReservation {
                client_id: request.client_id,
                car_id: request.car_id,
                start_date,
                end_date,
                total_price,
                payment_method,
                payment_status,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            ReservationResponse::from(reservation),
            "Reserva creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ReservationResponse, AppError> {
        let reservation = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        Ok(ReservationResponse::from(reservation))
    }

    pub async fn list(
        &self,
        filters: ReservationFilters,
    ) -> Result<Vec<ReservationResponse>, AppError> {
        let reservations = self.repository.find_all(&filters).await?;
        Ok(reservations.into_iter().map(ReservationResponse::from).collect())
    }

    /// Reprograma una reserva. Los campos ausentes conservan su valor actual;
    /// si cambian las fechas o el coche y no llega precio nuevo, se recalcula.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        let client_id = request.client_id.unwrap_or(current.client_id);
        let car_id = request.car_id.unwrap_or(current.car_id);

        let start_date = match request.start_date.as_deref() {
            Some(raw) => validate_date(raw)
                .map_err(|_| invalid_range_error("start_date must be a valid YYYY-MM-DD date"))?,
            None => current.start_date,
        };
        let end_date = match request.end_date.as_deref() {
            Some(raw) => validate_date(raw)
                .map_err(|_| invalid_range_error("end_date must be a valid YYYY-MM-DD date"))?,
            None => current.end_date,
        };
        if start_date >= end_date {
            return Err(invalid_range_error("start_date must be strictly before end_date"));
        }

        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coche no encontrado".to_string()))?;

        let period_changed = car_id != current.car_id
            || start_date != current.start_date
            || end_date != current.end_date;

        // Solo las reservas activas compiten por el coche
        let is_active = matches!(
            current.reservation_status,
            ReservationStatus::Pending | ReservationStatus::Accepted
        );
        if is_active && period_changed {
            let conflicts = self
                .availability
                .find_conflicts(car_id, start_date, end_date, Some(id))
                .await?;
            if !conflicts.is_empty() {
                return Err(AppError::Conflict(
                    "Car is already reserved for an overlapping period".to_string(),
                ));
            }
        }

        let total_price = request.total_price.unwrap_or_else(|| {
            if period_changed {
                compute_total_price(car.daily_price, start_date, end_date)
            } else {
                current.total_price
            }
        });

        let payment_method = request
            .payment_method
            .as_deref()
            .and_then(PaymentMethod::parse)
            .or(current.payment_method);
        let payment_status = request
            .payment_status
            .as_deref()
            .and_then(PaymentStatus::parse)
            .or(current.payment_status);

        let reservation = self
            .repository
            .update_guarded(
                id,
                &ReservationChanges {
                    client_id,
                    car_id,
                    start_date,
                    end_date,
                    total_price,
                    payment_method,
                    payment_status,
                },
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            ReservationResponse::from(reservation),
            "Reserva actualizada exitosamente".to_string(),
        ))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateReservationStatusRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        request.validate()?;

        let next = ReservationStatus::parse(&request.status)
            .ok_or_else(|| bad_request_error("Unknown reservation status"))?;

        let reservation = self.repository.update_status(id, &next).await?;

        Ok(ApiResponse::success_with_message(
            ReservationResponse::from(reservation),
            "Estado de la reserva actualizado exitosamente".to_string(),
        ))
    }

    pub async fn update_payment(
        &self,
        id: Uuid,
        request: UpdatePaymentRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        request.validate()?;

        let payment_method = request.payment_method.as_deref().and_then(PaymentMethod::parse);
        let payment_status = PaymentStatus::parse(&request.payment_status)
            .ok_or_else(|| bad_request_error("Unknown payment status"))?;

        let reservation = self
            .repository
            .update_payment(id, payment_method, payment_status)
            .await?;

        Ok(ApiResponse::success_with_message(
            ReservationResponse::from(reservation),
            "Pago registrado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        Ok(())
    }
}
