use crate::models::dashboard::{
    CalendarQuery, CalendarReservation, DashboardStats, UpcomingQuery, UpcomingReservation,
};
use crate::repositories::DashboardRepository;
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::validate_uuid;
use chrono::Utc;
use sqlx::PgPool;

pub struct DashboardController {
    repository: DashboardRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DashboardRepository::new(pool),
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        self.repository.stats(Utc::now().date_naive()).await
    }

    pub async fn upcoming(&self, query: UpcomingQuery) -> Result<Vec<UpcomingReservation>, AppError> {
        let limit = query.limit.unwrap_or(10).clamp(1, 100);
        self.repository.upcoming(Utc::now().date_naive(), limit).await
    }

    pub async fn calendar(&self, query: CalendarQuery) -> Result<Vec<CalendarReservation>, AppError> {
        let car_id = match query.car_id.as_deref() {
            Some(raw) => Some(
                validate_uuid(raw).map_err(|_| bad_request_error("car_id must be a valid UUID"))?,
            ),
            None => None,
        };

        self.repository.calendar(car_id).await
    }
}
