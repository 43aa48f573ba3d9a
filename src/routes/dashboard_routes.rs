use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use crate::controllers::dashboard_controller::DashboardController;
use crate::models::dashboard::{
    CalendarQuery, CalendarReservation, DashboardStats, UpcomingQuery, UpcomingReservation,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard/stats", get(get_stats))
        .route("/api/dashboard/upcoming", get(get_upcoming))
        .route("/api/dashboard/calendar", get(get_calendar))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let response = controller.stats().await?;
    Ok(Json(response))
}

async fn get_upcoming(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Vec<UpcomingReservation>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let response = controller.upcoming(query).await?;
    Ok(Json(response))
}

async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<CalendarReservation>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let response = controller.calendar(query).await?;
    Ok(Json(response))
}
