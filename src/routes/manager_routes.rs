use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use crate::controllers::manager_controller::ManagerController;
use crate::dto::api_response::ApiResponse;
use crate::middleware::auth::AuthenticatedManager;
use crate::models::manager::{
    CreateManagerRequest, ManagerFilters, ManagerResponse, UpdateManagerRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

/// Gestión de cuentas del personal. Todo el router exige rol admin.
pub fn create_manager_router() -> Router<AppState> {
    Router::new()
        .route("/api/manager", post(create_manager))
        .route("/api/manager", get(list_managers))
        .route("/api/manager/:id", get(get_manager))
        .route("/api/manager/:id", put(update_manager))
        .route("/api/manager/:id", delete(delete_manager))
}

async fn create_manager(
    State(state): State<AppState>,
    Json(request): Json<CreateManagerRequest>,
) -> Result<Json<ApiResponse<ManagerResponse>>, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_manager(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ManagerResponse>, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_managers(
    State(state): State<AppState>,
    Query(filters): Query<ManagerFilters>,
) -> Result<Json<Vec<ManagerResponse>>, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn update_manager(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateManagerRequest>,
) -> Result<Json<ApiResponse<ManagerResponse>>, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_manager(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedManager>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = ManagerController::new(state.pool.clone());
    controller.delete(id, auth.manager_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Gestor eliminado exitosamente"
    })))
}
