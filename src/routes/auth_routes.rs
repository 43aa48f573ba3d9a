use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::middleware::auth::AuthenticatedManager;
use crate::models::manager::ManagerResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_public_router() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}

pub fn create_auth_protected_router() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt_config());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedManager>,
) -> Result<Json<ManagerResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt_config());
    let response = controller.me(auth.manager_id).await?;
    Ok(Json(response))
}
