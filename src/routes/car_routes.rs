use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use crate::controllers::car_controller::CarController;
use crate::dto::api_response::ApiResponse;
use crate::models::car::{
    AvailabilityQuery, CarFilters, CarResponse, CreateCarRequest, UpdateCarRequest,
};
use crate::models::image::{UploadImageResponse, MAX_IMAGE_BYTES};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};
use uuid::Uuid;

/// Rutas de coches accesibles sin token: el catálogo es público.
pub fn create_car_public_router() -> Router<AppState> {
    Router::new()
        .route("/api/car", get(list_cars))
        .route("/api/car/available", get(list_available_cars))
        .route("/api/car/:id", get(get_car))
}

/// Rutas de coches con escritura, solo para gestores autenticados.
pub fn create_car_protected_router() -> Router<AppState> {
    Router::new()
        .route("/api/car", post(create_car))
        .route("/api/car/:id", put(update_car))
        .route("/api/car/:id", delete(delete_car))
        .route(
            "/api/car/:id/image",
            // Margen sobre el tamaño máximo de imagen para el framing multipart
            post(upload_car_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024)),
        )
}

async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CarResponse>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(filters): Query<CarFilters>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn list_available_cars(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.list_available(query).await?;
    Ok(Json(response))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = CarController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Coche eliminado exitosamente"
    })))
}

async fn upload_car_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadImageResponse>>, AppError> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request_error(&format!("Invalid multipart payload: {}", e)))?
    {
        if matches!(field.name(), Some("image") | Some("file")) {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request_error(&format!("Invalid multipart payload: {}", e)))?
                .to_vec();
            upload = Some((file_name, content_type, data));
            break;
        }
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| bad_request_error("Missing 'image' field in multipart payload"))?;

    let controller = CarController::new(state.pool.clone());
    let response = controller.upload_image(id, file_name, content_type, data).await?;
    Ok(Json(response))
}
