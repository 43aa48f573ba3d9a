use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use crate::controllers::image_controller::ImageController;
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_image_router() -> Router<AppState> {
    Router::new().route("/api/image/:id", get(get_image))
}

/// Sirve los bytes de la foto con su content type original.
async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let controller = ImageController::new(state.pool.clone());
    let image = controller.get_by_id(id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", image.file_name),
            ),
        ],
        image.data,
    )
        .into_response())
}
