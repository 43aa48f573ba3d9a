use crate::models::image::CarImage;
use crate::repositories::ImageRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ImageController {
    repository: ImageRepository,
}

impl ImageController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ImageRepository::new(pool),
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CarImage, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Imagen no encontrada".to_string()))
    }
}
