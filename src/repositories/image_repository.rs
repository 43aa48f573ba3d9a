//! Repositorio de fotos de coches
//!
//! Solo lectura: las escrituras pasan por CarRepository::attach_image para
//! mantener coche y foto consistentes en una sola transacción.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::image::CarImage;
use crate::utils::errors::AppError;

pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CarImage>, AppError> {
        let image = sqlx::query_as::<_, CarImage>("SELECT * FROM car_images WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(image)
    }
}
