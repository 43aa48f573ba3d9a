//! Modelo de CarImage
//!
//! Las fotos de los coches se guardan en la tabla car_images como BYTEA
//! y se sirven por streaming desde /api/image/:id.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Content types aceptados para las fotos de coches
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Tamaño máximo de una foto subida
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// CarImage principal - mapea exactamente a la tabla car_images
#[derive(Debug, Clone, FromRow)]
pub struct CarImage {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Response tras subir una foto
#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub image_id: Uuid,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_image_types() {
        assert!(is_allowed_image_type("image/jpeg"));
        assert!(is_allowed_image_type("image/png"));
        assert!(!is_allowed_image_type("application/pdf"));
        assert!(!is_allowed_image_type("text/html"));
    }
}
