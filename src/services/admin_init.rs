//! Inicialización de la cuenta admin
//!
//! Al arrancar, si no existe ningún admin activo se crea uno con las
//! credenciales de ADMIN_EMAIL / ADMIN_PASSWORD.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::environment::EnvironmentConfig;
use crate::models::manager::CreateManagerRequest;
use crate::repositories::ManagerRepository;
use crate::utils::errors::AppError;

/// Crea la cuenta admin inicial si hace falta. Idempotente.
pub async fn ensure_default_admin(pool: &PgPool, config: &EnvironmentConfig) -> Result<(), AppError> {
    let repository = ManagerRepository::new(pool.clone());

    if repository.count_active_admins().await? > 0 {
        return Ok(());
    }

    let password_hash = bcrypt::hash(&config.admin_password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Hash(e.to_string()))?;

    let request = CreateManagerRequest {
        first_name: "Admin".to_string(),
        last_name: "Principal".to_string(),
        email: config.admin_email.clone(),
        password: config.admin_password.clone(),
        phone: None,
        role: Some("admin".to_string()),
    };

    let manager = repository.create(&request, password_hash).await?;
    info!("👤 Cuenta admin inicial creada: {}", manager.email);
    if config.admin_password == "admin123" {
        warn!("⚠️ ADMIN_PASSWORD sigue siendo la de por defecto, cámbiala");
    }

    Ok(())
}
