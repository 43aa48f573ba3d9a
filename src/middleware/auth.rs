//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de gestores autenticados.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::{
    models::manager::ManagerRole,
    repositories::ManagerRepository,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{validate_token_format, verify_token},
};

/// Gestor autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedManager {
    pub manager_id: Uuid,
    pub email: String,
    pub role: ManagerRole,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    validate_token_format(token)?;

    // Decodificar y validar JWT
    let claims = verify_token(token, &state.jwt_config())
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    let manager_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de gestor inválido".to_string()))?;

    // Verificar que el gestor sigue existiendo y activo
    let manager = ManagerRepository::new(state.pool.clone())
        .find_by_id(manager_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Gestor no encontrado".to_string()))?;

    if !manager.is_active() {
        return Err(AppError::Unauthorized("Cuenta inactiva o suspendida".to_string()));
    }

    let authenticated_manager = AuthenticatedManager {
        manager_id: manager.id,
        email: manager.email,
        role: manager.role,
    };

    // Inyectar gestor autenticado en las extensions
    request.extensions_mut().insert(authenticated_manager);

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(
    Extension(manager): Extension<AuthenticatedManager>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if manager.role != ManagerRole::Admin {
        return Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
