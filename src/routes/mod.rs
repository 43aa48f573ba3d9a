//! Ensamblado del router de la API
//!
//! Tres grupos de rutas: públicas (catálogo, fotos, login), protegidas
//! (gestión diaria con token) y de administración (cuentas del personal).

pub mod auth_routes;
pub mod car_routes;
pub mod client_routes;
pub mod dashboard_routes;
pub mod image_routes;
pub mod manager_routes;
pub mod reservation_routes;

use axum::{middleware as axum_middleware, routing::get, Json, Router};
use serde_json::json;

use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    // Catálogo, fotos y login: sin token
    let public = Router::new()
        .route("/health", get(health_check))
        .merge(car_routes::create_car_public_router())
        .merge(image_routes::create_image_router())
        .merge(auth_routes::create_auth_public_router());

    // Gestión diaria: cualquier gestor autenticado y activo
    let protected = Router::new()
        .merge(car_routes::create_car_protected_router())
        .merge(client_routes::create_client_router())
        .merge(reservation_routes::create_reservation_router())
        .merge(dashboard_routes::create_dashboard_router())
        .merge(auth_routes::create_auth_protected_router())
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Cuentas del personal: solo admins. El layer de auth corre primero
    // e inyecta el gestor que admin_only comprueba.
    let admin = Router::new()
        .merge(manager_routes::create_manager_router())
        .route_layer(axum_middleware::from_fn(admin_only_middleware))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    let cors = if state.config.cors_origins == vec!["*".to_string()] {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "rental-management-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
