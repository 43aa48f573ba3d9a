use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use rental_management::config::database::{mask_database_url, run_migrations, DatabaseConfig};
use rental_management::config::environment::EnvironmentConfig;
use rental_management::routes::create_router;
use rental_management::services::admin_init::ensure_default_admin;
use rental_management::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Rental Management - API de gestión de alquiler");
    info!("=================================================");

    // Inicializar base de datos
    let db_config = DatabaseConfig::default();
    info!("🗄️ Conectando a {}", mask_database_url(&db_config.url));

    let pool = match db_config.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Aplicar migraciones pendientes
    if let Err(e) = run_migrations(&pool).await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Migraciones aplicadas");

    // Garantizar que existe al menos una cuenta admin
    let env_config = EnvironmentConfig::default();
    if let Err(e) = ensure_default_admin(&pool, &env_config).await {
        error!("❌ Error inicializando cuenta admin: {}", e);
        return Err(anyhow::anyhow!("Error de inicialización: {}", e));
    }

    // Crear router de la API
    let server_addr = env_config.server_url();
    let app_state = AppState::new(pool, env_config);
    let app = create_router(app_state);

    let addr: SocketAddr = server_addr.parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Endpoints - Auth:");
    info!("   POST /api/auth/login - Login de gestor");
    info!("   GET  /api/auth/me - Gestor autenticado");
    info!("🚗 Endpoints - Car:");
    info!("   GET  /api/car - Listar coches (público)");
    info!("   GET  /api/car/available - Coches disponibles en un período (público)");
    info!("   GET  /api/car/:id - Obtener coche (público)");
    info!("   POST /api/car - Crear coche");
    info!("   PUT  /api/car/:id - Actualizar coche");
    info!("   DELETE /api/car/:id - Eliminar coche");
    info!("   POST /api/car/:id/image - Subir foto del coche");
    info!("🖼️ Endpoints - Image:");
    info!("   GET  /api/image/:id - Servir foto (público)");
    info!("👥 Endpoints - Client:");
    info!("   POST /api/client - Crear cliente");
    info!("   GET  /api/client - Listar clientes");
    info!("   GET  /api/client/:id - Obtener cliente");
    info!("   PUT  /api/client/:id - Actualizar cliente");
    info!("   DELETE /api/client/:id - Eliminar cliente");
    info!("📅 Endpoints - Reservation:");
    info!("   POST /api/reservation - Crear reserva");
    info!("   GET  /api/reservation - Listar reservas");
    info!("   GET  /api/reservation/:id - Obtener reserva");
    info!("   PUT  /api/reservation/:id - Reprogramar reserva");
    info!("   PATCH /api/reservation/:id/status - Aceptar o rechazar");
    info!("   PATCH /api/reservation/:id/payment - Registrar pago");
    info!("   DELETE /api/reservation/:id - Eliminar reserva");
    info!("📊 Endpoints - Dashboard:");
    info!("   GET  /api/dashboard/stats - Resumen de la agencia");
    info!("   GET  /api/dashboard/upcoming - Próximas reservas");
    info!("   GET  /api/dashboard/calendar - Calendario de reservas");
    info!("👤 Endpoints - Manager (solo admin):");
    info!("   POST /api/manager - Crear gestor");
    info!("   GET  /api/manager - Listar gestores");
    info!("   GET  /api/manager/:id - Obtener gestor");
    info!("   PUT  /api/manager/:id - Actualizar gestor");
    info!("   DELETE /api/manager/:id - Eliminar gestor");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
