use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use despachante_admin::config::{DataBackend, DatabaseConfig, EnvironmentConfig};
use despachante_admin::database::connect_and_migrate;
use despachante_admin::repositories::{DataStore, MemoryStore, PgStore};
use despachante_admin::routes::create_router;
use despachante_admin::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG tiene prioridad)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("📋 Despachante Admin - API");
    info!("==========================");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuración inválida: {}", e);
            return Err(e.into());
        }
    };

    let store: Arc<dyn DataStore> = match config.data_backend {
        DataBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = connect_and_migrate(&db_config).await?;
            Arc::new(PgStore::new(pool))
        }
        DataBackend::Memory => {
            warn!("⚠️ DATA_BACKEND=memory: los datos se pierden al reiniciar");
            Arc::new(MemoryStore::new())
        }
    };

    if config.cors_origins.is_empty() && !config.is_development() {
        warn!("⚠️ CORS_ORIGINS vacío fuera de desarrollo: se acepta cualquier origen");
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let state = AppState::from_config(config, store);
    let app = create_router(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   /api/clients, /api/vehicles, /api/services, /api/transactions");
    info!("   /api/dashboard/{{alerts,financial,overview}}");
    info!("   /api/checklist-templates, /api/audit-logs, /api/admin/users");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
