use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::clientes::ClienteService;
use service::facturas::FacturaService;
use service::fotos::FotoService;
use service::store::seaorm::SeaOrmStore;
use service::store::RecordStore;

use crate::auth::{ServerAuthConfig, ServerState};
use crate::routes;

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

fn load_jwt_secret() -> String {
    if let Ok(cfg) = configs::load_default() {
        if !cfg.auth.jwt_secret.is_empty() {
            return cfg.auth.jwt_secret;
        }
    }
    env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let db = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => models::db::connect_with_config(&cfg.database).await?,
        Err(_) => models::db::connect().await?,
    };

    let store: Arc<dyn RecordStore> = Arc::new(SeaOrmStore::new(db));
    let state = ServerState {
        auth: ServerAuthConfig { jwt_secret: load_jwt_secret() },
        clientes: Arc::new(ClienteService::new(Arc::clone(&store))),
        facturas: Arc::new(FacturaService::new(Arc::clone(&store))),
        fotos: Arc::new(FotoService::new(Arc::clone(&store))),
    };

    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    let addr = load_bind_addr()?;
    info!(%addr, "starting biodigestor server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
