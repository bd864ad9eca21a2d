use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use scoopo::config::AppConfig;
use scoopo::handlers;
use scoopo::services::email::resend::ResendMailer;
use scoopo::state::AppState;
use scoopo::storage::{BookingStore, MemoryStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    // Storage is picked once here; nothing downstream knows which mode is
    // running. The in-memory store loses everything on restart, hence the
    // loud warnings.
    let store: Box<dyn BookingStore> = match config.database_url.as_deref() {
        Some(url) => match SqliteStore::open(url) {
            Ok(store) => {
                tracing::info!(database = url, "using sqlite booking store");
                Box::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "could not open database, falling back to in-memory store; bookings will not survive a restart"
                );
                Box::new(MemoryStore::new())
            }
        },
        None => {
            tracing::warn!(
                "DATABASE_URL not set, using in-memory store; bookings will not survive a restart"
            );
            Box::new(MemoryStore::new())
        }
    };

    let mailer = ResendMailer::new(config.resend_api_key.clone(), config.from_email.clone());

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        mailer: Box::new(mailer),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/bookings",
            post(handlers::bookings::create_booking).get(handlers::admin::list_bookings),
        )
        .route(
            "/api/bookings/:id",
            patch(handlers::admin::update_booking).delete(handlers::admin::delete_booking),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
