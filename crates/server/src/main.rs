//! Warbler server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warbler_api::{auth_middleware, router as api_router, AppState};
use warbler_common::{
    config::{LogFormat, MediaConfig},
    Config, LocalStorage, StorageService,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
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
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warbler=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// The full application: `/api`, the media directory, and the shared layers.
fn build_app(state: AppState, media: &MediaConfig) -> Router {
    let media_route = format!("/{}", media.public_root().trim_matches('/'));

    Router::new()
        .nest("/api", api_router())
        .nest_service(&media_route, ServeDir::new(&media.dir))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(config.log.format);

    info!("Starting warbler server...");

    let db = warbler_db::init(&config.database).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    warbler_db::migrate(&db).await?;
    info!("Migrations completed");

    if config.seed.demo_data && warbler_db::seed::seed_demo_data(&db).await? {
        info!("Demo data seeded");
    }

    tokio::fs::create_dir_all(&config.media.dir).await?;
    let storage: StorageService = Arc::new(LocalStorage::new(
        config.media.dir.clone(),
        config.media.public_root(),
    ));
    info!(
        dir = %config.media.dir.display(),
        root = %config.media.public_root(),
        "Media storage ready"
    );

    let state = AppState::new(Arc::new(db), storage);
    let app = build_app(state, &config.media);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;
    use warbler_common::IdGenerator;

    fn media_config() -> MediaConfig {
        MediaConfig {
            dir: std::env::temp_dir()
                .join(format!("warbler-server-{}", IdGenerator::new().generate())),
            public_root: None,
        }
    }

    fn app(media: &MediaConfig) -> Router {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let storage: StorageService =
            Arc::new(LocalStorage::new(media.dir.clone(), media.public_root()));
        build_app(AppState::new(db, storage), media)
    }

    #[tokio::test]
    async fn test_serves_uploaded_media() {
        let media = media_config();
        std::fs::create_dir_all(&media.dir).unwrap();
        std::fs::write(media.dir.join("a.tmp"), b"bytes").unwrap();

        let uri = format!("/{}/a.tmp", media.public_root());
        let response = app(&media)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_requires_key() {
        let media = media_config();
        let response = app(&media)
            .oneshot(Request::builder().uri("/api/tweets").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
