use axum::Router;
use santa_tracker_rs::{config, routes, state};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "santa_tracker_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let port = config.port;
    tracing::info!("Route feed: {}", config.feed_url);
    let state = state::AppState::new(config);

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::progress::router())
        .merge(routes::map::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    tracing::info!("Santa tracker listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Progress: GET http://{}/api/progress", addr);
    tracing::info!("Map: GET http://{}/api/map?format=png", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }
}
