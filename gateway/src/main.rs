use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;

use gateway::config::GatewayConfig;
use gateway::{routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info".into()),
        )
        .init();

    let config = GatewayConfig::from_env();
    if config.credentials.is_configured() {
        tracing::info!("exchange credentials loaded from environment");
    } else {
        tracing::warn!(
            "BINANCE_API_KEY / BINANCE_SECRET_KEY not set; only /health will succeed"
        );
    }
    tracing::info!("using exchange endpoint {}", config.rest_endpoint);

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config);

    let app = routes::router().layer(cors_layer()).with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Trading gateway listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer() -> CorsLayer {
    // Credentials mode requires explicit origins, methods, and headers
    let allowed_headers = [CONTENT_TYPE, ACCEPT];
    let allowed_methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        tracing::info!("CORS restricted to: {:?}", allowed);
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .allow_credentials(true)
    } else {
        // Development: the dashboard dev server
        let dev_origins: Vec<HeaderValue> = ["http://localhost:3000", "http://127.0.0.1:3000"]
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(dev_origins)
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .allow_credentials(true)
    }
}
