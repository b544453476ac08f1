use axum::extract::State;
use axum::Json;
use binance_client::{ExchangeApi, Result};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub api_key_present: bool,
    pub secret_key_present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Independent diagnostics for monitoring: re-derives credential
/// presence, then attempts its own client construction and account
/// probe. Every failure mode lands in the response body; this handler
/// never fails.
pub(super) async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let credentials = &state.config.credentials;
    let api_key_present = !credentials.api_key.is_empty();
    let secret_key_present = !credentials.secret_key.is_empty();
    let timestamp = chrono::Local::now().to_rfc3339();

    if !api_key_present || !secret_key_present {
        return Json(HealthResponse {
            status: "unhealthy",
            timestamp,
            api_key_present,
            secret_key_present,
            exchange_connection: None,
            error: Some("Missing API credentials".to_string()),
        });
    }

    match probe(&state).await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            timestamp,
            api_key_present,
            secret_key_present,
            exchange_connection: Some("ok".to_string()),
            error: None,
        }),
        Err(err) => {
            tracing::error!("health check failed: {}", err);
            Json(HealthResponse {
                status: "unhealthy",
                timestamp,
                api_key_present,
                secret_key_present,
                exchange_connection: None,
                error: Some(err.to_string()),
            })
        }
    }
}

async fn probe(state: &AppState) -> Result<()> {
    let client = state.connect().await?;
    client.account().await?;
    Ok(())
}
