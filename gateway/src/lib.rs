pub mod config;
pub mod routes;
pub mod symbols;
pub mod valuation;

use binance_client::{BinanceClient, Result};

use config::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Per-request exchange client construction: credentials are
    /// validated and the exchange probed on every call, no pooling.
    pub async fn connect(&self) -> Result<BinanceClient> {
        BinanceClient::connect(&self.config.credentials, &self.config.rest_endpoint).await
    }
}
