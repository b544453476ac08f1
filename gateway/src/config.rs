use binance_client::Credentials;

pub const DEFAULT_REST_ENDPOINT: &str = "https://api.binance.us";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Process-wide configuration, read once at startup and passed into the
/// adapter constructor instead of scattering env reads across handlers.
#[derive(Clone)]
pub struct GatewayConfig {
    pub credentials: Credentials,
    /// Exchange region selector: the REST endpoint queried by every
    /// adapter call.
    pub rest_endpoint: String,
    pub bind_addr: String,
}

impl GatewayConfig {
    /// Missing credentials are not fatal here: the process stays up so
    /// `/health` can report the misconfiguration.
    pub fn from_env() -> Self {
        let api_key = std::env::var("BINANCE_API_KEY").unwrap_or_default();
        let secret_key = std::env::var("BINANCE_SECRET_KEY").unwrap_or_default();
        let rest_endpoint = std::env::var("BINANCE_API_URL")
            .unwrap_or_else(|_| DEFAULT_REST_ENDPOINT.to_string());
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self {
            credentials: Credentials::new(api_key, secret_key),
            rest_endpoint,
            bind_addr,
        }
    }
}
