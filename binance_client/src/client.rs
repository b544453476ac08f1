use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::Sha256;
use tracing::{debug, warn};

use crate::error::{ApiErrorEnvelope, ClientError, Result};
use crate::traits::ExchangeApi;
use crate::types::{
    AccountSnapshot, CanceledOrder, ExchangeInfo, Fill, Kline, OpenOrder, OrderAck, Ticker24h,
    TickerPrice,
};

const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type HmacSha256 = Hmac<Sha256>;

/// Exchange API key pair. Both halves are required for every signed call.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

/// Authenticated REST client for one exchange region. Holds no mutable
/// cross-call state; constructed per request and dropped at request end.
#[derive(Debug)]
pub struct BinanceClient {
    http: reqwest::Client,
    api_key: String,
    secret_key: String,
    base_url: String,
}

impl BinanceClient {
    /// Validates the credentials, builds the HTTP plumbing and issues a
    /// liveness probe. An exchange-level probe rejection is logged and
    /// construction proceeds; a transport failure during the probe fails
    /// construction with [`ClientError::Connect`].
    pub async fn connect(credentials: &Credentials, base_url: &str) -> Result<Self> {
        if !credentials.is_configured() {
            return Err(ClientError::Config(
                "BINANCE_API_KEY and BINANCE_SECRET_KEY must both be set".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Connect(e.to_string()))?;

        let client = Self {
            http,
            api_key: credentials.api_key.clone(),
            secret_key: credentials.secret_key.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        };

        match client.ping().await {
            Ok(()) => debug!("exchange liveness probe ok"),
            Err(ClientError::Transport(message)) => return Err(ClientError::Connect(message)),
            Err(err) => warn!("exchange liveness probe failed: {}", err),
        }

        Ok(client)
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    fn encode(params: &[(&str, String)]) -> String {
        params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Appends the timestamp and an HMAC-SHA256 signature over the full
    /// query string, as the exchange's signed endpoints require.
    fn signed_query(&self, params: &[(&str, String)]) -> String {
        let mut query = Self::encode(params);
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!("timestamp={}", timestamp_ms()));
        let signature = sign_payload(&self.secret_key, &query);
        format!("{}&signature={}", query, signature)
    }

    async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(self.url(path, &Self::encode(params)))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(self.url(path, &self.signed_query(params)))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(path, &self.signed_query(params)))
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .delete(self.url(path, &self.signed_query(params)))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
        } else {
            Err(Self::map_error(status, &body))
        }
    }

    /// An explicit rejection envelope from the exchange becomes
    /// `Upstream` (the caller's "tell the user" case); exchange-side 5xx
    /// is treated like any other connectivity fault.
    fn map_error(status: StatusCode, body: &str) -> ClientError {
        if status.is_server_error() {
            return ClientError::Transport(format!("exchange returned HTTP {}", status));
        }
        match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => ClientError::Upstream {
                code: envelope.code,
                message: envelope.msg,
            },
            Err(_) => ClientError::Upstream {
                code: -1,
                message: format!("HTTP {}: {}", status, body),
            },
        }
    }

    async fn place(&self, params: &[(&str, String)]) -> Result<OrderAck> {
        self.post_signed("/api/v3/order", params).await
    }
}

#[async_trait]
impl ExchangeApi for BinanceClient {
    async fn ping(&self) -> Result<()> {
        let _: Value = self.get_public("/api/v3/ping", &[]).await?;
        Ok(())
    }

    async fn account(&self) -> Result<AccountSnapshot> {
        self.get_signed("/api/v3/account", &[]).await
    }

    async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice> {
        self.get_public("/api/v3/ticker/price", &[("symbol", symbol.to_string())])
            .await
    }

    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h> {
        self.get_public("/api/v3/ticker/24hr", &[("symbol", symbol.to_string())])
            .await
    }

    async fn klines(&self, symbol: &str, interval: &str, limit: u16) -> Result<Vec<Kline>> {
        let rows: Vec<Vec<Value>> = self
            .get_public(
                "/api/v3/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        rows.iter().map(|row| Kline::from_row(row)).collect()
    }

    async fn market_buy(&self, symbol: &str, quantity: &str) -> Result<OrderAck> {
        self.place(&[
            ("symbol", symbol.to_string()),
            ("side", "BUY".to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", quantity.to_string()),
        ])
        .await
    }

    async fn limit_buy(&self, symbol: &str, quantity: &str, price: &str) -> Result<OrderAck> {
        self.place(&[
            ("symbol", symbol.to_string()),
            ("side", "BUY".to_string()),
            ("type", "LIMIT".to_string()),
            ("quantity", quantity.to_string()),
            ("price", price.to_string()),
            ("timeInForce", "GTC".to_string()),
        ])
        .await
    }

    async fn market_sell(&self, symbol: &str, quantity: &str) -> Result<OrderAck> {
        self.place(&[
            ("symbol", symbol.to_string()),
            ("side", "SELL".to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", quantity.to_string()),
        ])
        .await
    }

    async fn limit_sell(&self, symbol: &str, quantity: &str, price: &str) -> Result<OrderAck> {
        self.place(&[
            ("symbol", symbol.to_string()),
            ("side", "SELL".to_string()),
            ("type", "LIMIT".to_string()),
            ("quantity", quantity.to_string()),
            ("price", price.to_string()),
            ("timeInForce", "GTC".to_string()),
        ])
        .await
    }

    async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<CanceledOrder> {
        self.delete_signed(
            "/api/v3/order",
            &[
                ("symbol", symbol.to_string()),
                ("orderId", order_id.to_string()),
            ],
        )
        .await
    }

    async fn open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>> {
        self.get_signed("/api/v3/openOrders", &[("symbol", symbol.to_string())])
            .await
    }

    async fn my_trades(&self, symbol: &str, limit: u16) -> Result<Vec<Fill>> {
        self.get_signed(
            "/api/v3/myTrades",
            &[
                ("symbol", symbol.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.get_public("/api/v3/exchangeInfo", &[]).await
    }
}

fn timestamp_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn sign_payload(secret: &str, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
