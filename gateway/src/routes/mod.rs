mod balance;
mod exchange_info;
mod health;
mod market;
mod orders;
mod trade;

pub use balance::{account_balances, BalanceEntry};
pub use exchange_info::{exchange_summary, ExchangeInfoResponse, ListedSymbol};
pub use health::HealthResponse;
pub use market::{market_detail, market_overview, ChartPoint, MarketSnapshot};
pub use orders::{
    cancel, open_orders, trade_history, CancelAck, OpenOrderEntry, TradeHistoryEntry,
};
pub use trade::{submit, validate, OrderKind, OrderResult, Side, TradeRequest, ValidatedOrder};

use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use binance_client::ClientError;
use chrono::TimeZone;
use serde::Serialize;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health::get_health))
        .route("/api/balance", get(balance::get_balance))
        .route("/api/market-overview", get(market::get_market_overview))
        .route("/api/market/:symbol", get(market::get_market_data))
        .route("/api/trade", post(trade::execute_trade))
        .route("/api/history", get(orders::get_trade_history))
        .route("/api/orders/:symbol", get(orders::get_open_orders))
        .route("/api/orders/:symbol/:order_id", delete(orders::delete_order))
        .route("/api/exchange-info", get(exchange_info::get_exchange_info))
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Binance Trading API is running".to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps an adapter failure to the client-facing status: an explicit
/// exchange rejection passes through as a 400 with the exchange's own
/// code and message, everything else is a 500.
pub(crate) fn exchange_error(
    context: &str,
    err: ClientError,
) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ClientError::Upstream { code, message } => {
            tracing::warn!("{}: exchange rejected request (code {}): {}", context, code, message);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Binance API error (code {}): {}", code, message),
                }),
            )
        }
        other => {
            tracing::error!("{}: {}", context, other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to {}: {}", context, other),
                }),
            )
        }
    }
}

/// Formats an exchange millisecond timestamp in the server's local time,
/// the pre-formatting the dashboard contract expects.
pub(crate) fn format_local(millis: i64, fmt: &str) -> String {
    chrono::Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_default()
}
