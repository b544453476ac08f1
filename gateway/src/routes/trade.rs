use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use binance_client::{ExchangeApi, OrderAck, Result};
use serde::{Deserialize, Serialize};

use super::{exchange_error, ErrorResponse};
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub quantity: String,
    #[serde(default)]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderKind {
    Market,
    /// Limit orders carry their price here, so dispatch cannot reach a
    /// priceless limit order by construction.
    Limit {
        price: String,
    },
}

#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub symbol: String,
    pub side: Side,
    pub quantity: String,
    pub kind: OrderKind,
}

#[derive(Debug, Serialize)]
pub struct OrderResult {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub symbol: String,
    pub status: String,
    #[serde(rename = "executedQty")]
    pub executed_qty: String,
    pub price: String,
    #[serde(rename = "transactTime")]
    pub transact_time: i64,
}

pub(super) async fn execute_trade(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> std::result::Result<Json<OrderResult>, (StatusCode, Json<ErrorResponse>)> {
    // Validation happens before the exchange client is even constructed,
    // so a malformed request triggers no network traffic at all.
    let order = validate(&request).map_err(|error| {
        tracing::warn!("rejected trade request: {}", error);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
    })?;

    let client = state
        .connect()
        .await
        .map_err(|e| exchange_error("execute trade", e))?;

    let result = submit(&client, &order)
        .await
        .map_err(|e| exchange_error("execute trade", e))?;

    tracing::info!(
        "order placed: {:?} {:?} {} x {} (order id {})",
        order.side,
        order.kind,
        order.symbol,
        order.quantity,
        result.order_id
    );

    Ok(Json(result))
}

pub fn validate(request: &TradeRequest) -> std::result::Result<ValidatedOrder, String> {
    let side = match request.side.as_str() {
        "BUY" => Side::Buy,
        "SELL" => Side::Sell,
        _ => return Err("Invalid side. Must be BUY or SELL".to_string()),
    };

    let kind = match request.order_type.as_str() {
        "MARKET" => OrderKind::Market,
        "LIMIT" => match request.price.as_deref() {
            Some(price) if !price.is_empty() => OrderKind::Limit {
                price: price.to_string(),
            },
            _ => return Err("Price is required for LIMIT orders".to_string()),
        },
        _ => return Err("Invalid type. Must be MARKET or LIMIT".to_string()),
    };

    Ok(ValidatedOrder {
        symbol: request.symbol.clone(),
        side,
        quantity: request.quantity.clone(),
        kind,
    })
}

/// Dispatches to exactly one of the four placement operations and
/// normalizes the acknowledgment. Never retried: submission is
/// at-most-once to avoid duplicate fills.
pub async fn submit(api: &dyn ExchangeApi, order: &ValidatedOrder) -> Result<OrderResult> {
    let ack = match (order.side, &order.kind) {
        (Side::Buy, OrderKind::Market) => api.market_buy(&order.symbol, &order.quantity).await?,
        (Side::Buy, OrderKind::Limit { price }) => {
            api.limit_buy(&order.symbol, &order.quantity, price).await?
        }
        (Side::Sell, OrderKind::Market) => api.market_sell(&order.symbol, &order.quantity).await?,
        (Side::Sell, OrderKind::Limit { price }) => {
            api.limit_sell(&order.symbol, &order.quantity, price).await?
        }
    };

    Ok(ack_to_result(ack))
}

fn ack_to_result(ack: OrderAck) -> OrderResult {
    OrderResult {
        order_id: ack.order_id.to_string(),
        symbol: ack.symbol,
        status: ack.status,
        executed_qty: ack.executed_qty,
        price: ack.price.unwrap_or_else(|| "N/A".to_string()),
        transact_time: ack.transact_time,
    }
}
