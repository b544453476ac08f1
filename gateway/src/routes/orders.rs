use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use binance_client::{ExchangeApi, Fill, OpenOrder, Result};
use serde::Serialize;

use super::{exchange_error, format_local, ErrorResponse};
use crate::symbols::HISTORY_SYMBOLS;
use crate::AppState;

const FILLS_PER_SYMBOL: u16 = 10;
const MAX_HISTORY_ENTRIES: usize = 20;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
pub struct TradeHistoryEntry {
    pub id: i64,
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub time: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct OpenOrderEntry {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub quantity: String,
    pub price: String,
    pub status: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct CancelAck {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub symbol: String,
    pub status: String,
    pub message: String,
}

pub(super) async fn get_trade_history(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<TradeHistoryEntry>>, (StatusCode, Json<ErrorResponse>)> {
    let client = state
        .connect()
        .await
        .map_err(|e| exchange_error("fetch trade history", e))?;

    Ok(Json(trade_history(&client).await))
}

pub(super) async fn get_open_orders(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> std::result::Result<Json<Vec<OpenOrderEntry>>, (StatusCode, Json<ErrorResponse>)> {
    let client = state
        .connect()
        .await
        .map_err(|e| exchange_error("fetch open orders", e))?;

    let entries = open_orders(&client, &symbol)
        .await
        .map_err(|e| exchange_error("fetch open orders", e))?;

    Ok(Json(entries))
}

pub(super) async fn delete_order(
    State(state): State<AppState>,
    Path((symbol, order_id)): Path<(String, String)>,
) -> std::result::Result<Json<CancelAck>, (StatusCode, Json<ErrorResponse>)> {
    let client = state
        .connect()
        .await
        .map_err(|e| exchange_error("cancel order", e))?;

    let ack = cancel(&client, &symbol, &order_id)
        .await
        .map_err(|e| exchange_error("cancel order", e))?;

    Ok(Json(ack))
}

/// Recent fills merged across the fixed symbol set, newest first,
/// capped at 20. A symbol with no fills or an erroring query is skipped
/// silently. Ordering is by the numeric trade time; the formatted string
/// is display-only.
pub async fn trade_history(api: &dyn ExchangeApi) -> Vec<TradeHistoryEntry> {
    let mut fills: Vec<(i64, TradeHistoryEntry)> = Vec::new();
    for symbol in HISTORY_SYMBOLS {
        match api.my_trades(symbol, FILLS_PER_SYMBOL).await {
            Ok(trades) => {
                for fill in trades {
                    fills.push((fill.time, fill_to_entry(fill)));
                }
            }
            Err(err) => {
                tracing::warn!("could not get trades for {}: {}", symbol, err);
            }
        }
    }

    fills.sort_by(|a, b| b.0.cmp(&a.0));
    fills.truncate(MAX_HISTORY_ENTRIES);
    fills.into_iter().map(|(_, entry)| entry).collect()
}

pub async fn open_orders(api: &dyn ExchangeApi, symbol: &str) -> Result<Vec<OpenOrderEntry>> {
    let orders = api.open_orders(symbol).await?;
    Ok(orders.into_iter().map(order_to_entry).collect())
}

pub async fn cancel(api: &dyn ExchangeApi, symbol: &str, order_id: &str) -> Result<CancelAck> {
    let canceled = api.cancel_order(symbol, order_id).await?;
    Ok(CancelAck {
        order_id: canceled.order_id.to_string(),
        symbol: canceled.symbol,
        status: canceled.status,
        message: "Order cancelled successfully".to_string(),
    })
}

fn fill_to_entry(fill: Fill) -> TradeHistoryEntry {
    TradeHistoryEntry {
        id: fill.id,
        symbol: fill.symbol,
        side: if fill.is_buyer { "BUY" } else { "SELL" }.to_string(),
        quantity: fill.qty,
        price: fill.price,
        time: format_local(fill.time, TIME_FORMAT),
        status: "FILLED".to_string(),
    }
}

fn order_to_entry(order: OpenOrder) -> OpenOrderEntry {
    OpenOrderEntry {
        order_id: order.order_id.to_string(),
        symbol: order.symbol,
        side: order.side,
        order_type: order.order_type,
        quantity: order.orig_qty,
        price: order.price,
        status: order.status,
        time: format_local(order.time, TIME_FORMAT),
    }
}
