use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct AccountSnapshot {
    pub balances: Vec<AssetBalance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub price_change_percent: String,
    pub last_price: String,
    pub volume: String,
    pub high_price: String,
    pub low_price: String,
}

/// One candlestick. The exchange serves klines as positional JSON arrays,
/// not objects, so rows are converted via [`Kline::from_row`].
#[derive(Debug, Clone)]
pub struct Kline {
    pub open_time: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub close_time: i64,
}

impl Kline {
    pub fn from_row(row: &[Value]) -> Result<Kline> {
        if row.len() < 7 {
            return Err(ClientError::Parse(format!(
                "kline row has {} fields, expected at least 7",
                row.len()
            )));
        }

        let millis = |value: &Value| {
            value
                .as_i64()
                .ok_or_else(|| ClientError::Parse("kline timestamp is not an integer".into()))
        };
        let text = |value: &Value| {
            value
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| ClientError::Parse("kline price field is not a string".into()))
        };

        Ok(Kline {
            open_time: millis(&row[0])?,
            open: text(&row[1])?,
            high: text(&row[2])?,
            low: text(&row[3])?,
            close: text(&row[4])?,
            volume: text(&row[5])?,
            close_time: millis(&row[6])?,
        })
    }
}

/// Acknowledgment for a newly placed order. `price` is absent on market
/// order responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: i64,
    pub status: String,
    pub executed_qty: String,
    #[serde(default)]
    pub price: Option<String>,
    pub transact_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanceledOrder {
    pub symbol: String,
    pub order_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    pub symbol: String,
    pub order_id: i64,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub orig_qty: String,
    pub price: String,
    pub status: String,
    pub time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub id: i64,
    pub symbol: String,
    pub qty: String,
    pub price: String,
    pub time: i64,
    pub is_buyer: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub timezone: String,
    pub server_time: i64,
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
}
