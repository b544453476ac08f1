use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use binance_client::{ExchangeApi, Result};
use serde::Serialize;

use super::{exchange_error, ErrorResponse};
use crate::AppState;

const MAX_LISTED_SYMBOLS: usize = 50;

#[derive(Debug, Serialize)]
pub struct ExchangeInfoResponse {
    pub timezone: String,
    #[serde(rename = "serverTime")]
    pub server_time: i64,
    pub symbols: Vec<ListedSymbol>,
}

#[derive(Debug, Serialize)]
pub struct ListedSymbol {
    pub symbol: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
    pub status: String,
}

pub(super) async fn get_exchange_info(
    State(state): State<AppState>,
) -> std::result::Result<Json<ExchangeInfoResponse>, (StatusCode, Json<ErrorResponse>)> {
    let client = state
        .connect()
        .await
        .map_err(|e| exchange_error("fetch exchange info", e))?;

    let info = exchange_summary(&client)
        .await
        .map_err(|e| exchange_error("fetch exchange info", e))?;

    Ok(Json(info))
}

/// The exchange's symbol directory filtered to currently tradeable
/// pairs, capped at the first 50.
pub async fn exchange_summary(api: &dyn ExchangeApi) -> Result<ExchangeInfoResponse> {
    let info = api.exchange_info().await?;

    let symbols = info
        .symbols
        .into_iter()
        .filter(|s| s.status == "TRADING")
        .take(MAX_LISTED_SYMBOLS)
        .map(|s| ListedSymbol {
            symbol: s.symbol,
            base_asset: s.base_asset,
            quote_asset: s.quote_asset,
            status: s.status,
        })
        .collect();

    Ok(ExchangeInfoResponse {
        timezone: info.timezone,
        server_time: info.server_time,
        symbols,
    })
}
