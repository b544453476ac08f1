use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use binance_client::{ExchangeApi, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{exchange_error, ErrorResponse};
use crate::{valuation, AppState};

#[derive(Debug, Serialize)]
pub struct BalanceEntry {
    pub asset: String,
    pub free: String,
    pub locked: String,
    #[serde(rename = "usdValue")]
    pub usd_value: String,
}

pub(super) async fn get_balance(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<BalanceEntry>>, (StatusCode, Json<ErrorResponse>)> {
    let client = state
        .connect()
        .await
        .map_err(|e| exchange_error("fetch balance", e))?;

    let entries = account_balances(&client)
        .await
        .map_err(|e| exchange_error("fetch balance", e))?;

    Ok(Json(entries))
}

/// Non-zero holdings from the account snapshot, each valued
/// independently; a valuation failure degrades that asset to zero
/// without touching the others.
pub async fn account_balances(api: &dyn ExchangeApi) -> Result<Vec<BalanceEntry>> {
    let account = api.account().await?;

    let mut entries = Vec::new();
    for balance in account.balances {
        let free = parse_amount(&balance.free);
        let locked = parse_amount(&balance.locked);
        if free <= Decimal::ZERO && locked <= Decimal::ZERO {
            continue;
        }

        let usd_value = valuation::usd_value(api, &balance.asset, free).await;
        entries.push(BalanceEntry {
            asset: balance.asset,
            free: balance.free,
            locked: balance.locked,
            usd_value: usd_value.to_string(),
        });
    }

    Ok(entries)
}

fn parse_amount(raw: &str) -> Decimal {
    raw.parse().unwrap_or(Decimal::ZERO)
}
