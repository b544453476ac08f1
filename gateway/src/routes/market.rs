use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use binance_client::{ExchangeApi, Result, Ticker24h, TickerPrice};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::{exchange_error, format_local, ErrorResponse};
use crate::symbols::{self, OVERVIEW_SYMBOLS};
use crate::AppState;

const CHART_INTERVAL: &str = "1h";
const CHART_CANDLES: u16 = 24;

#[derive(Debug, Serialize)]
pub struct MarketSnapshot {
    /// The symbol that actually answered, which differs from the
    /// requested one when the USDT fallback kicked in.
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub volume: String,
    pub high: String,
    pub low: String,
    #[serde(rename = "chartData", skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Vec<ChartPoint>>,
}

#[derive(Debug, Serialize)]
pub struct ChartPoint {
    pub time: String,
    pub price: String,
}

pub(super) async fn get_market_overview(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<MarketSnapshot>>, (StatusCode, Json<ErrorResponse>)> {
    let client = state
        .connect()
        .await
        .map_err(|e| exchange_error("fetch market overview", e))?;

    Ok(Json(market_overview(&client).await))
}

pub(super) async fn get_market_data(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> std::result::Result<Json<MarketSnapshot>, (StatusCode, Json<ErrorResponse>)> {
    let client = state
        .connect()
        .await
        .map_err(|e| exchange_error("fetch market data", e))?;

    let snapshot = market_detail(&client, &symbol)
        .await
        .map_err(|e| exchange_error("fetch market data", e))?;

    Ok(Json(snapshot))
}

/// Snapshots for the fixed major-pair list. A pair that fails both the
/// primary and fallback symbol is dropped from the result set; one
/// delisted pair never fails the whole overview.
pub async fn market_overview(api: &dyn ExchangeApi) -> Vec<MarketSnapshot> {
    let mut snapshots = Vec::with_capacity(OVERVIEW_SYMBOLS.len());
    for pair in OVERVIEW_SYMBOLS {
        let resolved = symbols::resolve(pair, |s| async move {
            let ticker = api.ticker_price(&s).await?;
            let stats = api.ticker_24h(&s).await?;
            Ok((ticker, stats))
        })
        .await;

        match resolved {
            Ok((symbol, (ticker, stats))) => {
                snapshots.push(snapshot(symbol, &ticker, &stats, None));
            }
            Err(err) => {
                tracing::warn!("could not get market data for {}: {}", pair, err);
            }
        }
    }
    snapshots
}

/// Full market data for one symbol, chart series included. No fallback
/// here: an unrecognized symbol fails the whole request.
pub async fn market_detail(api: &dyn ExchangeApi, symbol: &str) -> Result<MarketSnapshot> {
    let ticker = api.ticker_price(symbol).await?;
    let stats = api.ticker_24h(symbol).await?;
    let klines = api.klines(symbol, CHART_INTERVAL, CHART_CANDLES).await?;

    let chart = klines
        .into_iter()
        .map(|kline| ChartPoint {
            time: format_local(kline.open_time, "%H:%M"),
            price: kline.close,
        })
        .collect();

    Ok(snapshot(symbol.to_string(), &ticker, &stats, Some(chart)))
}

fn snapshot(
    symbol: String,
    ticker: &TickerPrice,
    stats: &Ticker24h,
    chart_data: Option<Vec<ChartPoint>>,
) -> MarketSnapshot {
    MarketSnapshot {
        symbol,
        price: format_amount(parse(&ticker.price), 2),
        change: format_signed_percent(parse(&stats.price_change_percent)),
        volume: format_amount(parse(&stats.volume), 0),
        high: format_amount(parse(&stats.high_price), 2),
        low: format_amount(parse(&stats.low_price), 2),
        chart_data,
    }
}

fn parse(raw: &str) -> Decimal {
    raw.parse().unwrap_or(Decimal::ZERO)
}

/// Fixed-precision rendering without grouping, e.g. `-2.45`.
fn format_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = rounded.to_string();
    if dp == 0 {
        return match text.split_once('.') {
            Some((int_part, _)) => int_part.to_string(),
            None => text,
        };
    }
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, String::new()),
    };
    let mut frac = frac_part;
    while (frac.len() as u32) < dp {
        frac.push('0');
    }
    format!("{}.{}", int_part, frac)
}

/// Display formatting with thousands separators, e.g. `43,250.10`.
fn format_amount(value: Decimal, dp: u32) -> String {
    let fixed = format_fixed(value, dp);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Signed percent rendering, e.g. `+2.45%` / `-0.95%`.
fn format_signed_percent(value: Decimal) -> String {
    let fixed = format_fixed(value, 2);
    if fixed.starts_with('-') {
        format!("{}%", fixed)
    } else {
        format!("+{}%", fixed)
    }
}
