use binance_client::ExchangeApi;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::symbols::{self, QUOTE_ASSET};

/// Assets priced with a live quote; everything else outside the quote
/// currencies is reported with a zero USD estimate.
pub const PRICED_ASSETS: [&str; 3] = ["BTC", "ETH", "BNB"];

/// Estimated USD value of `free` units of `asset`. Never fails: any
/// pricing problem degrades this asset to zero. The result is rounded
/// to 2 decimal places, half-up, for currency display.
pub async fn usd_value(api: &dyn ExchangeApi, asset: &str, free: Decimal) -> Decimal {
    if asset == QUOTE_ASSET || asset == symbols::FALLBACK_QUOTE_ASSET {
        return round_usd(free);
    }
    if !PRICED_ASSETS.contains(&asset) {
        return Decimal::ZERO;
    }

    let primary = format!("{}{}", asset, QUOTE_ASSET);
    match symbols::resolve(&primary, |s| async move { api.ticker_price(&s).await }).await {
        Ok((_, ticker)) => match ticker.price.parse::<Decimal>() {
            Ok(price) => round_usd(free * price),
            Err(err) => {
                warn!("unparseable ticker price for {}: {}", asset, err);
                Decimal::ZERO
            }
        },
        Err(err) => {
            warn!("could not get price for {}: {}", asset, err);
            Decimal::ZERO
        }
    }
}

fn round_usd(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
