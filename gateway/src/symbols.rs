use std::future::Future;

use binance_client::Result;
use tracing::warn;

/// The quote token the dashboard trades against and its stablecoin
/// fallback: a pair listed as `BTCUSD` on one region is `BTCUSDT` on
/// another, so unrecognized `*USD` symbols are retried once as `*USDT`.
pub const QUOTE_ASSET: &str = "USD";
pub const FALLBACK_QUOTE_ASSET: &str = "USDT";

/// Major pairs shown on the market overview, in display order.
pub const OVERVIEW_SYMBOLS: [&str; 6] = [
    "BTCUSD", "ETHUSD", "BNBUSD", "ADAUSD", "XRPUSD", "SOLUSD",
];

/// Pairs scanned for the trade history endpoint.
pub const HISTORY_SYMBOLS: [&str; 3] = ["BTCUSD", "ETHUSD", "BNBUSD"];

/// The substitute symbol to try when `symbol` is not recognized, if any.
/// Only symbols ending in the exact quote token qualify.
pub fn fallback_symbol(symbol: &str) -> Option<String> {
    symbol
        .strip_suffix(QUOTE_ASSET)
        .map(|base| format!("{}{}", base, FALLBACK_QUOTE_ASSET))
}

/// Runs `query` against the primary symbol; on any failure, retries
/// exactly once against the USDT variant. Returns the symbol that
/// actually answered, alongside the result. Never tries any other
/// ordering and never retries a second time.
pub async fn resolve<T, F, Fut>(primary: &str, query: F) -> Result<(String, T)>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match query(primary.to_string()).await {
        Ok(value) => Ok((primary.to_string(), value)),
        Err(primary_err) => {
            let Some(fallback) = fallback_symbol(primary) else {
                return Err(primary_err);
            };
            warn!(
                "query for {} failed ({}), retrying as {}",
                primary, primary_err, fallback
            );
            let value = query(fallback.clone()).await?;
            Ok((fallback, value))
        }
    }
}
