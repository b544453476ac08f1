use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    AccountSnapshot, CanceledOrder, ExchangeInfo, Fill, Kline, OpenOrder, OrderAck, Ticker24h,
    TickerPrice,
};

/// The exchange operations the gateway consumes. Implemented by
/// [`crate::BinanceClient`] against the live REST surface and by test
/// doubles in the gateway's test suite.
///
/// Order placement is deliberately split into four operations, one per
/// (side, type) pair; there is no unified place-order call. None of the
/// operations retry; order placement is at-most-once.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn account(&self) -> Result<AccountSnapshot>;

    async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice>;

    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h>;

    async fn klines(&self, symbol: &str, interval: &str, limit: u16) -> Result<Vec<Kline>>;

    async fn market_buy(&self, symbol: &str, quantity: &str) -> Result<OrderAck>;

    async fn limit_buy(&self, symbol: &str, quantity: &str, price: &str) -> Result<OrderAck>;

    async fn market_sell(&self, symbol: &str, quantity: &str) -> Result<OrderAck>;

    async fn limit_sell(&self, symbol: &str, quantity: &str, price: &str) -> Result<OrderAck>;

    async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<CanceledOrder>;

    async fn open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>>;

    async fn my_trades(&self, symbol: &str, limit: u16) -> Result<Vec<Fill>>;

    async fn exchange_info(&self) -> Result<ExchangeInfo>;
}
