#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use binance_client::{
    AccountSnapshot, AssetBalance, CanceledOrder, ClientError, ExchangeApi, ExchangeInfo, Fill,
    Kline, OpenOrder, OrderAck, Result, SymbolInfo, Ticker24h, TickerPrice,
};

pub const BASE_TIME_MS: i64 = 1_700_000_000_000;

/// In-memory exchange double. Canned responses keyed by symbol, plus a
/// call log so tests can assert which adapter operations ran.
#[derive(Default)]
pub struct MockExchange {
    pub balances: Vec<AssetBalance>,
    pub prices: HashMap<String, String>,
    pub fills: HashMap<String, Vec<Fill>>,
    pub open: HashMap<String, Vec<OpenOrder>>,
    pub listed: Vec<SymbolInfo>,
    pub fail_symbols: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, asset: &str, free: &str, locked: &str) -> Self {
        self.balances.push(AssetBalance {
            asset: asset.to_string(),
            free: free.to_string(),
            locked: locked.to_string(),
        });
        self
    }

    pub fn with_price(mut self, symbol: &str, price: &str) -> Self {
        self.prices.insert(symbol.to_string(), price.to_string());
        self
    }

    pub fn with_fills(mut self, symbol: &str, fills: Vec<Fill>) -> Self {
        self.fills.insert(symbol.to_string(), fills);
        self
    }

    pub fn with_open_order(mut self, order: OpenOrder) -> Self {
        self.open
            .entry(order.symbol.clone())
            .or_default()
            .push(order);
        self
    }

    pub fn with_listed(mut self, listed: Vec<SymbolInfo>) -> Self {
        self.listed = listed;
        self
    }

    /// Every symbol-scoped operation on `symbol` fails with the
    /// exchange's invalid-symbol rejection.
    pub fn failing(mut self, symbol: &str) -> Self {
        self.fail_symbols.insert(symbol.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, op: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(op))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn guard(&self, symbol: &str) -> Result<()> {
        if self.fail_symbols.contains(symbol) {
            Err(invalid_symbol())
        } else {
            Ok(())
        }
    }

    fn price_of(&self, symbol: &str) -> Result<String> {
        self.guard(symbol)?;
        self.prices.get(symbol).cloned().ok_or_else(invalid_symbol)
    }

    fn ack(symbol: &str, quantity: &str, price: Option<&str>) -> OrderAck {
        OrderAck {
            symbol: symbol.to_string(),
            order_id: 4242,
            status: "FILLED".to_string(),
            executed_qty: quantity.to_string(),
            price: price.map(str::to_string),
            transact_time: BASE_TIME_MS,
        }
    }
}

pub fn invalid_symbol() -> ClientError {
    ClientError::Upstream {
        code: -1121,
        message: "Invalid symbol.".to_string(),
    }
}

pub fn fill(symbol: &str, id: i64, time: i64, is_buyer: bool) -> Fill {
    Fill {
        id,
        symbol: symbol.to_string(),
        qty: "1.00000000".to_string(),
        price: "100.00000000".to_string(),
        time,
        is_buyer,
    }
}

pub fn listed_symbol(symbol: &str, status: &str) -> SymbolInfo {
    SymbolInfo {
        symbol: symbol.to_string(),
        status: status.to_string(),
        base_asset: symbol.trim_end_matches("USD").to_string(),
        quote_asset: "USD".to_string(),
    }
}

#[async_trait]
impl ExchangeApi for MockExchange {
    async fn ping(&self) -> Result<()> {
        self.record("ping".to_string());
        Ok(())
    }

    async fn account(&self) -> Result<AccountSnapshot> {
        self.record("account".to_string());
        Ok(AccountSnapshot {
            balances: self.balances.clone(),
        })
    }

    async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice> {
        self.record(format!("ticker_price {}", symbol));
        let price = self.price_of(symbol)?;
        Ok(TickerPrice {
            symbol: symbol.to_string(),
            price,
        })
    }

    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h> {
        self.record(format!("ticker_24h {}", symbol));
        let price = self.price_of(symbol)?;
        Ok(Ticker24h {
            symbol: symbol.to_string(),
            price_change_percent: "2.45".to_string(),
            last_price: price,
            volume: "8913.3".to_string(),
            high_price: "45000".to_string(),
            low_price: "41000".to_string(),
        })
    }

    async fn klines(&self, symbol: &str, _interval: &str, limit: u16) -> Result<Vec<Kline>> {
        self.record(format!("klines {}", symbol));
        self.guard(symbol)?;
        if !self.prices.contains_key(symbol) {
            return Err(invalid_symbol());
        }
        Ok((0..i64::from(limit))
            .map(|i| Kline {
                open_time: BASE_TIME_MS + i * 3_600_000,
                open: "100".to_string(),
                high: "110".to_string(),
                low: "90".to_string(),
                close: (100 + i).to_string(),
                volume: "10".to_string(),
                close_time: BASE_TIME_MS + (i + 1) * 3_600_000 - 1,
            })
            .collect())
    }

    async fn market_buy(&self, symbol: &str, quantity: &str) -> Result<OrderAck> {
        self.record(format!("market_buy {}", symbol));
        self.guard(symbol)?;
        Ok(Self::ack(symbol, quantity, None))
    }

    async fn limit_buy(&self, symbol: &str, quantity: &str, price: &str) -> Result<OrderAck> {
        self.record(format!("limit_buy {}", symbol));
        self.guard(symbol)?;
        Ok(Self::ack(symbol, quantity, Some(price)))
    }

    async fn market_sell(&self, symbol: &str, quantity: &str) -> Result<OrderAck> {
        self.record(format!("market_sell {}", symbol));
        self.guard(symbol)?;
        Ok(Self::ack(symbol, quantity, None))
    }

    async fn limit_sell(&self, symbol: &str, quantity: &str, price: &str) -> Result<OrderAck> {
        self.record(format!("limit_sell {}", symbol));
        self.guard(symbol)?;
        Ok(Self::ack(symbol, quantity, Some(price)))
    }

    async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<CanceledOrder> {
        self.record(format!("cancel_order {} {}", symbol, order_id));
        self.guard(symbol)?;
        Ok(CanceledOrder {
            symbol: symbol.to_string(),
            order_id: order_id.parse().unwrap_or(0),
            status: "CANCELED".to_string(),
        })
    }

    async fn open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>> {
        self.record(format!("open_orders {}", symbol));
        self.guard(symbol)?;
        Ok(self.open.get(symbol).cloned().unwrap_or_default())
    }

    async fn my_trades(&self, symbol: &str, limit: u16) -> Result<Vec<Fill>> {
        self.record(format!("my_trades {}", symbol));
        self.guard(symbol)?;
        let mut fills = self.fills.get(symbol).cloned().unwrap_or_default();
        fills.truncate(limit as usize);
        Ok(fills)
    }

    async fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.record("exchange_info".to_string());
        Ok(ExchangeInfo {
            timezone: "UTC".to_string(),
            server_time: BASE_TIME_MS,
            symbols: self.listed.clone(),
        })
    }
}
