pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{BinanceClient, Credentials};
pub use error::{ClientError, Result};
pub use traits::ExchangeApi;
pub use types::{
    AccountSnapshot, AssetBalance, CanceledOrder, ExchangeInfo, Fill, Kline, OpenOrder, OrderAck,
    SymbolInfo, Ticker24h, TickerPrice,
};
