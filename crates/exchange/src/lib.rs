//! Market-data access against the Binance futures REST API.

mod binance;

pub use binance::BinanceClient;
