pub mod advisory;
pub mod config;
pub mod error;
pub mod market;
pub mod types;

pub use advisory::{AdvisoryModel, NewsFeed};
pub use config::{EnvConfig, IndicatorSettings, Settings};
pub use error::{Error, Result};
pub use market::MarketDataSource;
pub use types::*;
