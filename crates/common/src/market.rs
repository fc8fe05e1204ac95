use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{AccountOverview, CandleSeries, Result};

/// Abstraction over the market-data venue.
///
/// `BinanceClient` in `crates/exchange` implements this against the
/// Binance futures REST API. Tests implement it with canned candles.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch up to `limit` candles for `pair` at `interval`, oldest first.
    /// `start` and `end` bound the window when given.
    async fn candles(
        &self,
        pair: &str,
        interval: &str,
        limit: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<CandleSeries>;

    /// Latest traded price for `pair`.
    async fn current_price(&self, pair: &str) -> Result<f64>;

    /// Wallet balances for the configured account. Needs credentials.
    async fn account_overview(&self) -> Result<AccountOverview>;
}
