use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::de::IgnoredAny;
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use common::{AccountOverview, Candle, CandleSeries, Error, MarketDataSource, Result};

const BASE_URL: &str = "https://fapi.binance.com";

/// REST client for the Binance futures API.
///
/// Candles and prices are public endpoints; only the account query is
/// signed, so the client works without credentials until one of the
/// signed calls is made.
pub struct BinanceClient {
    api_key: Option<String>,
    secret: Option<String>,
    http: Client,
}

impl BinanceClient {
    pub fn new(api_key: Option<String>, secret: Option<String>) -> Self {
        Self {
            api_key,
            secret,
            http: Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.api_key.as_deref(), self.secret.as_deref()) {
            (Some(key), Some(secret)) => Ok((key, secret)),
            _ => Err(Error::Config(
                "BINANCE_API_KEY and BINANCE_SECRET are required for account queries".to_string(),
            )),
        }
    }

    fn sign(secret: &str, query: &str) -> String {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn signed_get(&self, path: &str, params: &str) -> Result<String> {
        let (key, secret) = self.credentials()?;
        let ts = Utc::now().timestamp_millis();
        let query = if params.is_empty() {
            format!("timestamp={ts}")
        } else {
            format!("{params}&timestamp={ts}")
        };
        let signature = Self::sign(secret, &query);
        let url = format!("{BASE_URL}{path}?{query}&signature={signature}");

        let resp = self
            .http
            .get(&url)
            .header("X-MBX-APIKEY", key)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }

    async fn public_get(&self, url: &str) -> Result<String> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    async fn candles(
        &self,
        pair: &str,
        interval: &str,
        limit: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<CandleSeries> {
        let mut url =
            format!("{BASE_URL}/fapi/v1/klines?symbol={pair}&interval={interval}&limit={limit}");
        if let Some(start) = start {
            url.push_str(&format!("&startTime={}", start.timestamp_millis()));
        }
        if let Some(end) = end {
            url.push_str(&format!("&endTime={}", end.timestamp_millis()));
        }

        debug!(pair = %pair, interval = %interval, limit, "Fetching klines from Binance");
        let body = self.public_get(&url).await?;
        decode_klines(&body)
    }

    async fn current_price(&self, pair: &str) -> Result<f64> {
        let url = format!("{BASE_URL}/fapi/v1/ticker/price?symbol={pair}");
        let body = self.public_get(&url).await?;
        decode_price(&body)
    }

    async fn account_overview(&self) -> Result<AccountOverview> {
        let body = self.signed_get("/fapi/v2/account", "").await?;
        decode_account(&body)
    }
}

/// One `/fapi/v1/klines` row: open time and OHLCV up front, then six
/// trailing columns the bot has no use for.
type KlineRow = (
    i64,        // open time, ms
    String,     // open
    String,     // high
    String,     // low
    String,     // close
    String,     // volume
    IgnoredAny, // close time
    IgnoredAny, // quote asset volume
    IgnoredAny, // trade count
    IgnoredAny, // taker buy base volume
    IgnoredAny, // taker buy quote volume
    IgnoredAny, // unused
);

fn decode_klines(body: &str) -> Result<CandleSeries> {
    let rows: Vec<KlineRow> =
        serde_json::from_str(body).map_err(|e| Error::Exchange(format!("bad klines body: {e}")))?;
    let candles = rows
        .into_iter()
        .map(kline_candle)
        .collect::<Result<Vec<Candle>>>()?;
    CandleSeries::new(candles)
}

fn kline_candle(row: KlineRow) -> Result<Candle> {
    let (open_time_ms, open, high, low, close, volume, ..) = row;
    let open_time = Utc
        .timestamp_millis_opt(open_time_ms)
        .single()
        .ok_or_else(|| Error::Exchange(format!("invalid kline open time {open_time_ms}")))?;
    Ok(Candle {
        open_time,
        open: parse_decimal(&open, "open")?,
        high: parse_decimal(&high, "high")?,
        low: parse_decimal(&low, "low")?,
        close: parse_decimal(&close, "close")?,
        volume: parse_decimal(&volume, "volume")?,
    })
}

fn decode_price(body: &str) -> Result<f64> {
    let ticker: PriceTicker =
        serde_json::from_str(body).map_err(|e| Error::Exchange(format!("bad ticker body: {e}")))?;
    parse_decimal(&ticker.price, "price")
}

fn decode_account(body: &str) -> Result<AccountOverview> {
    let account: FuturesAccount = serde_json::from_str(body)
        .map_err(|e| Error::Exchange(format!("bad account body: {e}")))?;
    Ok(AccountOverview {
        total_balance: parse_decimal(&account.total_wallet_balance, "totalWalletBalance")?,
        unrealized_pnl: parse_decimal(&account.total_unrealized_profit, "totalUnrealizedProfit")?,
        available_balance: parse_decimal(&account.available_balance, "availableBalance")?,
    })
}

/// Binance sends numerals as strings.
fn parse_decimal(s: &str, field: &str) -> Result<f64> {
    s.parse()
        .map_err(|_| Error::Exchange(format!("unparsable {field} value '{s}'")))
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PriceTicker {
    price: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuturesAccount {
    total_wallet_balance: String,
    total_unrealized_profit: String,
    available_balance: String,
}
