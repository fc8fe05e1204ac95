use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// API credentials loaded from environment variables at startup.
///
/// Every key is optional: candle data is public, so the scanner runs
/// without any credentials at all. Features that need a missing key
/// (AI suggestions, news, account overview) are simply disabled.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub binance_api_key: Option<String>,
    pub binance_secret: Option<String>,
    pub gemini_api_key: Option<String>,
    pub news_api_token: Option<String>,
}

impl EnvConfig {
    /// Load credentials from the environment, reading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        EnvConfig {
            binance_api_key: optional_env("BINANCE_API_KEY"),
            binance_secret: optional_env("BINANCE_SECRET"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            news_api_token: optional_env("NEWS_API_TOKEN"),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Scanner settings, loaded from a TOML file with full defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pairs scanned each cycle.
    pub trading_pairs: Vec<String>,
    /// Timeframes the bot understands (Binance interval strings).
    pub timeframes: Vec<String>,
    pub default_timeframe: String,
    /// Candles fetched per scan.
    pub candle_limit: usize,
    pub scan_interval_secs: u64,
    /// Display name resolved through `StrategyKind::from_name`.
    pub default_strategy: String,
    pub risk_reward_ratio: f64,
    /// Advisory cap on the stop distance, in percent of entry price.
    pub max_stop_loss_pct: f64,
    /// AI suggestions below this confidence are logged and discarded.
    pub ai_confidence_threshold: f64,
    pub gemini_model: String,
    /// When true (and the API tokens are present) each scan cycle ends
    /// with a news sentiment pass.
    pub news_enabled: bool,
    pub indicators: IndicatorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            trading_pairs: ["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT"]
                .map(String::from)
                .to_vec(),
            timeframes: ["1m", "5m", "15m", "1h", "4h", "1d"].map(String::from).to_vec(),
            default_timeframe: "1h".to_string(),
            candle_limit: 500,
            scan_interval_secs: 60,
            default_strategy: "Dynamic Trend Rider".to_string(),
            risk_reward_ratio: 2.0,
            max_stop_loss_pct: 2.0,
            ai_confidence_threshold: 0.7,
            gemini_model: "gemini-1.5-flash".to_string(),
            news_enabled: false,
            indicators: IndicatorSettings::default(),
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing file yields the defaults;
    /// an unreadable or malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "settings file not found, using defaults");
                Ok(Settings::default())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Periods and thresholds for every indicator the engine computes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub atr_period: usize,
    pub stoch_period: usize,
    pub stoch_smooth_k: usize,
    pub stoch_smooth_d: usize,
    pub willr_period: usize,
    pub cci_period: usize,
    pub vwap_period: usize,
    pub volume_sma_period: usize,
    pub adx_period: usize,
    pub ichimoku_conversion: usize,
    pub ichimoku_base: usize,
    pub ichimoku_span_b: usize,
    pub ichimoku_displacement: usize,
    /// Centered window width for support/resistance extrema.
    pub sr_window: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            sma_periods: vec![20, 50, 200],
            ema_periods: vec![12, 26, 50],
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            atr_period: 14,
            stoch_period: 14,
            stoch_smooth_k: 3,
            stoch_smooth_d: 3,
            willr_period: 14,
            cci_period: 14,
            vwap_period: 14,
            volume_sma_period: 20,
            adx_period: 14,
            ichimoku_conversion: 9,
            ichimoku_base: 26,
            ichimoku_span_b: 52,
            ichimoku_displacement: 26,
            sr_window: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_major_pairs() {
        let s = Settings::default();
        assert_eq!(s.trading_pairs[0], "BTCUSDT");
        assert_eq!(s.default_timeframe, "1h");
        assert_eq!(s.candle_limit, 500);
        assert_eq!(s.default_strategy, "Dynamic Trend Rider");
        assert!(!s.news_enabled);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let s: Settings = toml::from_str(
            r#"
            trading_pairs = ["BTCUSDT"]
            scan_interval_secs = 10

            [indicators]
            rsi_period = 7
            "#,
        )
        .unwrap();
        assert_eq!(s.trading_pairs, vec!["BTCUSDT"]);
        assert_eq!(s.scan_interval_secs, 10);
        assert_eq!(s.indicators.rsi_period, 7);
        // untouched fields keep their defaults
        assert_eq!(s.indicators.macd_slow, 26);
        assert_eq!(s.risk_reward_ratio, 2.0);
    }

    #[test]
    fn load_returns_defaults_when_file_missing() {
        let s = Settings::load("/nonexistent/augur-settings.toml").unwrap();
        assert_eq!(s.candle_limit, 500);
    }
}
