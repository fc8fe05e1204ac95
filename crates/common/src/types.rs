use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single OHLCV candle as returned by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A validated, chronologically ordered run of candles.
///
/// Construction is the only entry point: `new` rejects empty input,
/// non-positive or non-finite prices, negative volume and out-of-order
/// timestamps, so every downstream consumer can assume a well-formed,
/// non-empty series.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        if candles.is_empty() {
            return Err(Error::InsufficientData { needed: 1, got: 0 });
        }
        for (i, c) in candles.iter().enumerate() {
            for (field, value) in [
                ("open", c.open),
                ("high", c.high),
                ("low", c.low),
                ("close", c.close),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(Error::InvalidData(format!(
                        "candle {i}: {field} must be a positive finite number, got {value}"
                    )));
                }
            }
            if !c.volume.is_finite() || c.volume < 0.0 {
                return Err(Error::InvalidData(format!(
                    "candle {i}: volume must be non-negative, got {}",
                    c.volume
                )));
            }
            if i > 0 && c.open_time <= candles[i - 1].open_time {
                return Err(Error::InvalidData(format!(
                    "candle {i}: open_time {} is not after previous candle's {}",
                    c.open_time,
                    candles[i - 1].open_time
                )));
            }
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        false // new() rejects empty input
    }

    /// The most recent candle. The series is never empty.
    pub fn last(&self) -> &Candle {
        &self.candles[self.candles.len() - 1]
    }

    pub fn opens(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

/// Trade direction emitted by a strategy or an AI suggestion.
///
/// `None` means "no actionable setup". This is distinct from the news
/// pipeline's [`NewsSignal`], whose neutral state is `Hold`; the two sets
/// are kept separate so a serialized "NONE" can never leak into a news
/// verdict or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    None,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::None => write!(f, "NONE"),
        }
    }
}

/// Direction implied by a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NewsSignal {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for NewsSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsSignal::Buy => write!(f, "BUY"),
            NewsSignal::Sell => write!(f, "SELL"),
            NewsSignal::Hold => write!(f, "HOLD"),
        }
    }
}

/// One article from the news feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub uuid: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    /// Feed-assigned relevance, 0.0 when the feed omits it.
    #[serde(default)]
    pub relevance_score: f64,
}

impl NewsArticle {
    /// True if any text field mentions `needle` (case-insensitive).
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let hit = |s: &Option<String>| {
            s.as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
        };
        self.title.to_lowercase().contains(&needle)
            || hit(&self.description)
            || hit(&self.snippet)
    }
}

/// Futures wallet summary for the configured account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccountOverview {
    pub total_balance: f64,
    pub unrealized_pnl: f64,
    pub available_balance: f64,
}
