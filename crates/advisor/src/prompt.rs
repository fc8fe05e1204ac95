//! Prompt construction for the advisory model.
//!
//! Every prompt the bot sends is built here, so the exact wording that
//! the parsers on the other side depend on lives in one place.

use std::collections::BTreeMap;

use serde::Serialize;

use common::{CandleSeries, NewsArticle, Result};
use indicators::{IndicatorBundle, Series};

use crate::suggestion::SuggestionContext;

/// One candle as shown to the model.
#[derive(Debug, Clone, Serialize)]
pub struct CandleView {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Latest indicator values by category. Gaps serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotIndicators {
    pub trend: BTreeMap<String, Option<f64>>,
    pub momentum: BTreeMap<String, Option<f64>>,
    pub volatility: BTreeMap<String, Option<f64>>,
    pub volume: BTreeMap<String, Option<f64>>,
}

/// The market state embedded in a suggestion prompt: the trailing five
/// candles plus the most recent value of every computed series.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub ohlcv: Vec<CandleView>,
    pub indicators: SnapshotIndicators,
    /// Latest pattern flags: +100 bullish, -100 bearish, 0 none.
    pub patterns: BTreeMap<String, i32>,
}

impl MarketSnapshot {
    pub fn from_bundle(series: &CandleSeries, bundle: &IndicatorBundle) -> Self {
        let candles = series.candles();
        let tail = &candles[candles.len().saturating_sub(5)..];
        let ohlcv = tail
            .iter()
            .map(|c| CandleView {
                timestamp: c.open_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                open: c.open,
                high: c.high,
                low: c.low,
                close: c.close,
                volume: c.volume,
            })
            .collect();

        let latest_of = |map: &BTreeMap<String, Series>| {
            map.iter()
                .map(|(name, s)| (name.clone(), s.last().copied().flatten()))
                .collect::<BTreeMap<_, _>>()
        };

        MarketSnapshot {
            ohlcv,
            indicators: SnapshotIndicators {
                trend: latest_of(&bundle.trend),
                momentum: latest_of(&bundle.momentum),
                volatility: latest_of(&bundle.volatility),
                volume: latest_of(&bundle.volume),
            },
            patterns: bundle
                .patterns
                .iter()
                .map(|(name, flags)| (name.clone(), flags.last().copied().unwrap_or(0)))
                .collect(),
        }
    }

    /// Pretty JSON, keys in a fixed order, so identical market state
    /// always produces the identical prompt.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The strict trade-suggestion prompt. The response is expected to be
/// nothing but the JSON object described here; [`crate::parse_suggestion`]
/// enforces that expectation.
pub fn suggestion_prompt(ctx: &SuggestionContext, snapshot: &MarketSnapshot) -> Result<String> {
    let market_data = snapshot.to_json()?;
    Ok(format!(
        r#"You are a trading bot AI assistant. Analyze the following market data for {symbol} on {timeframe} timeframe using the {strategy} strategy. The current market price is {price}.

Market Data:
{market_data}

Provide your analysis in the following JSON format ONLY. Do not include any other text or explanation outside the JSON:
{{
    "trading_pair": "{symbol}",
    "timeframe": "{timeframe}",
    "strategy": "{strategy}",
    "signal": "BUY/SELL/NONE",
    "entry_price": <current_price>,
    "stop_loss": <float>,
    "take_profit_levels": [<float>, <float>, <float>],
    "confidence_score": <float between 0 and 1>,
    "rationale": "<brief explanation of the analysis>"
}}

Important:
1. Return ONLY the JSON object, no other text
2. Ensure all numeric values are actual numbers, not strings
3. Keep the rationale concise and focused on key technical factors
4. Use the current price as the entry price
5. Calculate stop loss and take profit levels based on the strategy"#,
        symbol = ctx.symbol,
        timeframe = ctx.timeframe,
        strategy = ctx.strategy_name,
        price = ctx.current_price,
    ))
}

/// The strict per-article news prompt. The echoed metadata fields let
/// the response stand alone in logs.
pub fn news_analysis_prompt(article: &NewsArticle, pair: &str) -> String {
    let source = article.source.as_deref().unwrap_or("unknown");
    let published = article.published_at.as_deref().unwrap_or("unknown");
    format!(
        r#"Analyze this news article for {pair} trading impact. Be concise.

Title: {title}
Description: {description}
Source: {source}
Published: {published}

Return ONLY a JSON object in this exact format:
{{
    "signal": "BUY/SELL/HOLD",
    "confidence_score": <float between 0 and 1>,
    "rationale": "<1-2 sentences>",
    "trading_pair": "{pair}",
    "news_source": "{source}",
    "news_title": "{title}",
    "published_at": "{published}"
}}"#,
        title = article.title,
        description = article.description.as_deref().unwrap_or(""),
    )
}

/// Free-text news discovery. The response feeds
/// [`crate::parse_headlines`], never the strict validator.
pub fn discovery_prompt(focus: &str, date: &str) -> String {
    format!(
        "Act as an expert financial news aggregator. Scan for and provide a concise summary \
         of the top 3-5 most impactful financial and cryptocurrency news items for today, \
         {date}. Focus on news relevant to {focus}. For each item, provide a brief headline \
         or summary, and if possible, the perceived source or context. Prioritize information \
         that could influence trading decisions."
    )
}

/// Free-text sentiment digest over discovered headlines. The response
/// feeds [`crate::parse_digest`].
pub fn digest_prompt(news_summary: &str, target_asset: &str) -> String {
    format!(
        "You are an expert financial and crypto market analyst. Based on the following news items:\n\
         {news_summary}\n\
         \n\
         Now, for {target_asset}, please:\n\
         1. Analyze the overall market sentiment (Bullish, Bearish, Neutral, Uncertain).\n\
         2. Provide a potential trading signal: BUY, SELL, or HOLD for {target_asset}.\n\
         3. Assign a confidence score: Low, Medium, or High.\n\
         4. Briefly (1-2 sentences) explain your reasoning, referencing specific news."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::Candle;

    fn series(len: usize) -> CandleSeries {
        let candles = (0..len)
            .map(|i| Candle {
                open_time: Utc.timestamp_opt(i as i64 * 3600, 0).unwrap(),
                open: 100.0 + i as f64,
                high: 101.0 + i as f64,
                low: 99.0 + i as f64,
                close: 100.5 + i as f64,
                volume: 10.0,
            })
            .collect();
        CandleSeries::new(candles).unwrap()
    }

    fn ctx() -> SuggestionContext {
        SuggestionContext {
            symbol: "ETHUSDT".to_string(),
            timeframe: "4h".to_string(),
            strategy_name: "Volatility Breakout Pro".to_string(),
            current_price: 3_150.0,
        }
    }

    #[test]
    fn snapshot_takes_the_trailing_five_candles() {
        let s = series(8);
        let bundle = IndicatorBundle::new(8);
        let snap = MarketSnapshot::from_bundle(&s, &bundle);
        assert_eq!(snap.ohlcv.len(), 5);
        assert_eq!(snap.ohlcv[0].close, 103.5);
        assert_eq!(snap.ohlcv[4].close, 107.5);
        assert_eq!(snap.ohlcv[0].timestamp, "1970-01-01 03:00:00");
    }

    #[test]
    fn snapshot_of_a_short_series_takes_what_exists() {
        let s = series(3);
        let snap = MarketSnapshot::from_bundle(&s, &IndicatorBundle::new(3));
        assert_eq!(snap.ohlcv.len(), 3);
    }

    #[test]
    fn snapshot_serializes_gaps_as_null_and_patterns_as_ints() {
        let s = series(3);
        let mut bundle = IndicatorBundle::new(3);
        bundle.insert_momentum("rsi", vec![None, Some(55.0), None]);
        bundle.insert_pattern("hammer", vec![0, 0, 100]);
        let json = MarketSnapshot::from_bundle(&s, &bundle).to_json().unwrap();
        assert!(json.contains("\"rsi\": null"));
        assert!(json.contains("\"hammer\": 100"));
    }

    #[test]
    fn suggestion_prompt_embeds_context_and_schema() {
        let s = series(6);
        let prompt = suggestion_prompt(
            &ctx(),
            &MarketSnapshot::from_bundle(&s, &IndicatorBundle::new(6)),
        )
        .unwrap();
        assert!(prompt.contains("ETHUSDT"));
        assert!(prompt.contains("4h"));
        assert!(prompt.contains("Volatility Breakout Pro"));
        assert!(prompt.contains("3150"));
        assert!(prompt.contains("\"take_profit_levels\""));
        assert!(prompt.contains("Return ONLY the JSON object"));
    }

    #[test]
    fn news_prompt_names_the_pair_and_allows_hold() {
        let article = NewsArticle {
            uuid: None,
            title: "Exchange reserves fall".to_string(),
            description: Some("Reserves at major venues fell 4% this week".to_string()),
            snippet: None,
            url: None,
            source: Some("newswire".to_string()),
            published_at: Some("2025-06-01T10:00:00Z".to_string()),
            relevance_score: 12.0,
        };
        let prompt = news_analysis_prompt(&article, "BTCUSDT");
        assert!(prompt.contains("BTCUSDT"));
        assert!(prompt.contains("BUY/SELL/HOLD"));
        assert!(prompt.contains("Exchange reserves fall"));
        assert!(prompt.contains("newswire"));
    }

    #[test]
    fn discovery_prompt_carries_focus_and_date() {
        let p = discovery_prompt("BTC, ETH", "2025-06-01");
        assert!(p.contains("BTC, ETH"));
        assert!(p.contains("2025-06-01"));
        assert!(p.contains("top 3-5"));
    }
}
