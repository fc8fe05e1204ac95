//! News-driven signals: fetching recent articles, asking the advisory
//! model for a per-article verdict, and validating what comes back.
//!
//! The verdict path is strict like the trade path, but with its own
//! signal vocabulary: a neutral news verdict is HOLD, never NONE.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use common::{AdvisoryModel, Error, NewsArticle, NewsFeed, NewsSignal, Result};

use crate::prompt::news_analysis_prompt;
use crate::suggestion::{as_object, numeric_field, parse_json_value, require_fields, str_field};

/// A validated per-article verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsAnalysis {
    pub signal: NewsSignal,
    pub confidence_score: f64,
    pub rationale: String,
    pub trading_pair: String,
    pub news_source: Option<String>,
    pub news_title: Option<String>,
    pub published_at: Option<String>,
}

/// Parse and validate a raw news-analysis response.
///
/// Same two-stage extraction as the trade path; the schema differs:
/// `{signal, confidence_score, rationale, trading_pair}` are required
/// and the signal set is BUY/SELL/HOLD. Metadata the model omits is
/// backfilled from the article it was asked about.
pub fn parse_news_analysis(raw: &str, article: &NewsArticle) -> Result<NewsAnalysis> {
    let value = parse_json_value(raw)?;
    let obj = as_object(&value)?;
    require_fields(obj, &["signal", "confidence_score", "rationale", "trading_pair"])?;

    let signal_value = obj.get("signal").cloned().unwrap_or(serde_json::Value::Null);
    let signal: NewsSignal = serde_json::from_value(signal_value.clone()).map_err(|_| {
        Error::SchemaViolation(format!(
            "signal must be one of BUY, SELL, HOLD, got {signal_value}"
        ))
    })?;

    let confidence_score = numeric_field(obj, "confidence_score")?;
    if !(0.0..=1.0).contains(&confidence_score) {
        return Err(Error::SchemaViolation(format!(
            "confidence_score must be within [0, 1], got {confidence_score}"
        )));
    }

    Ok(NewsAnalysis {
        signal,
        confidence_score,
        rationale: str_field(obj, "rationale")?,
        trading_pair: str_field(obj, "trading_pair")?,
        news_source: str_field(obj, "news_source")
            .ok()
            .or_else(|| article.source.clone()),
        news_title: str_field(obj, "news_title")
            .ok()
            .or_else(|| Some(article.title.clone())),
        published_at: str_field(obj, "published_at")
            .ok()
            .or_else(|| article.published_at.clone()),
    })
}

/// Search terms derived from trading pairs: "BTC price", "BTC news", ...
pub fn pair_keywords(pairs: &[String]) -> Vec<String> {
    let mut keywords = Vec::new();
    for pair in pairs {
        let base = pair.strip_suffix("USDT").unwrap_or(pair);
        for suffix in ["price", "news", "update", "analysis"] {
            keywords.push(format!("{base} {suffix}"));
        }
    }
    keywords
}

/// Run the per-article analysis for every pair mentioned in one of the
/// three most relevant articles.
///
/// One bad article or refused completion must not sink the whole pass,
/// so per-article failures are logged and skipped. Each article yields
/// at most one verdict.
pub async fn news_signals(
    feed: &dyn NewsFeed,
    model: &dyn AdvisoryModel,
    pairs: &[String],
) -> Result<Vec<NewsAnalysis>> {
    let keywords = pair_keywords(pairs);
    let articles = feed.latest(&keywords).await?;
    if articles.is_empty() {
        warn!("no relevant news articles found");
        return Ok(Vec::new());
    }

    let mut signals = Vec::new();
    for article in articles.iter().take(3) {
        for pair in pairs {
            let base = pair.strip_suffix("USDT").unwrap_or(pair);
            if !article.mentions(base) {
                continue;
            }
            let prompt = news_analysis_prompt(article, pair);
            match model.generate(&prompt).await {
                Ok(raw) => match parse_news_analysis(&raw, article) {
                    Ok(analysis) => {
                        debug!(
                            pair = %pair,
                            signal = %analysis.signal,
                            confidence = analysis.confidence_score,
                            title = %article.title,
                            "news verdict"
                        );
                        signals.push(analysis);
                        break;
                    }
                    Err(e) => {
                        warn!(title = %article.title, error = %e, "discarding unusable news analysis")
                    }
                },
                Err(e) => warn!(title = %article.title, error = %e, "news analysis request failed"),
            }
        }
    }
    Ok(signals)
}

// ─── Feed client ──────────────────────────────────────────────────────────────

const BASE_URL: &str = "https://api.thenewsapi.com/v1";

/// Always-on search terms, merged with the per-pair keywords.
const BASE_KEYWORDS: &[&str] = &[
    "stock market",
    "inflation",
    "interest rates",
    "federal reserve",
    "bull market",
    "bear market",
    "market volatility",
    "bitcoin",
    "BTC",
    "ethereum",
    "ETH",
    "cryptocurrency",
    "blockchain",
    "crypto regulation",
    "stablecoin",
    "crypto adoption",
    "SEC",
    "CFTC",
    "ETF",
    "halving",
    "staking",
    "Binance",
    "Coinbase",
    "gold price",
    "oil price",
    "geopolitical risk",
    "economic sanctions",
];

/// Client for a TheNewsAPI-style article feed.
pub struct NewsApiClient {
    api_token: String,
    http: Client,
}

impl NewsApiClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            http: Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl NewsFeed for NewsApiClient {
    /// Articles from the last 24 hours matching the merged keyword set,
    /// most relevant first, at most ten after URL deduplication.
    async fn latest(&self, keywords: &[String]) -> Result<Vec<NewsArticle>> {
        let published_after = (Utc::now() - Duration::hours(24))
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        let search = merge_keywords(keywords).join(" OR ");

        debug!(terms = keywords.len(), "fetching recent news");
        let resp = self
            .http
            .get(format!("{BASE_URL}/news/all"))
            .query(&[
                ("api_token", self.api_token.as_str()),
                ("search", search.as_str()),
                ("categories", "business,tech"),
                ("language", "en"),
                ("published_after", published_after.as_str()),
                ("limit", "10"),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::News(format!("HTTP {status}: {body}")));
        }

        let page: NewsPage = serde_json::from_str(&body).map_err(|e| Error::News(e.to_string()))?;
        Ok(rank_articles(page.data))
    }
}

/// Base keywords plus the caller's, lowercased, first occurrence wins.
fn merge_keywords(extra: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for keyword in BASE_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .chain(extra.iter().map(|k| k.to_lowercase()))
    {
        if seen.insert(keyword.clone()) {
            merged.push(keyword);
        }
    }
    merged
}

/// Most relevant first, one article per URL, capped at ten.
fn rank_articles(mut articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    articles.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut seen_urls = HashSet::new();
    articles.retain(|a| match &a.url {
        Some(url) => seen_urls.insert(url.clone()),
        None => true,
    });
    articles.truncate(10);
    articles
}

#[derive(Deserialize)]
struct NewsPage {
    #[serde(default)]
    data: Vec<NewsArticle>,
}
