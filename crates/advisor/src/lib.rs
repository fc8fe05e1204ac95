//! Advisory-model integration: prompt construction, strict and loose
//! response parsing, and the REST clients behind the advisory traits.

pub mod gemini;
pub mod loose;
pub mod news;
pub mod prompt;
pub mod suggestion;

pub use gemini::GeminiClient;
pub use loose::{parse_digest, parse_headlines, MarketDigest};
pub use news::{news_signals, parse_news_analysis, pair_keywords, NewsAnalysis, NewsApiClient};
pub use prompt::{
    digest_prompt, discovery_prompt, news_analysis_prompt, suggestion_prompt, MarketSnapshot,
};
pub use suggestion::{parse_suggestion, SuggestionContext, TradeSuggestion};
