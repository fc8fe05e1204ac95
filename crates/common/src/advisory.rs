use async_trait::async_trait;

use crate::{NewsArticle, Result};

/// A text-in, text-out advisory model.
///
/// `GeminiClient` in `crates/advisor` implements this. The raw response
/// is returned untouched; parsing and validation happen downstream so
/// tests can feed canned responses through the same path.
#[async_trait]
pub trait AdvisoryModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Source of recent market news.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// Most recent articles matching any of `keywords`.
    async fn latest(&self, keywords: &[String]) -> Result<Vec<NewsArticle>>;
}
