use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("insufficient data: need at least {needed} candles, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("invalid candle data: {0}")]
    InvalidData(String),

    #[error("unknown strategy: '{0}'")]
    UnknownStrategy(String),

    #[error("strategy '{strategy}' requires indicator '{indicator}' which is not in the bundle")]
    MissingIndicator {
        strategy: &'static str,
        indicator: String,
    },

    /// The advisory model returned text with no JSON object anywhere in it.
    /// Carries the raw response for logging.
    #[error("advisory response contains no parsable JSON")]
    Unparsable { raw: String },

    #[error("advisory response violates the suggestion schema: {0}")]
    SchemaViolation(String),

    #[error("Exchange API error: {0}")]
    Exchange(String),

    #[error("Advisory API error: {0}")]
    Advisory(String),

    #[error("News API error: {0}")]
    News(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
