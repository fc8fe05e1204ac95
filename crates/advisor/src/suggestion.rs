//! Strict parsing and validation of advisory trade suggestions.
//!
//! The advisory model is asked for JSON only, but in practice wraps the
//! object in prose or markdown fences often enough that parsing happens
//! in two stages: a direct parse of the trimmed text, then a parse of
//! the widest `{...}` span inside it. Whatever survives is then checked
//! against the suggestion schema field by field, so the rest of the bot
//! only ever sees a fully validated [`TradeSuggestion`].

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use common::{Error, Result, Signal};

/// What the caller was asking about when it prompted the model.
///
/// Carried alongside the raw response for log context; validation is
/// driven entirely by the response itself.
#[derive(Debug, Clone)]
pub struct SuggestionContext {
    pub symbol: String,
    pub timeframe: String,
    pub strategy_name: String,
    pub current_price: f64,
}

/// A fully validated trade suggestion. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSuggestion {
    pub trading_pair: String,
    pub timeframe: String,
    pub strategy: String,
    pub signal: Signal,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit_levels: [f64; 3],
    pub confidence_score: f64,
    pub rationale: String,
}

/// Parse and validate a raw advisory response.
///
/// Fails with [`Error::Unparsable`] when no JSON object can be found in
/// the text, and with [`Error::SchemaViolation`] when the object does
/// not satisfy the suggestion schema.
pub fn parse_suggestion(raw: &str, ctx: &SuggestionContext) -> Result<TradeSuggestion> {
    let value = parse_json_value(raw)?;
    let suggestion = validate(&value)?;
    debug!(
        pair = %ctx.symbol,
        timeframe = %ctx.timeframe,
        strategy = %ctx.strategy_name,
        signal = %suggestion.signal,
        confidence = suggestion.confidence_score,
        "validated advisory suggestion"
    );
    Ok(suggestion)
}

/// Two-stage JSON extraction: the whole trimmed text, then the widest
/// braced span inside it (first `{` to last `}`).
pub(crate) fn parse_json_value(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }
    if let Some(span) = braced_span(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }
    Err(Error::Unparsable {
        raw: raw.to_string(),
    })
}

fn braced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn validate(value: &Value) -> Result<TradeSuggestion> {
    const REQUIRED: [&str; 9] = [
        "trading_pair",
        "timeframe",
        "strategy",
        "signal",
        "entry_price",
        "stop_loss",
        "take_profit_levels",
        "confidence_score",
        "rationale",
    ];

    let obj = as_object(value)?;
    require_fields(obj, &REQUIRED)?;

    let signal_value = obj.get("signal").cloned().unwrap_or(Value::Null);
    let signal: Signal = serde_json::from_value(signal_value.clone()).map_err(|_| {
        Error::SchemaViolation(format!(
            "signal must be one of BUY, SELL, NONE, got {signal_value}"
        ))
    })?;

    let confidence_score = numeric_field(obj, "confidence_score")?;
    if !(0.0..=1.0).contains(&confidence_score) {
        return Err(Error::SchemaViolation(format!(
            "confidence_score must be within [0, 1], got {confidence_score}"
        )));
    }

    let levels = obj
        .get("take_profit_levels")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::SchemaViolation("take_profit_levels must be an array".to_string())
        })?;
    if levels.len() != 3 {
        return Err(Error::SchemaViolation(format!(
            "take_profit_levels must hold exactly 3 values, got {}",
            levels.len()
        )));
    }
    let mut take_profit_levels = [0.0f64; 3];
    for (slot, level) in take_profit_levels.iter_mut().zip(levels) {
        *slot = coerce_f64(level).ok_or_else(|| {
            Error::SchemaViolation(format!("take_profit_levels must be numeric, got {level}"))
        })?;
    }

    let rationale = str_field(obj, "rationale")?;
    if rationale.trim().is_empty() {
        return Err(Error::SchemaViolation(
            "rationale must not be empty".to_string(),
        ));
    }

    Ok(TradeSuggestion {
        trading_pair: str_field(obj, "trading_pair")?,
        timeframe: str_field(obj, "timeframe")?,
        strategy: str_field(obj, "strategy")?,
        signal,
        entry_price: numeric_field(obj, "entry_price")?,
        stop_loss: numeric_field(obj, "stop_loss")?,
        take_profit_levels,
        confidence_score,
        rationale,
    })
}

pub(crate) fn as_object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::SchemaViolation("response is not a JSON object".to_string()))
}

/// Every name in `required` must be a key of `obj`; the error message
/// names all absentees at once so one round-trip surfaces everything.
pub(crate) fn require_fields(obj: &Map<String, Value>, required: &[&str]) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|field| !obj.contains_key(**field))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::SchemaViolation(format!(
            "missing fields: {}",
            missing.join(", ")
        )))
    }
}

pub(crate) fn str_field(obj: &Map<String, Value>, field: &str) -> Result<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::SchemaViolation(format!("{field} must be a string")))
}

pub(crate) fn numeric_field(obj: &Map<String, Value>, field: &str) -> Result<f64> {
    obj.get(field)
        .and_then(coerce_f64)
        .ok_or_else(|| Error::SchemaViolation(format!("{field} must be numeric")))
}

/// A JSON number, or a string holding one. Models quote numerals often
/// enough that rejecting `"0.8"` outright would discard otherwise valid
/// suggestions.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
