//! Tolerant parsers for free-form advisory prose.
//!
//! The news discovery and sentiment prompts ask for plain text, not
//! JSON, so these parsers accept anything and never fail: headline
//! extraction drops what it cannot clean up, and digest extraction
//! degrades to carrying the raw text when no marker matches. They feed
//! display and logging, not the validated trade path.

use serde::Serialize;

/// Sentiment digest distilled from a free-form market commentary.
///
/// Each field holds the text after the first colon of the last line
/// mentioning its marker. `raw` is set only when no marker matched
/// anywhere, and then holds the entire response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketDigest {
    pub sentiment: Option<String>,
    pub signal: Option<String>,
    pub confidence: Option<String>,
    pub justification: Option<String>,
    pub raw: Option<String>,
}

/// Headline-like lines: trimmed, bullet and numbering prefixes
/// stripped, blanks dropped.
pub fn parse_headlines(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_headline)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_headline(line: &str) -> &str {
    let line = line.trim().trim_start_matches(['-', '*', '•', ' ']);
    // "1. headline" / "2) headline" style numbering
    let line = match line.split_once(['.', ')']) {
        Some((prefix, rest))
            if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) =>
        {
            rest
        }
        _ => line,
    };
    line.trim()
}

/// Scan commentary line by line for sentiment, signal, confidence and
/// reasoning markers. Later lines overwrite earlier ones for the same
/// field. Text that matches nothing comes back whole in `raw`.
pub fn parse_digest(text: &str) -> MarketDigest {
    let mut digest = MarketDigest::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        let value = after_colon(line);
        if lower.contains("sentiment") {
            digest.sentiment = Some(capitalize(value));
        }
        if lower.contains("signal") {
            digest.signal = Some(value.to_uppercase());
        }
        if lower.contains("confidence") {
            digest.confidence = Some(capitalize(value));
        }
        if lower.contains("reason") || lower.contains("because") {
            digest.justification = Some(value.to_string());
        }
    }
    if digest == MarketDigest::default() {
        digest.raw = Some(text.to_string());
    }
    digest
}

/// Text after the first `:`, or the whole line when there is none
/// (reasoning sentences rarely carry a colon).
fn after_colon(line: &str) -> &str {
    match line.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => line,
    }
}

/// First letter uppercased, the rest lowercased, so `bullish`, `BULLISH`
/// and `Bullish` all normalize to the same display form.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
