use advisor::{parse_digest, parse_headlines, parse_suggestion, SuggestionContext};
use common::Error;
use proptest::prelude::*;

fn ctx() -> SuggestionContext {
    SuggestionContext {
        symbol: "BTCUSDT".to_string(),
        timeframe: "1h".to_string(),
        strategy_name: "Dynamic Trend Rider".to_string(),
        current_price: 65_000.0,
    }
}

proptest! {
    /// The loose parsers accept any text at all without panicking, and
    /// a digest that matched nothing carries the input back verbatim.
    #[test]
    fn digest_is_total_and_degrades_to_raw(text in ".{0,400}") {
        let digest = parse_digest(&text);
        if let Some(raw) = &digest.raw {
            prop_assert_eq!(raw, &text);
            prop_assert!(digest.sentiment.is_none());
            prop_assert!(digest.signal.is_none());
            prop_assert!(digest.confidence.is_none());
            prop_assert!(digest.justification.is_none());
        }
    }

    /// Headline extraction never yields empty lines and never panics.
    #[test]
    fn headlines_are_total_and_non_blank(text in ".{0,400}") {
        for headline in parse_headlines(&text) {
            prop_assert!(!headline.trim().is_empty());
        }
    }

    /// The strict parser never panics; brace-free text always comes
    /// back as `Unparsable` carrying the original.
    #[test]
    fn strict_parse_is_total(text in "[^{}]{0,200}") {
        // a bare JSON scalar ("42", "true") parses in stage one and then
        // fails validation, so both error kinds are acceptable here
        match parse_suggestion(&text, &ctx()) {
            Ok(_) => prop_assert!(false, "schema requires nine fields"),
            Err(Error::Unparsable { raw }) => prop_assert_eq!(raw, text),
            Err(Error::SchemaViolation(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
