use chrono::{TimeZone, Utc};
use common::{Candle, CandleSeries, IndicatorSettings};
use proptest::prelude::*;

/// Random but well-formed candle series: positive prices, high at or
/// above close, low at or below, strictly increasing timestamps.
fn arb_series(max_len: usize) -> impl Strategy<Value = CandleSeries> {
    prop::collection::vec(
        (1.0f64..10_000.0, 0.0f64..1_000.0, 0.0f64..0.09, 0.0f64..0.09),
        1..max_len,
    )
    .prop_map(|rows| {
        let candles = rows
            .iter()
            .enumerate()
            .map(|(i, (close, volume, up, down))| {
                let high = close * (1.0 + up);
                let low = close * (1.0 - down);
                Candle {
                    open_time: Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
                    open: (high + low) / 2.0,
                    high,
                    low,
                    close: *close,
                    volume: *volume,
                }
            })
            .collect();
        CandleSeries::new(candles).unwrap()
    })
}

proptest! {
    /// Every numeric series and every pattern series in the bundle has
    /// exactly one slot per candle, whatever the series length.
    #[test]
    fn bundle_stays_aligned_for_any_length(series in arb_series(150)) {
        let bundle = indicators::compute(&series, &IndicatorSettings::default()).unwrap();
        for (_, map) in bundle.numeric_categories() {
            for (name, s) in map {
                prop_assert_eq!(s.len(), series.len(), "series '{}' misaligned", name);
            }
        }
        for (name, flags) in &bundle.patterns {
            prop_assert_eq!(flags.len(), series.len(), "pattern '{}' misaligned", name);
        }
    }

    /// Bounded oscillators stay inside their ranges wherever they have
    /// a value, and pattern flags only ever take -100, 0 or +100.
    #[test]
    fn oscillators_respect_their_bounds(series in arb_series(120)) {
        let bundle = indicators::compute(&series, &IndicatorSettings::default()).unwrap();
        for name in ["rsi", "stoch_k", "stoch_d", "adx"] {
            for v in bundle.series(name).unwrap().iter().flatten() {
                prop_assert!((0.0..=100.0).contains(v), "{} out of range: {}", name, v);
            }
        }
        for v in bundle.series("willr").unwrap().iter().flatten() {
            prop_assert!((-100.0..=0.0).contains(v), "willr out of range: {}", v);
        }
        for (name, flags) in &bundle.patterns {
            for f in flags {
                prop_assert!(
                    [-100, 0, 100].contains(f),
                    "pattern '{}' emitted {}", name, f
                );
            }
        }
    }

    /// Same candles in, same bundle out.
    #[test]
    fn compute_is_idempotent(series in arb_series(80)) {
        let cfg = IndicatorSettings::default();
        let a = indicators::compute(&series, &cfg).unwrap();
        let b = indicators::compute(&series, &cfg).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Bollinger bands never cross their midline, and the ATR is never
    /// negative.
    #[test]
    fn volatility_outputs_are_ordered(series in arb_series(100)) {
        let bundle = indicators::compute(&series, &IndicatorSettings::default()).unwrap();
        let upper = bundle.series("bb_upper").unwrap();
        let middle = bundle.series("bb_middle").unwrap();
        let lower = bundle.series("bb_lower").unwrap();
        for i in 0..bundle.len() {
            if let (Some(u), Some(m), Some(l)) = (upper[i], middle[i], lower[i]) {
                prop_assert!(l <= m && m <= u);
            }
        }
        for v in bundle.series("atr").unwrap().iter().flatten() {
            prop_assert!(*v >= 0.0, "negative ATR: {}", v);
        }
    }

    /// OBV never moves against the close-to-close direction, and rebuilding
    /// it candle by candle lands on exactly the bulk values.
    #[test]
    fn obv_follows_the_close_and_rebuilds_incrementally(series in arb_series(120)) {
        let bundle = indicators::compute(&series, &IndicatorSettings::default()).unwrap();
        let obv = bundle.series("obv").unwrap();
        let closes = series.closes();
        let volumes = series.volumes();

        let mut running = volumes[0];
        prop_assert_eq!(obv[0], Some(running));
        for i in 1..series.len() {
            if closes[i] > closes[i - 1] {
                running += volumes[i];
            } else if closes[i] < closes[i - 1] {
                running -= volumes[i];
            }
            let step = obv[i].unwrap() - obv[i - 1].unwrap();
            if closes[i] > closes[i - 1] {
                prop_assert!(step >= 0.0, "OBV fell on an up close: {}", step);
            } else if closes[i] < closes[i - 1] {
                prop_assert!(step <= 0.0, "OBV rose on a down close: {}", step);
            } else {
                prop_assert_eq!(step, 0.0, "OBV moved on a flat close");
            }
            prop_assert_eq!(obv[i], Some(running));
        }
    }

    /// Support/resistance levels come out sorted, deduplicated and inside
    /// the observed price envelope.
    #[test]
    fn levels_are_sorted_and_in_range(series in arb_series(100)) {
        let sr = indicators::support_resistance(&series, 10).unwrap();
        let lows = series.lows();
        let highs = series.highs();
        let min_low = lows.iter().copied().fold(f64::INFINITY, f64::min);
        let max_high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for w in sr.support.windows(2) {
            prop_assert!(w[0] < w[1], "support not strictly ascending");
        }
        for w in sr.resistance.windows(2) {
            prop_assert!(w[0] < w[1], "resistance not strictly ascending");
        }
        for s in &sr.support {
            prop_assert!(*s >= min_low && *s <= max_high);
        }
        for r in &sr.resistance {
            prop_assert!(*r >= min_low && *r <= max_high);
        }
    }
}
