//! Support and resistance levels from centered-window extrema.

use common::{CandleSeries, Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SupportResistance {
    /// Ascending, deduplicated lows that were local minima.
    pub support: Vec<f64>,
    /// Ascending, deduplicated highs that were local maxima.
    pub resistance: Vec<f64>,
}

/// A candle's low is support when it is the minimum of the `window`
/// candles centered on it; resistance mirrors with highs. Positions
/// whose window would run past either end of the series are skipped
/// entirely, so a strictly monotone series yields no levels at all.
pub fn support_resistance(series: &CandleSeries, window: usize) -> Result<SupportResistance> {
    if window < 2 {
        return Err(Error::InvalidData(format!(
            "support/resistance window must be >= 2, got {window}"
        )));
    }
    let half = window / 2;
    let candles = series.candles();
    let n = candles.len();

    let mut support = Vec::new();
    let mut resistance = Vec::new();
    if n > 2 * half {
        for i in half..n - half {
            let neighborhood = &candles[i - half..=i + half];
            let lo = candles[i].low;
            if neighborhood.iter().all(|c| lo <= c.low) {
                support.push(lo);
            }
            let hi = candles[i].high;
            if neighborhood.iter().all(|c| hi >= c.high) {
                resistance.push(hi);
            }
        }
    }

    support.sort_by(|a, b| a.total_cmp(b));
    support.dedup();
    resistance.sort_by(|a, b| a.total_cmp(b));
    resistance.dedup();
    Ok(SupportResistance {
        support,
        resistance,
    })
}
