//! Rolling-window primitives shared by the indicator modules.
//!
//! Every function takes values oldest-first and returns a [`Series`] of
//! the same length, with `None` wherever the window is not yet filled.

use crate::bundle::Series;

/// Simple moving average.
pub fn sma(values: &[f64], period: usize) -> Series {
    assert!(period >= 1, "SMA period must be >= 1");
    let n = values.len();
    let mut out = vec![None; n];
    if n < period {
        return out;
    }
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);
    for i in period..n {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Exponential moving average, seeded with the SMA of the first `period`
/// values (same as TradingView / pandas-ta).
pub fn ema(values: &[f64], period: usize) -> Series {
    assert!(period >= 1, "EMA period must be >= 1");
    let n = values.len();
    let mut out = vec![None; n];
    if n < period {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut val = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(val);
    for i in period..n {
        val = values[i] * k + val * (1.0 - k);
        out[i] = Some(val);
    }
    out
}

/// Wilder smoothing: seeds with the mean of the first `period` values,
/// then s[i] = (s[i-1] * (period - 1) + v[i]) / period.
pub fn wilder(values: &[f64], period: usize) -> Series {
    assert!(period >= 1, "Wilder period must be >= 1");
    let n = values.len();
    let mut out = vec![None; n];
    if n < period {
        return out;
    }
    let mut val = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(val);
    for i in period..n {
        val = (val * (period as f64 - 1.0) + values[i]) / period as f64;
        out[i] = Some(val);
    }
    out
}

/// Rolling population standard deviation.
pub fn rolling_std(values: &[f64], period: usize) -> Series {
    assert!(period >= 1, "std period must be >= 1");
    let n = values.len();
    let mut out = vec![None; n];
    for i in (period - 1)..n {
        let w = &values[i + 1 - period..=i];
        let mean = w.iter().sum::<f64>() / period as f64;
        let var = w.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        out[i] = Some(var.sqrt());
    }
    out
}

pub fn rolling_max(values: &[f64], period: usize) -> Series {
    assert!(period >= 1, "max period must be >= 1");
    let n = values.len();
    let mut out = vec![None; n];
    for i in (period - 1)..n {
        let w = &values[i + 1 - period..=i];
        out[i] = Some(w.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    }
    out
}

pub fn rolling_min(values: &[f64], period: usize) -> Series {
    assert!(period >= 1, "min period must be >= 1");
    let n = values.len();
    let mut out = vec![None; n];
    for i in (period - 1)..n {
        let w = &values[i + 1 - period..=i];
        out[i] = Some(w.iter().copied().fold(f64::INFINITY, f64::min));
    }
    out
}

/// SMA over a series whose leading entries may be gaps.
/// Output stays aligned; a window containing any gap stays a gap.
pub fn sma_of(series: &Series, period: usize) -> Series {
    assert!(period >= 1, "SMA period must be >= 1");
    let n = series.len();
    let mut out = vec![None; n];
    for i in (period - 1)..n {
        let w = &series[i + 1 - period..=i];
        if w.iter().all(Option::is_some) {
            out[i] = Some(w.iter().flatten().sum::<f64>() / period as f64);
        }
    }
    out
}

/// EMA over a series with a gap prefix. The seed SMA lands `period - 1`
/// entries after the first value, keeping the output aligned.
pub fn ema_of(series: &Series, period: usize) -> Series {
    let n = series.len();
    let mut out = vec![None; n];
    let Some(offset) = series.iter().position(Option::is_some) else {
        return out;
    };
    let values: Vec<f64> = series[offset..].iter().filter_map(|v| *v).collect();
    for (i, v) in ema(&values, period).into_iter().enumerate() {
        out[offset + i] = v;
    }
    out
}

/// Shift a series toward the future by `n` slots: out[i] = s[i - n].
/// Values pushed past the end are dropped, keeping the length fixed.
pub fn shift_forward(series: &Series, n: usize) -> Series {
    let len = series.len();
    let mut out = vec![None; len];
    for i in n..len {
        out[i] = series[i - n];
    }
    out
}

/// True range of a candle given the previous close.
pub(crate) fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_fills_gaps_then_averages() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn sma_shorter_than_period_is_all_gaps() {
        assert_eq!(sma(&[1.0, 2.0], 3), vec![None, None]);
    }

    #[test]
    fn ema_seed_is_the_initial_sma() {
        let out = ema(&[2.0, 4.0, 6.0, 8.0], 3);
        assert_eq!(out[2], Some(4.0));
        // k = 0.5: 8 * 0.5 + 4 * 0.5 = 6
        assert_eq!(out[3], Some(6.0));
    }

    #[test]
    fn wilder_recurrence_matches_by_hand() {
        let out = wilder(&[3.0, 3.0, 3.0, 6.0], 3);
        assert_eq!(out[2], Some(3.0));
        // (3 * 2 + 6) / 3 = 4
        assert_eq!(out[3], Some(4.0));
    }

    #[test]
    fn rolling_extremes_track_their_window() {
        let v = [5.0, 1.0, 4.0, 2.0];
        assert_eq!(rolling_max(&v, 2), vec![None, Some(5.0), Some(4.0), Some(4.0)]);
        assert_eq!(rolling_min(&v, 2), vec![None, Some(1.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn rolling_std_of_constant_is_zero() {
        let out = rolling_std(&[7.0; 5], 3);
        assert_eq!(out[4], Some(0.0));
    }

    #[test]
    fn sma_of_respects_gap_prefix() {
        let s: Series = vec![None, None, Some(3.0), Some(5.0), Some(7.0)];
        let out = sma_of(&s, 2);
        assert_eq!(out, vec![None, None, None, Some(4.0), Some(6.0)]);
    }

    #[test]
    fn ema_of_stays_aligned_after_the_prefix() {
        let s: Series = vec![None, Some(2.0), Some(4.0), Some(6.0)];
        let out = ema_of(&s, 2);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        // seed SMA of [2, 4] lands one slot after the first value
        assert_eq!(out[2], Some(3.0));
    }

    #[test]
    fn shift_forward_drops_the_tail() {
        let s: Series = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(shift_forward(&s, 2), vec![None, None, Some(1.0)]);
    }
}
