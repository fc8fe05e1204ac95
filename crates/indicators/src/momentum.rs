//! Momentum oscillators: RSI, stochastic, MACD, CCI and Williams %R.

use crate::bundle::Series;
use crate::window;

/// Relative Strength Index with Wilder smoothing (same as TradingView).
/// First value lands at index `period`; a pure up-run reads 100, a pure
/// down-run 0.
pub fn rsi(closes: &[f64], period: usize) -> Series {
    assert!(period >= 1, "RSI period must be >= 1");
    let n = closes.len();
    let mut out = vec![None; n];
    if n < period + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(n - 1);
    let mut losses = Vec::with_capacity(n - 1);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gain = window::wilder(&gains, period);
    let avg_loss = window::wilder(&losses, period);
    for i in period..n {
        let (Some(g), Some(l)) = (avg_gain[i - 1], avg_loss[i - 1]) else {
            continue;
        };
        out[i] = Some(if l == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + g / l)
        });
    }
    out
}

pub struct StochasticOutput {
    pub k: Series,
    pub d: Series,
}

/// Slow stochastic oscillator: raw %K over `period`, smoothed by
/// `smooth_k`, with %D a further SMA over `smooth_d`. A window with no
/// range at all reads a neutral 50.
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> StochasticOutput {
    let hh = window::rolling_max(highs, period);
    let ll = window::rolling_min(lows, period);
    let fast_k: Series = closes
        .iter()
        .enumerate()
        .map(|(i, c)| match (hh[i], ll[i]) {
            (Some(h), Some(l)) => {
                let range = h - l;
                Some(if range == 0.0 {
                    50.0
                } else {
                    100.0 * (c - l) / range
                })
            }
            _ => None,
        })
        .collect();

    let k = window::sma_of(&fast_k, smooth_k);
    let d = window::sma_of(&k, smooth_d);
    StochasticOutput { k, d }
}

pub struct MacdOutput {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// MACD line (EMA fast − EMA slow), its signal EMA and the histogram.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdOutput {
    assert!(fast < slow, "MACD fast period must be less than slow period");
    let fast_ema = window::ema(closes, fast);
    let slow_ema = window::ema(closes, slow);
    let line: Series = fast_ema
        .into_iter()
        .zip(slow_ema)
        .map(|pair| match pair {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();
    let signal_line = window::ema_of(&line, signal);
    let histogram: Series = line
        .iter()
        .zip(&signal_line)
        .map(|pair| match pair {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();
    MacdOutput {
        line,
        signal: signal_line,
        histogram,
    }
}

/// Commodity Channel Index over the typical price, 0.015 Lambert
/// constant. A flat window (zero mean deviation) reads 0.
pub fn cci(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Series {
    assert!(period >= 1, "CCI period must be >= 1");
    let n = closes.len();
    let tp: Vec<f64> = (0..n)
        .map(|i| (highs[i] + lows[i] + closes[i]) / 3.0)
        .collect();
    let tp_sma = window::sma(&tp, period);
    let mut out = vec![None; n];
    for i in (period - 1)..n {
        let Some(mean) = tp_sma[i] else { continue };
        let w = &tp[i + 1 - period..=i];
        let mad = w.iter().map(|v| (v - mean).abs()).sum::<f64>() / period as f64;
        out[i] = Some(if mad == 0.0 {
            0.0
        } else {
            (tp[i] - mean) / (0.015 * mad)
        });
    }
    out
}

/// Williams %R: where the close sits in the rolling high/low range,
/// scaled to [-100, 0]. A flat window reads -50.
pub fn willr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Series {
    let hh = window::rolling_max(highs, period);
    let ll = window::rolling_min(lows, period);
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| match (hh[i], ll[i]) {
            (Some(h), Some(l)) => {
                let range = h - l;
                Some(if range == 0.0 {
                    -50.0
                } else {
                    -100.0 * (h - c) / range
                })
            }
            _ => None,
        })
        .collect()
}
