//! Volume indicators: OBV, rolling VWAP and the volume SMA.

use crate::bundle::Series;
use crate::window;

/// On-balance volume, seeded with the first candle's volume. Volume is
/// added on up-closes, subtracted on down-closes and carried on flats,
/// so the series has no gap prefix.
pub fn obv(closes: &[f64], volumes: &[f64]) -> Series {
    let n = closes.len();
    if n == 0 {
        return Vec::new();
    }
    let mut out = vec![None; n];
    let mut acc = volumes[0];
    out[0] = Some(acc);
    for i in 1..n {
        if closes[i] > closes[i - 1] {
            acc += volumes[i];
        } else if closes[i] < closes[i - 1] {
            acc -= volumes[i];
        }
        out[i] = Some(acc);
    }
    out
}

/// Volume-weighted average price of the typical price over a rolling
/// `period` window. A window that traded no volume at all has no VWAP.
pub fn vwap(highs: &[f64], lows: &[f64], closes: &[f64], volumes: &[f64], period: usize) -> Series {
    assert!(period >= 1, "VWAP period must be >= 1");
    let n = closes.len();
    let tp: Vec<f64> = (0..n)
        .map(|i| (highs[i] + lows[i] + closes[i]) / 3.0)
        .collect();
    let mut out = vec![None; n];
    for i in (period - 1)..n {
        let mut pv = 0.0;
        let mut v = 0.0;
        for j in i + 1 - period..=i {
            pv += tp[j] * volumes[j];
            v += volumes[j];
        }
        out[i] = (v > 0.0).then(|| pv / v);
    }
    out
}

/// SMA of raw volume, used as the baseline for volume-surge checks.
pub fn volume_sma(volumes: &[f64], period: usize) -> Series {
    window::sma(volumes, period)
}
