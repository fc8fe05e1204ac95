//! Volatility indicators: Bollinger bands, ATR and the Keltner channel.

use crate::bundle::Series;
use crate::window;

pub struct BollingerOutput {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Bollinger bands: SMA midline ± `std_dev` population standard
/// deviations.
pub fn bollinger(closes: &[f64], period: usize, std_dev: f64) -> BollingerOutput {
    let middle = window::sma(closes, period);
    let sd = window::rolling_std(closes, period);
    let band = |sign: f64| -> Series {
        middle
            .iter()
            .zip(&sd)
            .map(|pair| match pair {
                (Some(m), Some(s)) => Some(m + sign * std_dev * s),
                _ => None,
            })
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);
    BollingerOutput {
        upper,
        middle,
        lower,
    }
}

/// Average True Range: the rolling mean of the true range over `period`
/// candles. The first candle has no previous close, so its true range
/// falls back to high - low.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Series {
    let n = closes.len();
    if n == 0 {
        return Vec::new();
    }
    let mut tr = Vec::with_capacity(n);
    tr.push(highs[0] - lows[0]);
    for i in 1..n {
        tr.push(window::true_range(highs[i], lows[i], closes[i - 1]));
    }
    window::sma(&tr, period)
}

pub struct KeltnerOutput {
    pub upper: Series,
    pub lower: Series,
}

/// Keltner-style channel: the Bollinger midline shifted by twice the ATR.
pub fn keltner(bb_middle: &Series, atr: &Series) -> KeltnerOutput {
    let band = |sign: f64| -> Series {
        bb_middle
            .iter()
            .zip(atr)
            .map(|pair| match pair {
                (Some(m), Some(a)) => Some(m + sign * 2.0 * a),
                _ => None,
            })
            .collect()
    };
    KeltnerOutput {
        upper: band(1.0),
        lower: band(-1.0),
    }
}
