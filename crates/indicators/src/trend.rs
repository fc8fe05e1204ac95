//! Trend indicators: the directional movement system and Ichimoku.
//! Plain moving averages come straight from [`crate::window`].

use crate::bundle::Series;
use crate::window;

pub struct DmiOutput {
    pub di_plus: Series,
    pub di_minus: Series,
    pub adx: Series,
}

/// Wilder's directional movement system.
///
/// +DM counts an up-move only when it exceeds the down-move (and vice
/// versa); both are zero on inside days. The directional indexes start
/// at index `period`, ADX at `2 * period - 1` because it smooths DX over
/// a second window.
pub fn dmi(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> DmiOutput {
    assert!(period >= 1, "DMI period must be >= 1");
    let n = closes.len();
    let mut out = DmiOutput {
        di_plus: vec![None; n],
        di_minus: vec![None; n],
        adx: vec![None; n],
    };
    if n < period + 1 {
        return out;
    }

    // Change-based arrays: entry j describes candle j + 1.
    let mut tr = Vec::with_capacity(n - 1);
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);
    for i in 1..n {
        let up = highs[i] - highs[i - 1];
        let down = lows[i - 1] - lows[i];
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        tr.push(window::true_range(highs[i], lows[i], closes[i - 1]));
    }

    let s_tr = window::wilder(&tr, period);
    let s_plus = window::wilder(&plus_dm, period);
    let s_minus = window::wilder(&minus_dm, period);

    // DX values feed a second Wilder pass for ADX; collect them densely
    // starting at change-index period - 1 (candle index `period`).
    let mut dx = Vec::with_capacity(n - period);
    for j in (period - 1)..(n - 1) {
        let (Some(t), Some(p), Some(m)) = (s_tr[j], s_plus[j], s_minus[j]) else {
            continue;
        };
        let (dip, dim) = if t == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * p / t, 100.0 * m / t)
        };
        out.di_plus[j + 1] = Some(dip);
        out.di_minus[j + 1] = Some(dim);
        let sum = dip + dim;
        dx.push(if sum == 0.0 { 0.0 } else { 100.0 * (dip - dim).abs() / sum });
    }

    for (t, v) in window::wilder(&dx, period).into_iter().enumerate() {
        // dx[t] belongs to candle index period + t
        if let Some(adx) = v {
            out.adx[period + t] = Some(adx);
        }
    }
    out
}

pub struct IchimokuOutput {
    pub tenkan: Series,
    pub kijun: Series,
    pub senkou_a: Series,
    pub senkou_b: Series,
}

/// Ichimoku cloud lines.
///
/// Each line is the midpoint of the rolling high/low range over its
/// period. The two senkou spans are displaced `displacement` candles
/// into the future; values that would land beyond the series are
/// dropped so all four series stay aligned with the candles.
pub fn ichimoku(
    highs: &[f64],
    lows: &[f64],
    conversion: usize,
    base: usize,
    span_b: usize,
    displacement: usize,
) -> IchimokuOutput {
    let midpoint = |period: usize| -> Series {
        window::rolling_max(highs, period)
            .into_iter()
            .zip(window::rolling_min(lows, period))
            .map(|pair| match pair {
                (Some(h), Some(l)) => Some((h + l) / 2.0),
                _ => None,
            })
            .collect()
    };

    let tenkan = midpoint(conversion);
    let kijun = midpoint(base);
    let raw_a: Series = tenkan
        .iter()
        .zip(&kijun)
        .map(|pair| match pair {
            (Some(t), Some(k)) => Some((t + k) / 2.0),
            _ => None,
        })
        .collect();
    let senkou_a = window::shift_forward(&raw_a, displacement);
    let senkou_b = window::shift_forward(&midpoint(span_b), displacement);

    IchimokuOutput {
        tenkan,
        kijun,
        senkou_a,
        senkou_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up_down_series(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        // Zig-zag with a drift so both DM sides stay active.
        let closes: Vec<f64> = (0..n)
            .map(|i| 100.0 + i as f64 * 0.3 + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 0.8).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 0.8).collect();
        (highs, lows, closes)
    }

    #[test]
    fn dmi_gap_structure_matches_the_double_smoothing() {
        let (h, l, c) = up_down_series(40);
        let out = dmi(&h, &l, &c, 5);
        assert!(out.di_plus[4].is_none());
        assert!(out.di_plus[5].is_some());
        assert!(out.adx[8].is_none());
        // 2 * period - 1
        assert!(out.adx[9].is_some());
    }

    #[test]
    fn adx_stays_within_bounds() {
        let (h, l, c) = up_down_series(60);
        let out = dmi(&h, &l, &c, 14);
        for v in out.adx.iter().flatten() {
            assert!((0.0..=100.0).contains(v), "ADX out of range: {v}");
        }
    }

    #[test]
    fn dmi_rising_market_favours_di_plus() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 0.5).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 0.5).collect();
        let out = dmi(&highs, &lows, &closes, 14);
        let dip = out.di_plus.last().unwrap().unwrap();
        let dim = out.di_minus.last().unwrap().unwrap();
        assert!(dip > dim, "expected +DI {dip} > -DI {dim}");
    }

    #[test]
    fn dmi_too_short_is_all_gaps() {
        let (h, l, c) = up_down_series(5);
        let out = dmi(&h, &l, &c, 14);
        assert!(out.di_plus.iter().all(Option::is_none));
        assert!(out.adx.iter().all(Option::is_none));
    }

    #[test]
    fn ichimoku_lines_start_where_their_windows_fill() {
        let highs: Vec<f64> = (0..120).map(|i| 101.0 + i as f64 * 0.1).collect();
        let lows: Vec<f64> = (0..120).map(|i| 99.0 + i as f64 * 0.1).collect();
        let out = ichimoku(&highs, &lows, 9, 26, 52, 26);
        assert!(out.tenkan[7].is_none());
        assert!(out.tenkan[8].is_some());
        assert!(out.kijun[24].is_none());
        assert!(out.kijun[25].is_some());
        // senkou A: kijun fills at 25, displaced 26 → 51
        assert!(out.senkou_a[50].is_none());
        assert!(out.senkou_a[51].is_some());
        // senkou B: 52-window fills at 51, displaced 26 → 77
        assert!(out.senkou_b[76].is_none());
        assert!(out.senkou_b[77].is_some());
    }

    #[test]
    fn ichimoku_midpoints_sit_between_high_and_low() {
        let highs: Vec<f64> = (0..60).map(|i| 105.0 + (i % 7) as f64).collect();
        let lows: Vec<f64> = (0..60).map(|i| 95.0 - (i % 5) as f64).collect();
        let out = ichimoku(&highs, &lows, 9, 26, 52, 26);
        for v in out.tenkan.iter().flatten() {
            assert!(*v > 90.0 && *v < 115.0);
        }
    }
}
