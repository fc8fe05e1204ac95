//! The four signal policies. Each reads only the latest candle and the
//! latest value of its indicators; a gap in any reading makes the
//! comparisons that involve it false, degrading toward `NONE`.

use common::{CandleSeries, Signal};
use indicators::IndicatorBundle;

use crate::names;
use crate::params::{BreakoutParams, MeanReversionParams, ScalperParams, TrendRiderParams};
use crate::verdict::{Diagnostics, SignalVerdict, TrendDirection};

pub(crate) fn trend_rider(p: &TrendRiderParams, bundle: &IndicatorBundle) -> SignalVerdict {
    let adx = bundle.latest("adx");
    let di_plus = bundle.latest("di_plus");
    let di_minus = bundle.latest("di_minus");
    let rsi = bundle.latest("rsi");

    let trend_strength = adx.is_some_and(|v| v > p.adx_threshold);
    let trend_up = matches!((di_plus, di_minus), (Some(dp), Some(dm)) if dp > dm);

    let mut signal = Signal::None;
    if trend_strength {
        if trend_up && rsi.is_some_and(|v| v < p.rsi_oversold) {
            signal = Signal::Buy;
        } else if !trend_up && rsi.is_some_and(|v| v > p.rsi_overbought) {
            signal = Signal::Sell;
        }
    }

    SignalVerdict {
        strategy: names::TREND_RIDER,
        signal,
        diagnostics: Diagnostics::TrendRider {
            trend_strength,
            trend_direction: if trend_up {
                TrendDirection::Up
            } else {
                TrendDirection::Down
            },
            rsi,
        },
    }
}

pub(crate) fn breakout(
    p: &BreakoutParams,
    series: &CandleSeries,
    bundle: &IndicatorBundle,
) -> SignalVerdict {
    let last = series.last();
    let price = last.close;
    let volume = last.volume;

    let bb_upper = bundle.latest("bb_upper");
    let bb_lower = bundle.latest("bb_lower");
    let atr = bundle.latest("atr");
    let volume_sma = bundle.latest("volume_sma");

    let volume_surge = volume_sma.is_some_and(|s| volume > s * p.volume_threshold);

    let mut signal = Signal::None;
    if volume_surge {
        if bb_upper.is_some_and(|u| price > u) {
            signal = Signal::Buy;
        } else if bb_lower.is_some_and(|l| price < l) {
            signal = Signal::Sell;
        }
    }

    SignalVerdict {
        strategy: names::BREAKOUT,
        signal,
        diagnostics: Diagnostics::Breakout {
            volatility: atr.map(|a| a / price),
            price_range: match (bb_upper, bb_lower) {
                (Some(u), Some(l)) => Some(u - l),
                _ => None,
            },
            volume_ratio: ratio(volume, volume_sma),
        },
    }
}

pub(crate) fn mean_reversion(
    p: &MeanReversionParams,
    series: &CandleSeries,
    bundle: &IndicatorBundle,
) -> SignalVerdict {
    let price = series.last().close;

    let rsi = bundle.latest("rsi");
    let bb_upper = bundle.latest("bb_upper");
    let bb_middle = bundle.latest("bb_middle");
    let bb_lower = bundle.latest("bb_lower");

    let mut signal = Signal::None;
    if rsi.is_some_and(|r| r < p.rsi_oversold) && bb_lower.is_some_and(|l| price < l) {
        signal = Signal::Buy;
    } else if rsi.is_some_and(|r| r > p.rsi_overbought) && bb_upper.is_some_and(|u| price > u) {
        signal = Signal::Sell;
    }

    SignalVerdict {
        strategy: names::MEAN_REVERSION,
        signal,
        diagnostics: Diagnostics::MeanReversion {
            rsi,
            price_to_mean: bb_middle.map(|m| (price - m) / m),
            bb_position: match (bb_upper, bb_lower) {
                (Some(u), Some(l)) if u - l != 0.0 => Some((price - l) / (u - l)),
                _ => None,
            },
        },
    }
}

pub(crate) fn scalper(
    p: &ScalperParams,
    series: &CandleSeries,
    bundle: &IndicatorBundle,
) -> SignalVerdict {
    let last = series.last();

    let ema_fast = bundle.latest(&format!("ema_{}", p.ema_fast));
    let ema_slow = bundle.latest(&format!("ema_{}", p.ema_slow));
    let rsi = bundle.latest("rsi");
    let volume_sma = bundle.latest("volume_sma");

    let ema_cross = matches!((ema_fast, ema_slow), (Some(f), Some(s)) if f > s);
    let volume_surge = volume_sma.is_some_and(|s| last.volume > s * p.volume_threshold);

    let mut signal = Signal::None;
    if volume_surge {
        if ema_cross && rsi.is_some_and(|v| v < p.rsi_oversold) {
            signal = Signal::Buy;
        } else if !ema_cross && rsi.is_some_and(|v| v > p.rsi_overbought) {
            signal = Signal::Sell;
        }
    }

    SignalVerdict {
        strategy: names::SCALPER,
        signal,
        diagnostics: Diagnostics::Scalper {
            ema_cross,
            volume_ratio: ratio(last.volume, volume_sma),
            rsi,
        },
    }
}

/// `value / base`, with no value when the base is absent or zero.
fn ratio(value: f64, base: Option<f64>) -> Option<f64> {
    match base {
        Some(b) if b != 0.0 => Some(value / b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::Candle;
    use indicators::Series;

    fn one_candle(close: f64, volume: f64) -> CandleSeries {
        CandleSeries::new(vec![Candle {
            open_time: Utc.timestamp_opt(0, 0).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }])
        .unwrap()
    }

    fn bundle_with(values: &[(&str, Option<f64>)]) -> IndicatorBundle {
        let mut b = IndicatorBundle::new(1);
        for (name, v) in values {
            let series: Series = vec![*v];
            b.insert_trend(*name, series);
        }
        b
    }

    #[test]
    fn trend_rider_buys_strong_up_trend_with_low_rsi() {
        let b = bundle_with(&[
            ("adx", Some(30.0)),
            ("di_plus", Some(28.0)),
            ("di_minus", Some(12.0)),
            ("rsi", Some(25.0)),
        ]);
        let v = trend_rider(&TrendRiderParams::default(), &b);
        assert_eq!(v.signal, Signal::Buy);
        assert_eq!(
            v.diagnostics,
            Diagnostics::TrendRider {
                trend_strength: true,
                trend_direction: TrendDirection::Up,
                rsi: Some(25.0),
            }
        );
    }

    #[test]
    fn trend_rider_sells_strong_down_trend_with_high_rsi() {
        let b = bundle_with(&[
            ("adx", Some(30.0)),
            ("di_plus", Some(12.0)),
            ("di_minus", Some(28.0)),
            ("rsi", Some(75.0)),
        ]);
        let v = trend_rider(&TrendRiderParams::default(), &b);
        assert_eq!(v.signal, Signal::Sell);
    }

    #[test]
    fn trend_rider_weak_trend_is_none_whatever_rsi_says() {
        let b = bundle_with(&[
            ("adx", Some(10.0)),
            ("di_plus", Some(28.0)),
            ("di_minus", Some(12.0)),
            ("rsi", Some(25.0)),
        ]);
        assert_eq!(trend_rider(&TrendRiderParams::default(), &b).signal, Signal::None);
    }

    #[test]
    fn trend_rider_gap_rsi_degrades_to_none() {
        let b = bundle_with(&[
            ("adx", Some(30.0)),
            ("di_plus", Some(28.0)),
            ("di_minus", Some(12.0)),
            ("rsi", None),
        ]);
        let v = trend_rider(&TrendRiderParams::default(), &b);
        assert_eq!(v.signal, Signal::None);
        assert_eq!(
            v.diagnostics,
            Diagnostics::TrendRider {
                trend_strength: true,
                trend_direction: TrendDirection::Up,
                rsi: None,
            }
        );
    }

    #[test]
    fn breakout_needs_both_surge_and_band_break() {
        let series = one_candle(105.0, 200.0);
        // above upper band with 2x volume
        let b = bundle_with(&[
            ("bb_upper", Some(104.0)),
            ("bb_lower", Some(96.0)),
            ("atr", Some(2.0)),
            ("volume_sma", Some(100.0)),
        ]);
        let v = breakout(&BreakoutParams::default(), &series, &b);
        assert_eq!(v.signal, Signal::Buy);
        assert_eq!(
            v.diagnostics,
            Diagnostics::Breakout {
                volatility: Some(2.0 / 105.0),
                price_range: Some(8.0),
                volume_ratio: Some(2.0),
            }
        );

        // same break without the surge
        let quiet = one_candle(105.0, 100.0);
        let v = breakout(&BreakoutParams::default(), &quiet, &b);
        assert_eq!(v.signal, Signal::None);
    }

    #[test]
    fn breakout_sells_below_the_lower_band() {
        let series = one_candle(95.0, 200.0);
        let b = bundle_with(&[
            ("bb_upper", Some(104.0)),
            ("bb_lower", Some(96.0)),
            ("atr", Some(2.0)),
            ("volume_sma", Some(100.0)),
        ]);
        assert_eq!(
            breakout(&BreakoutParams::default(), &series, &b).signal,
            Signal::Sell
        );
    }

    #[test]
    fn mean_reversion_fades_both_extremes() {
        let b = bundle_with(&[
            ("rsi", Some(25.0)),
            ("bb_upper", Some(110.0)),
            ("bb_middle", Some(100.0)),
            ("bb_lower", Some(90.0)),
        ]);
        let low = one_candle(89.0, 10.0);
        let v = mean_reversion(&MeanReversionParams::default(), &low, &b);
        assert_eq!(v.signal, Signal::Buy);
        let Diagnostics::MeanReversion { bb_position, .. } = v.diagnostics else {
            panic!("wrong diagnostics variant");
        };
        assert!((bb_position.unwrap() - (-0.05)).abs() < 1e-12);

        let b = bundle_with(&[
            ("rsi", Some(75.0)),
            ("bb_upper", Some(110.0)),
            ("bb_middle", Some(100.0)),
            ("bb_lower", Some(90.0)),
        ]);
        let high = one_candle(111.0, 10.0);
        assert_eq!(
            mean_reversion(&MeanReversionParams::default(), &high, &b).signal,
            Signal::Sell
        );
    }

    #[test]
    fn mean_reversion_inside_the_bands_is_none() {
        let b = bundle_with(&[
            ("rsi", Some(25.0)),
            ("bb_upper", Some(110.0)),
            ("bb_middle", Some(100.0)),
            ("bb_lower", Some(90.0)),
        ]);
        // oversold RSI but price still inside the bands
        let series = one_candle(95.0, 10.0);
        assert_eq!(
            mean_reversion(&MeanReversionParams::default(), &series, &b).signal,
            Signal::None
        );
    }

    #[test]
    fn mean_reversion_flat_bands_have_no_position() {
        let b = bundle_with(&[
            ("rsi", Some(50.0)),
            ("bb_upper", Some(100.0)),
            ("bb_middle", Some(100.0)),
            ("bb_lower", Some(100.0)),
        ]);
        let series = one_candle(100.0, 10.0);
        let v = mean_reversion(&MeanReversionParams::default(), &series, &b);
        let Diagnostics::MeanReversion { bb_position, .. } = v.diagnostics else {
            panic!("wrong diagnostics variant");
        };
        assert_eq!(bb_position, None);
    }

    #[test]
    fn scalper_gates_everything_on_volume() {
        let b = bundle_with(&[
            ("ema_8", Some(101.0)),
            ("ema_21", Some(100.0)),
            ("rsi", Some(25.0)),
            ("volume_sma", Some(100.0)),
        ]);
        let surging = one_candle(100.0, 150.0);
        let v = scalper(&ScalperParams::default(), &surging, &b);
        assert_eq!(v.signal, Signal::Buy);

        let quiet = one_candle(100.0, 100.0);
        assert_eq!(
            scalper(&ScalperParams::default(), &quiet, &b).signal,
            Signal::None
        );
    }

    #[test]
    fn scalper_sells_on_down_cross_with_high_rsi() {
        let b = bundle_with(&[
            ("ema_8", Some(99.0)),
            ("ema_21", Some(100.0)),
            ("rsi", Some(75.0)),
            ("volume_sma", Some(100.0)),
        ]);
        let series = one_candle(100.0, 150.0);
        let v = scalper(&ScalperParams::default(), &series, &b);
        assert_eq!(v.signal, Signal::Sell);
        let Diagnostics::Scalper {
            ema_cross,
            volume_ratio,
            ..
        } = v.diagnostics
        else {
            panic!("wrong diagnostics variant");
        };
        assert!(!ema_cross);
        assert_eq!(volume_ratio, Some(1.5));
    }
}
