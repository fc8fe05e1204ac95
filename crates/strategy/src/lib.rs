//! The strategy evaluator: four fixed signal policies over the latest
//! values of an indicator bundle.
//!
//! Strategies form a closed set, so they are an enum dispatched with
//! `match` rather than trait objects; adding a strategy means adding a
//! variant and the compiler points at every spot that must handle it.

pub mod params;
pub mod risk;
mod rules;
pub mod verdict;

pub use params::{BreakoutParams, MeanReversionParams, ScalperParams, TrendRiderParams};
pub use risk::{risk_levels, RiskLevels, ATR_STOP_MULTIPLIER};
pub use verdict::{Diagnostics, SignalVerdict, TrendDirection};

use common::{CandleSeries, Error, Result};
use indicators::IndicatorBundle;

/// Display names, exactly as they appear in configuration and AI
/// suggestions.
pub mod names {
    pub const TREND_RIDER: &str = "Dynamic Trend Rider";
    pub const BREAKOUT: &str = "Volatility Breakout Pro";
    pub const MEAN_REVERSION: &str = "Mean Reversion AI";
    pub const SCALPER: &str = "Scalper's Edge AI";
}

/// A named strategy with its fixed parameter set.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyKind {
    TrendRider(TrendRiderParams),
    Breakout(BreakoutParams),
    MeanReversion(MeanReversionParams),
    Scalper(ScalperParams),
}

impl StrategyKind {
    pub const NAMES: [&'static str; 4] = [
        names::TREND_RIDER,
        names::BREAKOUT,
        names::MEAN_REVERSION,
        names::SCALPER,
    ];

    /// Resolve a display name to a strategy with default parameters.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            names::TREND_RIDER => Ok(Self::TrendRider(TrendRiderParams::default())),
            names::BREAKOUT => Ok(Self::Breakout(BreakoutParams::default())),
            names::MEAN_REVERSION => Ok(Self::MeanReversion(MeanReversionParams::default())),
            names::SCALPER => Ok(Self::Scalper(ScalperParams::default())),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TrendRider(_) => names::TREND_RIDER,
            Self::Breakout(_) => names::BREAKOUT,
            Self::MeanReversion(_) => names::MEAN_REVERSION,
            Self::Scalper(_) => names::SCALPER,
        }
    }

    /// Bundle names this strategy reads. EMA names are derived from the
    /// configured periods, so a scalper tuned to 8/21 demands `ema_8`
    /// and `ema_21` even if the engine was only configured for 12/26.
    pub fn required_indicators(&self) -> Vec<String> {
        match self {
            Self::TrendRider(p) => vec![
                format!("ema_{}", p.ema_fast),
                format!("ema_{}", p.ema_slow),
                "adx".into(),
                "di_plus".into(),
                "di_minus".into(),
                "rsi".into(),
            ],
            Self::Breakout(_) => ["bb_upper", "bb_middle", "bb_lower", "atr", "volume_sma"]
                .map(String::from)
                .to_vec(),
            Self::MeanReversion(_) => ["rsi", "bb_upper", "bb_middle", "bb_lower"]
                .map(String::from)
                .to_vec(),
            Self::Scalper(p) => vec![
                format!("ema_{}", p.ema_fast),
                format!("ema_{}", p.ema_slow),
                "rsi".into(),
                "volume_sma".into(),
            ],
        }
    }

    /// Evaluate the policy against the latest candle and the latest
    /// bundle values. Fails with `MissingIndicator` before reading
    /// anything if a required series is absent; a present series whose
    /// latest slot is still a gap makes the affected comparisons false,
    /// which degrades the verdict toward `NONE`.
    pub fn evaluate(
        &self,
        series: &CandleSeries,
        bundle: &IndicatorBundle,
    ) -> Result<SignalVerdict> {
        for name in self.required_indicators() {
            if !bundle.contains(&name) {
                return Err(Error::MissingIndicator {
                    strategy: self.name(),
                    indicator: name,
                });
            }
        }

        let verdict = match self {
            Self::TrendRider(p) => rules::trend_rider(p, bundle),
            Self::Breakout(p) => rules::breakout(p, series, bundle),
            Self::MeanReversion(p) => rules::mean_reversion(p, series, bundle),
            Self::Scalper(p) => rules::scalper(p, series, bundle),
        };
        tracing::debug!(strategy = self.name(), signal = %verdict.signal, "evaluated");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::{Candle, IndicatorSettings, Signal};

    #[test]
    fn every_display_name_resolves() {
        for name in StrategyKind::NAMES {
            let kind = StrategyKind::from_name(name).unwrap();
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn unknown_name_is_an_error_carrying_the_name() {
        let err = StrategyKind::from_name("Golden Goose").unwrap_err();
        match err {
            Error::UnknownStrategy(name) => assert_eq!(name, "Golden Goose"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_indicator_error_names_strategy_and_indicator() {
        let series = CandleSeries::new(vec![Candle {
            open_time: Utc.timestamp_opt(0, 0).unwrap(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5,
            volume: 10.0,
        }])
        .unwrap();
        let bundle = IndicatorBundle::new(1);
        let err = StrategyKind::from_name(names::MEAN_REVERSION)
            .unwrap()
            .evaluate(&series, &bundle)
            .unwrap_err();
        match err {
            Error::MissingIndicator {
                strategy,
                indicator,
            } => {
                assert_eq!(strategy, names::MEAN_REVERSION);
                assert_eq!(indicator, "rsi");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// The scalper defaults to 8/21 EMAs while the default engine
    /// config computes 12/26, so evaluating it without widening
    /// `ema_periods` reports exactly which series is missing.
    #[test]
    fn scalper_under_default_engine_config_reports_ema_8() {
        let candles = (0..60)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.2;
                Candle {
                    open_time: Utc.timestamp_opt(i * 60, 0).unwrap(),
                    open: close - 0.1,
                    high: close + 0.5,
                    low: close - 0.5,
                    close,
                    volume: 25.0,
                }
            })
            .collect();
        let series = CandleSeries::new(candles).unwrap();
        let bundle = indicators::compute(&series, &IndicatorSettings::default()).unwrap();
        let err = StrategyKind::from_name(names::SCALPER)
            .unwrap()
            .evaluate(&series, &bundle)
            .unwrap_err();
        match err {
            Error::MissingIndicator { indicator, .. } => assert_eq!(indicator, "ema_8"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn trend_rider_runs_against_a_real_bundle() {
        let candles = (0..80)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.31).sin() * 2.0;
                Candle {
                    open_time: Utc.timestamp_opt(i * 3600, 0).unwrap(),
                    open: close - 0.2,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 40.0 + (i % 5) as f64,
                }
            })
            .collect();
        let series = CandleSeries::new(candles).unwrap();
        let bundle = indicators::compute(&series, &IndicatorSettings::default()).unwrap();
        let verdict = StrategyKind::from_name(names::TREND_RIDER)
            .unwrap()
            .evaluate(&series, &bundle)
            .unwrap();
        assert!(matches!(
            verdict.signal,
            Signal::Buy | Signal::Sell | Signal::None
        ));
        assert_eq!(verdict.strategy, names::TREND_RIDER);
    }
}
