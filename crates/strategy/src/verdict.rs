use common::Signal;
use serde::Serialize;

/// The outcome of one strategy evaluation.
///
/// Diagnostic values are `Option` because an indicator whose window is
/// not yet filled has no latest value; that absence is reported as-is
/// rather than as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalVerdict {
    pub strategy: &'static str,
    pub signal: Signal,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Up,
    Down,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "UP"),
            TrendDirection::Down => write!(f, "DOWN"),
        }
    }
}

/// Strategy-specific readings behind the signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostics {
    TrendRider {
        trend_strength: bool,
        trend_direction: TrendDirection,
        rsi: Option<f64>,
    },
    Breakout {
        /// ATR relative to the current price.
        volatility: Option<f64>,
        /// Width of the Bollinger channel.
        price_range: Option<f64>,
        volume_ratio: Option<f64>,
    },
    MeanReversion {
        rsi: Option<f64>,
        /// Distance from the Bollinger midline, as a fraction of it.
        price_to_mean: Option<f64>,
        /// 0.0 at the lower band, 1.0 at the upper.
        bb_position: Option<f64>,
    },
    Scalper {
        /// True when the fast EMA is above the slow one.
        ema_cross: bool,
        volume_ratio: Option<f64>,
        rsi: Option<f64>,
    },
}
