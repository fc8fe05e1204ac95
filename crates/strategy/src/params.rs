//! Fixed parameter sets for each strategy variant.
//!
//! Period fields double as the source for derived bundle names (an
//! `ema_fast` of 12 demands `ema_12`), so they stay in lockstep with
//! `required_indicators`.

use serde::Serialize;

/// "Dynamic Trend Rider": ADX-gated trend following with RSI pullback
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRiderParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub adx_threshold: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for TrendRiderParams {
    fn default() -> Self {
        TrendRiderParams {
            ema_fast: 12,
            ema_slow: 26,
            adx_threshold: 25.0,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

/// "Volatility Breakout Pro": Bollinger band breaks confirmed by a
/// volume surge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakoutParams {
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub atr_period: usize,
    /// Volume must exceed its SMA by this multiple.
    pub volume_threshold: f64,
}

impl Default for BreakoutParams {
    fn default() -> Self {
        BreakoutParams {
            bb_period: 20,
            bb_std_dev: 2.0,
            atr_period: 14,
            volume_threshold: 1.5,
        }
    }
}

/// "Mean Reversion AI": fade RSI extremes outside the Bollinger bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanReversionParams {
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub bb_period: usize,
    pub bb_std_dev: f64,
}

impl Default for MeanReversionParams {
    fn default() -> Self {
        MeanReversionParams {
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            bb_period: 20,
            bb_std_dev: 2.0,
        }
    }
}

/// "Scalper's Edge AI": tight EMA cross direction with an RSI filter
/// and a volume gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalperParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub volume_threshold: f64,
}

impl Default for ScalperParams {
    fn default() -> Self {
        ScalperParams {
            ema_fast: 8,
            ema_slow: 21,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            volume_threshold: 1.2,
        }
    }
}
