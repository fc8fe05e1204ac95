use serde::Serialize;

/// Protective levels derived from the ATR at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward_ratio: f64,
}

/// Stop distance in ATRs, shared by all strategies.
pub const ATR_STOP_MULTIPLIER: f64 = 1.5;

/// Stop-loss and take-profit around `entry_price`.
///
/// The arithmetic is long-biased: the stop always lands below the entry
/// and the target above it, even when the triggering signal was a SELL.
/// Callers acting on shorts must mirror the levels themselves.
pub fn risk_levels(entry_price: f64, atr: f64, risk_reward_ratio: f64) -> RiskLevels {
    let stop_distance = atr * ATR_STOP_MULTIPLIER;
    RiskLevels {
        stop_loss: entry_price - stop_distance,
        take_profit: entry_price + stop_distance * risk_reward_ratio,
        risk_reward_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_scale_with_atr_and_ratio() {
        let r = risk_levels(100.0, 2.0, 2.0);
        assert_eq!(r.stop_loss, 97.0);
        assert_eq!(r.take_profit, 106.0);
        assert_eq!(r.risk_reward_ratio, 2.0);
    }

    /// The formula does not know about direction: even for a short setup
    /// the stop sits below the entry. Consumers must invert for SELLs.
    #[test]
    fn levels_always_assume_a_long() {
        let r = risk_levels(100.0, 2.0, 2.0);
        assert!(r.stop_loss < 100.0);
        assert!(r.take_profit > 100.0);
    }

    #[test]
    fn reward_is_risk_times_ratio() {
        let r = risk_levels(250.0, 1.25, 3.0);
        let risk = 250.0 - r.stop_loss;
        let reward = r.take_profit - 250.0;
        assert!((reward - risk * 3.0).abs() < 1e-12);
    }
}
