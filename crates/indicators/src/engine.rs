//! Assembles the full indicator bundle for one candle series.

use common::{CandleSeries, IndicatorSettings, Result};

use crate::bundle::IndicatorBundle;
use crate::{momentum, patterns, trend, volatility, volume, window};

/// Compute every configured indicator over `series`.
///
/// All output series are aligned to the candles; a series shorter than
/// an indicator's window produces leading gaps, never an error. Input
/// validation (non-empty, positive finite prices, ordered timestamps)
/// already happened in [`CandleSeries::new`].
pub fn compute(series: &CandleSeries, cfg: &IndicatorSettings) -> Result<IndicatorBundle> {
    let highs = series.highs();
    let lows = series.lows();
    let closes = series.closes();
    let volumes = series.volumes();

    let mut bundle = IndicatorBundle::new(series.len());

    // ── Trend ──
    for &p in &cfg.sma_periods {
        bundle.insert_trend(format!("sma_{p}"), window::sma(&closes, p));
    }
    for &p in &cfg.ema_periods {
        bundle.insert_trend(format!("ema_{p}"), window::ema(&closes, p));
    }
    let dmi = trend::dmi(&highs, &lows, &closes, cfg.adx_period);
    bundle.insert_trend("adx", dmi.adx);
    bundle.insert_trend("di_plus", dmi.di_plus);
    bundle.insert_trend("di_minus", dmi.di_minus);
    let ich = trend::ichimoku(
        &highs,
        &lows,
        cfg.ichimoku_conversion,
        cfg.ichimoku_base,
        cfg.ichimoku_span_b,
        cfg.ichimoku_displacement,
    );
    bundle.insert_trend("tenkan_sen", ich.tenkan);
    bundle.insert_trend("kijun_sen", ich.kijun);
    bundle.insert_trend("senkou_span_a", ich.senkou_a);
    bundle.insert_trend("senkou_span_b", ich.senkou_b);

    // ── Momentum ──
    bundle.insert_momentum("rsi", momentum::rsi(&closes, cfg.rsi_period));
    let stoch = momentum::stochastic(
        &highs,
        &lows,
        &closes,
        cfg.stoch_period,
        cfg.stoch_smooth_k,
        cfg.stoch_smooth_d,
    );
    bundle.insert_momentum("stoch_k", stoch.k);
    bundle.insert_momentum("stoch_d", stoch.d);
    let macd = momentum::macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal);
    bundle.insert_momentum("macd", macd.line);
    bundle.insert_momentum("macd_signal", macd.signal);
    bundle.insert_momentum("macd_hist", macd.histogram);
    bundle.insert_momentum("cci", momentum::cci(&highs, &lows, &closes, cfg.cci_period));
    bundle.insert_momentum("willr", momentum::willr(&highs, &lows, &closes, cfg.willr_period));

    // ── Volatility ──
    let bb = volatility::bollinger(&closes, cfg.bollinger_period, cfg.bollinger_std_dev);
    let atr = volatility::atr(&highs, &lows, &closes, cfg.atr_period);
    let kc = volatility::keltner(&bb.middle, &atr);
    bundle.insert_volatility("bb_upper", bb.upper);
    bundle.insert_volatility("bb_middle", bb.middle);
    bundle.insert_volatility("bb_lower", bb.lower);
    bundle.insert_volatility("atr", atr);
    bundle.insert_volatility("kc_upper", kc.upper);
    bundle.insert_volatility("kc_lower", kc.lower);

    // ── Volume ──
    bundle.insert_volume("obv", volume::obv(&closes, &volumes));
    bundle.insert_volume(
        "vwap",
        volume::vwap(&highs, &lows, &closes, &volumes, cfg.vwap_period),
    );
    bundle.insert_volume(
        "volume_sma",
        volume::volume_sma(&volumes, cfg.volume_sma_period),
    );

    // ── Patterns ──
    for (name, flags) in patterns::detect_all(series.candles()) {
        bundle.insert_pattern(name, flags);
    }

    tracing::debug!(
        candles = series.len(),
        trend = bundle.trend.len(),
        momentum = bundle.momentum.len(),
        volatility = bundle.volatility.len(),
        volume = bundle.volume.len(),
        patterns = bundle.patterns.len(),
        "computed indicator bundle"
    );
    Ok(bundle)
}
