//! Candlestick pattern detectors.
//!
//! Each detector is a pure geometric test over one to three candles and
//! emits talib-style flags per candle: +100 bullish, -100 bearish, 0
//! none. Candles whose lookback reaches before the series start emit 0.
//!
//! Single-candle shapes that need trend context (hammer vs hanging man)
//! use the direction of the two preceding closes as a cheap proxy.

use common::Candle;

/// Body may take at most this fraction of the range for a doji.
const DOJI_BODY_MAX: f64 = 0.1;
/// Body cap for "small body" shapes (hammer, star middles).
const SMALL_BODY_MAX: f64 = 0.3;
/// Bodies at or above this fraction of the range count as "long".
const LONG_BODY_MIN: f64 = 0.6;
/// Minimum tail fraction for hammer-shaped candles.
const HAMMER_TAIL_MIN: f64 = 0.6;
/// Maximum wick fraction opposite the hammer tail.
const HAMMER_WICK_MAX: f64 = 0.1;

fn body(c: &Candle) -> f64 {
    (c.close - c.open).abs()
}

fn range(c: &Candle) -> f64 {
    c.high - c.low
}

fn upper_shadow(c: &Candle) -> f64 {
    c.high - c.close.max(c.open)
}

fn lower_shadow(c: &Candle) -> f64 {
    c.close.min(c.open) - c.low
}

fn is_bullish(c: &Candle) -> bool {
    c.close > c.open
}

fn is_bearish(c: &Candle) -> bool {
    c.close < c.open
}

fn small_body(c: &Candle) -> bool {
    let r = range(c);
    r > 0.0 && body(c) <= r * SMALL_BODY_MAX
}

fn long_body(c: &Candle) -> bool {
    let r = range(c);
    r > 0.0 && body(c) >= r * LONG_BODY_MIN
}

fn midpoint(c: &Candle) -> f64 {
    (c.open + c.close) / 2.0
}

/// Long lower tail, tiny upper wick, small body near the top.
fn hammer_shape(c: &Candle) -> bool {
    let r = range(c);
    r > 0.0
        && body(c) <= r * SMALL_BODY_MAX
        && lower_shadow(c) >= r * HAMMER_TAIL_MIN
        && upper_shadow(c) <= r * HAMMER_WICK_MAX
}

/// Doji: the body is at most a tenth of the range. A doji has no
/// direction of its own, so presence is flagged as +100.
pub fn doji(candles: &[Candle]) -> Vec<i32> {
    candles
        .iter()
        .map(|c| {
            let r = range(c);
            if r > 0.0 && body(c) <= r * DOJI_BODY_MAX {
                100
            } else {
                0
            }
        })
        .collect()
}

/// Hammer: hammer shape after two falling closes.
pub fn hammer(candles: &[Candle]) -> Vec<i32> {
    let mut out = vec![0; candles.len()];
    for i in 2..candles.len() {
        if hammer_shape(&candles[i]) && candles[i - 1].close < candles[i - 2].close {
            out[i] = 100;
        }
    }
    out
}

/// Hanging man: the same shape after two rising closes.
pub fn hanging_man(candles: &[Candle]) -> Vec<i32> {
    let mut out = vec![0; candles.len()];
    for i in 2..candles.len() {
        if hammer_shape(&candles[i]) && candles[i - 1].close > candles[i - 2].close {
            out[i] = -100;
        }
    }
    out
}

/// Engulfing: opposite-colour pair where the second body strictly
/// exceeds and covers the first.
pub fn engulfing(candles: &[Candle]) -> Vec<i32> {
    let mut out = vec![0; candles.len()];
    for i in 1..candles.len() {
        let (prev, cur) = (&candles[i - 1], &candles[i]);
        if body(cur) <= body(prev) {
            continue;
        }
        if is_bearish(prev)
            && is_bullish(cur)
            && cur.open <= prev.close
            && cur.close >= prev.open
        {
            out[i] = 100;
        } else if is_bullish(prev)
            && is_bearish(cur)
            && cur.open >= prev.close
            && cur.close <= prev.open
        {
            out[i] = -100;
        }
    }
    out
}

/// Morning star: long bearish candle, small-bodied star at or below its
/// close, then a bullish candle closing above the first body's midpoint.
pub fn morning_star(candles: &[Candle]) -> Vec<i32> {
    let mut out = vec![0; candles.len()];
    for i in 2..candles.len() {
        let (a, b, c) = (&candles[i - 2], &candles[i - 1], &candles[i]);
        if is_bearish(a)
            && long_body(a)
            && small_body(b)
            && b.open.max(b.close) <= a.close
            && is_bullish(c)
            && c.close >= midpoint(a)
        {
            out[i] = 100;
        }
    }
    out
}

/// Evening star: the bearish mirror of the morning star.
pub fn evening_star(candles: &[Candle]) -> Vec<i32> {
    let mut out = vec![0; candles.len()];
    for i in 2..candles.len() {
        let (a, b, c) = (&candles[i - 2], &candles[i - 1], &candles[i]);
        if is_bullish(a)
            && long_body(a)
            && small_body(b)
            && b.open.min(b.close) >= a.close
            && is_bearish(c)
            && c.close <= midpoint(a)
        {
            out[i] = -100;
        }
    }
    out
}

/// Three white soldiers: three long bullish candles, each opening inside
/// the previous body and closing higher.
pub fn three_white_soldiers(candles: &[Candle]) -> Vec<i32> {
    let mut out = vec![0; candles.len()];
    for i in 2..candles.len() {
        let trio = &candles[i - 2..=i];
        if trio.iter().all(|c| is_bullish(c) && long_body(c))
            && trio[1].close > trio[0].close
            && trio[2].close > trio[1].close
            && trio[1].open >= trio[0].open
            && trio[1].open <= trio[0].close
            && trio[2].open >= trio[1].open
            && trio[2].open <= trio[1].close
        {
            out[i] = 100;
        }
    }
    out
}

/// Three black crows: three long bearish candles, each opening inside
/// the previous body and closing lower.
pub fn three_black_crows(candles: &[Candle]) -> Vec<i32> {
    let mut out = vec![0; candles.len()];
    for i in 2..candles.len() {
        let trio = &candles[i - 2..=i];
        if trio.iter().all(|c| is_bearish(c) && long_body(c))
            && trio[1].close < trio[0].close
            && trio[2].close < trio[1].close
            && trio[1].open <= trio[0].open
            && trio[1].open >= trio[0].close
            && trio[2].open <= trio[1].open
            && trio[2].open >= trio[1].close
        {
            out[i] = -100;
        }
    }
    out
}

/// All detectors with their bundle names, in a fixed order.
pub fn detect_all(candles: &[Candle]) -> [(&'static str, Vec<i32>); 8] {
    [
        ("doji", doji(candles)),
        ("hammer", hammer(candles)),
        ("hanging_man", hanging_man(candles)),
        ("engulfing", engulfing(candles)),
        ("morning_star", morning_star(candles)),
        ("evening_star", evening_star(candles)),
        ("three_white_soldiers", three_white_soldiers(candles)),
        ("three_black_crows", three_black_crows(candles)),
    ]
}
