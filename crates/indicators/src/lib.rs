//! Turns a validated candle series into a categorized bundle of aligned
//! indicator series: trend, momentum, volatility, volume and candlestick
//! patterns, plus standalone support/resistance levels.

pub mod bundle;
pub mod engine;
pub mod levels;
pub mod momentum;
pub mod patterns;
pub mod trend;
pub mod volatility;
pub mod volume;
pub mod window;

pub use bundle::{IndicatorBundle, Series};
pub use engine::compute;
pub use levels::{support_resistance, SupportResistance};
