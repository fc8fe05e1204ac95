use std::collections::BTreeMap;

/// An indicator series aligned index-for-index with its candle series.
///
/// `None` marks positions where the lookback window is not yet filled.
/// That gap is deliberately distinct from a computed value of zero: an
/// oscillator at 0.0 is information, a missing 14th candle is not.
pub type Series = Vec<Option<f64>>;

/// All indicator output for one candle series, grouped by category.
///
/// Every series in every map has exactly `len` entries. Names are unique
/// across the maps because each category builder uses its own prefixes,
/// so [`IndicatorBundle::series`] and [`IndicatorBundle::latest`] resolve
/// a name without knowing its category. `BTreeMap` keeps iteration order
/// deterministic, which keeps logs and prompts stable between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorBundle {
    len: usize,
    pub trend: BTreeMap<String, Series>,
    pub momentum: BTreeMap<String, Series>,
    pub volatility: BTreeMap<String, Series>,
    pub volume: BTreeMap<String, Series>,
    /// Candlestick pattern flags: +100 bullish, -100 bearish, 0 none.
    pub patterns: BTreeMap<String, Vec<i32>>,
}

impl IndicatorBundle {
    pub fn new(len: usize) -> Self {
        IndicatorBundle {
            len,
            trend: BTreeMap::new(),
            momentum: BTreeMap::new(),
            volatility: BTreeMap::new(),
            volume: BTreeMap::new(),
            patterns: BTreeMap::new(),
        }
    }

    /// Number of candles every series in the bundle is aligned to.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert_trend(&mut self, name: impl Into<String>, series: Series) {
        let name = name.into();
        assert_eq!(series.len(), self.len, "series '{name}' not aligned to bundle");
        self.trend.insert(name, series);
    }

    pub fn insert_momentum(&mut self, name: impl Into<String>, series: Series) {
        let name = name.into();
        assert_eq!(series.len(), self.len, "series '{name}' not aligned to bundle");
        self.momentum.insert(name, series);
    }

    pub fn insert_volatility(&mut self, name: impl Into<String>, series: Series) {
        let name = name.into();
        assert_eq!(series.len(), self.len, "series '{name}' not aligned to bundle");
        self.volatility.insert(name, series);
    }

    pub fn insert_volume(&mut self, name: impl Into<String>, series: Series) {
        let name = name.into();
        assert_eq!(series.len(), self.len, "series '{name}' not aligned to bundle");
        self.volume.insert(name, series);
    }

    pub fn insert_pattern(&mut self, name: impl Into<String>, flags: Vec<i32>) {
        let name = name.into();
        assert_eq!(flags.len(), self.len, "pattern '{name}' not aligned to bundle");
        self.patterns.insert(name, flags);
    }

    /// Look a numeric series up by name across all four numeric maps.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.trend
            .get(name)
            .or_else(|| self.momentum.get(name))
            .or_else(|| self.volatility.get(name))
            .or_else(|| self.volume.get(name))
    }

    pub fn pattern(&self, name: &str) -> Option<&[i32]> {
        self.patterns.get(name).map(Vec::as_slice)
    }

    /// True when `name` is present as either a numeric series or a pattern.
    pub fn contains(&self, name: &str) -> bool {
        self.series(name).is_some() || self.patterns.contains_key(name)
    }

    /// The most recent value of a numeric series. `None` when the name is
    /// unknown, the series is empty, or the latest slot is still a gap.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.series(name)?.last().copied().flatten()
    }

    pub fn latest_pattern(&self, name: &str) -> Option<i32> {
        self.patterns.get(name)?.last().copied()
    }

    /// The numeric category maps with their display names, in a fixed order.
    pub fn numeric_categories(&self) -> [(&'static str, &BTreeMap<String, Series>); 4] {
        [
            ("trend", &self.trend),
            ("momentum", &self.momentum),
            ("volatility", &self.volatility),
            ("volume", &self.volume),
        ]
    }
}
