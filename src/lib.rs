//! # hkopt-signals - composite day-trading signals for HKEX option underlyings
//!
//! Turns a daily OHLCV series (plus an optional news sentiment summary) into a
//! single weighted trading recommendation. Five independent scorers each map
//! their indicator family onto a common `[-1, +1]` scale:
//!
//! - moving-average crossover (SMA or EMA pair)
//! - volume spikes and expansion/contraction
//! - recent candlestick patterns
//! - news sentiment
//! - Wilder-smoothed RSI
//!
//! The aggregator blends the five scores under a user supplied [`WeightSet`](engine::WeightSet),
//! classifies the blend into a five-level [`Recommendation`](engine::Recommendation) and derives an
//! agreement-based confidence.
//!
//! ## Quick Start
//!
//! ```rust
//! use hkopt_signals::prelude::*;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series: Vec<PricePoint> = (0..40)
//!     .map(|i| {
//!         let close = 100.0 + i as f64;
//!         PricePoint::new(start + chrono::Days::new(i), close - 0.5, close + 1.0, close - 1.0, close, 1_000)
//!     })
//!     .collect();
//!
//! let report = generate_signals(&series, None, &SignalConfig::default());
//! assert!(report.composite.confidence <= 99);
//! ```

pub mod data;
pub mod engine;
pub mod indicators;
pub mod patterns;
pub mod sentiment;

pub mod prelude {
    pub use crate::{
        // Data files
        data::{load_news_file, load_price_file, validate_series, NewsFile, PriceFile},
        // Engine
        engine::{
            aggregate, classify, compute_confidence, generate_parallel, generate_signals,
            normalize_weights, CompositeSignal, EngineBuilder, IndicatorBreakdown, MaType,
            NormalizedWeights, Recommendation, ScoreSet, SignalConfig, SignalEngine, SignalReport,
            SymbolError, SymbolReport, WeightSet, Weighted, DEFAULT_WEIGHTS,
        },
        // Scorers
        indicators::{
            analyze_candlesticks, analyze_ma_crossover, analyze_news, analyze_rsi, analyze_volume,
            calculate_ema, calculate_rsi, calculate_sma, detect_crossovers, CandleResult,
            CrossEvent, CrossKind, IndicatorScore, MaCrossResult, NewsResult, RsiResult,
            VolumeResult, VolumeTrend,
        },
        // Collaborators
        patterns::{CandlestickDetector, NoPatterns, PatternDetector, PatternEvent, PatternSignal},
        sentiment::{LexiconAnalyzer, NewsArticle, SentimentAnalyzer, SentimentSummary},
        // Core types
        Period, PricePoint, Result, SignalError, SignalLabel, OHLCV, OHLCVExt,
    };
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, SignalError>;

/// Errors raised at the edges of the engine: configuration, input validation
/// and data loading. Scoring itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid price point at index {index}: {reason}")]
    InvalidPricePoint { index: usize, reason: &'static str },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Lookback length (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(SignalError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Read access to one daily bar
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;
}

/// Computed candle geometry for any [`OHLCV`] bar
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    #[inline]
    fn midpoint(&self) -> f64 {
        (self.open() + self.close()) / 2.0
    }

    /// Body as ratio of range. Returns None if range ≈ 0
    #[inline]
    fn body_ratio(&self) -> Option<f64> {
        let range = self.range();
        (range > f64::EPSILON).then(|| self.body() / range)
    }
}

impl<T: OHLCV> OHLCVExt for T {}

// ============================================================
// PRICE POINT
// ============================================================

/// One trading day of an underlying. Series are chronological, one row per day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl OHLCV for PricePoint {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume as f64
    }
}

// ============================================================
// SIGNAL LABEL
// ============================================================

/// Score above which an indicator reads bullish (and below its negation, bearish)
pub const LABEL_THRESHOLD: f64 = 0.15;

/// Directional reading of a single indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLabel {
    Bullish,
    #[default]
    Neutral,
    Bearish,
}

impl SignalLabel {
    /// Shared labelling rule: `> 0.15` bullish, `< -0.15` bearish.
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            SignalLabel::Bullish
        } else if score < -LABEL_THRESHOLD {
            SignalLabel::Bearish
        } else {
            SignalLabel::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalLabel::Bullish => "bullish",
            SignalLabel::Neutral => "neutral",
            SignalLabel::Bearish => "bearish",
        }
    }
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// NUMERIC GUARDS
// ============================================================

/// Clamp into `[-1, 1]`; non-finite input collapses to 0.
#[inline]
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// `num / den`, or 0 when the denominator is not a usable positive number.
#[inline]
pub(crate) fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den > 0.0 && den.is_finite() {
        num / den
    } else {
        0.0
    }
}

/// Round to `decimals` places with ties toward positive infinity, so
/// `-0.0005` becomes `0` rather than `-0.001`. Negative zero is normalized.
#[inline]
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor + 0.0
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(o: f64, h: f64, l: f64, c: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), o, h, l, c, 1000)
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(100).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_period_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Period>("14").is_ok());
        assert!(serde_json::from_str::<Period>("0").is_err());
    }

    #[test]
    fn test_ohlcv_ext() {
        let b = bar(100.0, 110.0, 90.0, 105.0);
        assert_eq!(b.body(), 5.0);
        assert_eq!(b.range(), 20.0);
        assert_eq!(b.upper_shadow(), 5.0);
        assert_eq!(b.lower_shadow(), 10.0);
        assert!(b.is_bullish());
        assert!(!b.is_bearish());
        assert!((b.body_ratio().unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_body_ratio_flat_bar() {
        let b = bar(100.0, 100.0, 100.0, 100.0);
        assert!(b.body_ratio().is_none());
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(SignalLabel::from_score(0.16), SignalLabel::Bullish);
        assert_eq!(SignalLabel::from_score(0.15), SignalLabel::Neutral);
        assert_eq!(SignalLabel::from_score(-0.15), SignalLabel::Neutral);
        assert_eq!(SignalLabel::from_score(-0.2), SignalLabel::Bearish);
    }

    #[test]
    fn test_numeric_guards() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(f64::INFINITY), 0.0);
        assert_eq!(clamp_unit(3.0), 1.0);
        assert_eq!(clamp_unit(-3.0), -1.0);
        assert_eq!(ratio_or_zero(1.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(1.0, 4.0), 0.25);
        assert_eq!(round_to(0.123456, 3), 0.123);
    }

    #[test]
    fn test_round_ties_go_up() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(-1.6, 0), -2.0);

        let tiny = round_to(-0.0005, 3);
        assert_eq!(tiny, 0.0);
        assert!(tiny.is_sign_positive());
    }

    #[test]
    fn test_price_point_json_shape() {
        let json = r#"{"date":"2024-05-02","open":10.0,"high":11.0,"low":9.5,"close":10.8,"volume":12000}"#;
        let p: PricePoint = serde_json::from_str(json).unwrap();
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(p.volume, 12000);
        let back = serde_json::to_string(&p).unwrap();
        assert!(back.contains("\"2024-05-02\""));
    }
}
