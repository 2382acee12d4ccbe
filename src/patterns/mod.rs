//! Candlestick pattern detection
//!
//! The candlestick scorer only needs dated pattern events, so detection sits
//! behind the [`PatternDetector`] trait. [`CandlestickDetector`] is the
//! built-in implementation:
//!
//! - **Single-bar**: Doji, Hammer, Shooting Star, Marubozu
//! - **Two-bar**: Engulfing, Piercing Line, Dark Cloud Cover
//! - **Three-bar**: Morning/Evening Star, Three White Soldiers, Three Black Crows
//!
//! # Example
//!
//! ```rust
//! use hkopt_signals::prelude::*;
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
//! let bars = vec![
//!     PricePoint::new(day(1), 10.0, 10.2, 9.0, 9.1, 100),
//!     PricePoint::new(day(2), 9.0, 10.4, 8.9, 10.3, 100),
//! ];
//! let events = CandlestickDetector::default().detect_patterns(&bars);
//! assert!(events.iter().any(|e| e.name == "Bullish Engulfing"));
//! ```

pub mod helpers;
pub mod single_bar;
pub mod three_bar;
pub mod two_bar;

pub use helpers::{CandleContext, Trend};
pub use single_bar::*;
pub use three_bar::*;
pub use two_bar::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{PricePoint, OHLCV};

// ============================================================
// EVENTS
// ============================================================

/// Directional meaning of a detected pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSignal {
    Bullish,
    Bearish,
    /// Indecision / possible turn; informational only
    Reversal,
}

/// A pattern completed on the bar at `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub signal: PatternSignal,
    pub name: String,
    pub emoji: String,
}

/// What a single detector reports for one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternHit {
    pub signal: PatternSignal,
    pub name: &'static str,
    pub emoji: &'static str,
}

impl PatternHit {
    pub const fn new(signal: PatternSignal, name: &'static str, emoji: &'static str) -> Self {
        Self { signal, name, emoji }
    }
}

// ============================================================
// DETECTOR TRAITS
// ============================================================

/// Finds candlestick patterns over a whole series
pub trait PatternDetector: Send + Sync {
    fn detect_patterns(&self, candles: &[PricePoint]) -> Vec<PatternEvent>;
}

impl<D: PatternDetector + ?Sized> PatternDetector for &D {
    fn detect_patterns(&self, candles: &[PricePoint]) -> Vec<PatternEvent> {
        (**self).detect_patterns(candles)
    }
}

impl<D: PatternDetector + ?Sized> PatternDetector for Box<D> {
    fn detect_patterns(&self, candles: &[PricePoint]) -> Vec<PatternEvent> {
        (**self).detect_patterns(candles)
    }
}

/// Detector that never reports anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPatterns;

impl PatternDetector for NoPatterns {
    fn detect_patterns(&self, _candles: &[PricePoint]) -> Vec<PatternEvent> {
        Vec::new()
    }
}

/// One pattern shape, checked at a single bar
pub trait BarPattern: Send + Sync {
    fn min_bars(&self) -> usize;
    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit>;
}

// ============================================================
// BUILTIN PATTERNS - generated via macro
// ============================================================

macro_rules! define_builtin_patterns {
    (
        $(
            $variant:ident($detector:ty)
        ),* $(,)?
    ) => {
        /// All builtin patterns - enum dispatch
        #[derive(Debug, Clone)]
        pub enum BuiltinPattern {
            $($variant($detector)),*
        }

        impl BuiltinPattern {
            /// Every builtin pattern with default settings
            pub fn all() -> Vec<BuiltinPattern> {
                vec![$(BuiltinPattern::$variant(<$detector>::default())),*]
            }

            #[inline]
            pub fn detect<T: OHLCV>(
                &self,
                bars: &[T],
                index: usize,
                ctx: &CandleContext,
            ) -> Option<PatternHit> {
                match self {
                    $(Self::$variant(d) => BarPattern::detect(d, bars, index, ctx)),*
                }
            }

            #[inline]
            pub fn min_bars(&self) -> usize {
                match self {
                    $(Self::$variant(d) => BarPattern::min_bars(d)),*
                }
            }
        }
    };
}

define_builtin_patterns! {
    // Single bar
    Doji(DojiDetector),
    Hammer(HammerDetector),
    ShootingStar(ShootingStarDetector),
    Marubozu(MarubozuDetector),

    // Two bar
    Engulfing(EngulfingDetector),
    Piercing(PiercingDetector),
    DarkCloudCover(DarkCloudCoverDetector),

    // Three bar
    MorningStar(MorningStarDetector),
    EveningStar(EveningStarDetector),
    ThreeWhiteSoldiers(ThreeWhiteSoldiersDetector),
    ThreeBlackCrows(ThreeBlackCrowsDetector),
}

// ============================================================
// CANDLESTICK DETECTOR
// ============================================================

/// Scans every bar with a fixed set of builtin patterns
#[derive(Debug, Clone)]
pub struct CandlestickDetector {
    patterns: Vec<BuiltinPattern>,
}

impl Default for CandlestickDetector {
    fn default() -> Self {
        Self {
            patterns: BuiltinPattern::all(),
        }
    }
}

impl CandlestickDetector {
    /// Detector restricted to the given patterns
    pub fn with_patterns(patterns: Vec<BuiltinPattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[BuiltinPattern] {
        &self.patterns
    }
}

impl PatternDetector for CandlestickDetector {
    fn detect_patterns(&self, candles: &[PricePoint]) -> Vec<PatternEvent> {
        let contexts = helpers::compute_contexts(candles);
        let mut events = Vec::new();

        for (index, ctx) in contexts.iter().enumerate() {
            for pattern in &self.patterns {
                if index + 1 < pattern.min_bars() {
                    continue;
                }
                if let Some(hit) = pattern.detect(candles, index, ctx) {
                    events.push(PatternEvent {
                        index,
                        date: candles[index].date,
                        signal: hit.signal,
                        name: hit.name.to_string(),
                        emoji: hit.emoji.to_string(),
                    });
                }
            }
        }

        events
    }
}
