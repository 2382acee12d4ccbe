//! Candle-shape thresholds and comparisons shared by the pattern detectors.
//!
//! Comparisons are made against trailing averages when those are meaningful
//! and fall back to ratios of the bar's own range otherwise.

use crate::{OHLCVExt, OHLCV};

/// Bars in the trailing body/range average
pub const CANDLE_AVG_PERIOD: usize = 10;
/// Bars looked back to decide the prevailing trend before a pattern
pub const TREND_PERIOD: usize = 5;
/// Close-to-close change that counts as a trend over [`TREND_PERIOD`]
pub const TREND_THRESHOLD: f64 = 0.02;

/// Body is doji-like: body <= avg_range * DOJI_FACTOR
pub const DOJI_FACTOR: f64 = 0.1;
/// Shadow counts as long when at least this multiple of the body
pub const LONG_SHADOW_FACTOR: f64 = 2.0;

pub const DOJI_RATIO: f64 = 0.1;
pub const BODY_SHORT_RATIO: f64 = 0.35;
pub const BODY_LONG_RATIO: f64 = 0.6;
pub const SHADOW_VERYSHORT_RATIO: f64 = 0.1;
pub const MARUBOZU_SHADOW_RATIO: f64 = 0.05;

/// Direction of closes leading into a bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    #[default]
    Sideways,
}

/// Trailing statistics at one bar (the bar itself excluded)
#[derive(Debug, Clone, Copy, Default)]
pub struct CandleContext {
    pub avg_body: f64,
    pub avg_range: f64,
    /// Trend of the closes before the bar
    pub trend: Trend,
}

/// Precompute the context for every bar.
pub fn compute_contexts<T: OHLCV>(bars: &[T]) -> Vec<CandleContext> {
    (0..bars.len())
        .map(|i| {
            let (avg_body, avg_range) = if i == 0 {
                (bars[0].body(), bars[0].range())
            } else {
                let trail = &bars[i.saturating_sub(CANDLE_AVG_PERIOD)..i];
                let n = trail.len() as f64;
                let (body, range) = trail
                    .iter()
                    .fold((0.0, 0.0), |(b, r), bar| (b + bar.body(), r + bar.range()));
                (body / n, range / n)
            };
            CandleContext {
                avg_body,
                avg_range,
                trend: trend_before(bars, i),
            }
        })
        .collect()
}

fn trend_before<T: OHLCV>(bars: &[T], index: usize) -> Trend {
    if index < TREND_PERIOD + 1 {
        return Trend::Sideways;
    }
    let first = bars[index - 1 - TREND_PERIOD].close();
    let last = bars[index - 1].close();
    if first <= f64::EPSILON {
        return Trend::Sideways;
    }

    match (last - first) / first {
        c if c > TREND_THRESHOLD => Trend::Up,
        c if c < -TREND_THRESHOLD => Trend::Down,
        _ => Trend::Sideways,
    }
}

/// Zero body is always a doji.
#[inline]
pub fn is_doji(body: f64, avg_range: f64, range: f64) -> bool {
    if body <= 0.0 {
        return true;
    }
    if avg_range > 0.0 {
        body <= avg_range * DOJI_FACTOR
    } else {
        range > 0.0 && body / range <= DOJI_RATIO
    }
}

#[inline]
pub fn is_body_short(body: f64, avg_body: f64, range: f64) -> bool {
    if range <= 0.0 {
        return false;
    }
    if avg_body > 0.0 {
        body < avg_body && body / range <= BODY_SHORT_RATIO
    } else {
        body / range <= BODY_SHORT_RATIO
    }
}

#[inline]
pub fn is_body_long(body: f64, avg_body: f64, range: f64) -> bool {
    if avg_body > 0.0 {
        body > avg_body
    } else {
        range > 0.0 && body / range >= BODY_LONG_RATIO
    }
}

#[inline]
pub fn is_shadow_very_short(shadow: f64, range: f64) -> bool {
    range > 0.0 && shadow / range <= SHADOW_VERYSHORT_RATIO
}
