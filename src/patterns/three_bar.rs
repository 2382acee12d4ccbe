//! Three-bar patterns: Morning/Evening Star, Three White Soldiers, Three Black Crows.

use super::helpers::{is_body_long, BODY_LONG_RATIO};
use super::{BarPattern, CandleContext, PatternHit, PatternSignal};
use crate::{OHLCVExt, OHLCV};

/// Star body must be at most this fraction of the first body
pub const STAR_BODY_RATIO: f64 = 0.3;

fn window<T: OHLCV>(bars: &[T], index: usize) -> Option<(&T, &T, &T)> {
    if index < 2 {
        return None;
    }
    Some((bars.get(index - 2)?, bars.get(index - 1)?, bars.get(index)?))
}

#[derive(Debug, Clone, Copy)]
pub struct MorningStarDetector {
    pub star_body_ratio: f64,
}

impl Default for MorningStarDetector {
    fn default() -> Self {
        Self {
            star_body_ratio: STAR_BODY_RATIO,
        }
    }
}

impl BarPattern for MorningStarDetector {
    fn min_bars(&self) -> usize {
        3
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit> {
        let (first, star, last) = window(bars, index)?;

        if !first.is_bearish() || !is_body_long(first.body(), ctx.avg_body, first.range()) {
            return None;
        }
        // Star body gaps below the first close
        if star.body() > first.body() * self.star_body_ratio || star.open().max(star.close()) >= first.close() {
            return None;
        }
        if !last.is_bullish() || last.close() <= first.midpoint() {
            return None;
        }

        Some(PatternHit::new(PatternSignal::Bullish, "Morning Star", "🌅"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EveningStarDetector {
    pub star_body_ratio: f64,
}

impl Default for EveningStarDetector {
    fn default() -> Self {
        Self {
            star_body_ratio: STAR_BODY_RATIO,
        }
    }
}

impl BarPattern for EveningStarDetector {
    fn min_bars(&self) -> usize {
        3
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit> {
        let (first, star, last) = window(bars, index)?;

        if !first.is_bullish() || !is_body_long(first.body(), ctx.avg_body, first.range()) {
            return None;
        }
        // Star body gaps above the first close
        if star.body() > first.body() * self.star_body_ratio || star.open().min(star.close()) <= first.close() {
            return None;
        }
        if !last.is_bearish() || last.close() >= first.midpoint() {
            return None;
        }

        Some(PatternHit::new(PatternSignal::Bearish, "Evening Star", "🌆"))
    }
}

/// Three long white bodies, each opening inside the previous body and closing higher
#[derive(Debug, Clone, Copy)]
pub struct ThreeWhiteSoldiersDetector {
    pub min_body_ratio: f64,
}

impl Default for ThreeWhiteSoldiersDetector {
    fn default() -> Self {
        Self {
            min_body_ratio: BODY_LONG_RATIO,
        }
    }
}

impl BarPattern for ThreeWhiteSoldiersDetector {
    fn min_bars(&self) -> usize {
        3
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, _ctx: &CandleContext) -> Option<PatternHit> {
        let (a, b, c) = window(bars, index)?;

        let solid = |bar: &T| bar.is_bullish() && bar.body_ratio().is_some_and(|r| r >= self.min_body_ratio);
        if !(solid(a) && solid(b) && solid(c)) {
            return None;
        }
        let steps = |prev: &T, curr: &T| {
            curr.close() > prev.close() && curr.open() > prev.open() && curr.open() <= prev.close()
        };
        if !(steps(a, b) && steps(b, c)) {
            return None;
        }

        Some(PatternHit::new(PatternSignal::Bullish, "Three White Soldiers", "💂"))
    }
}

/// Three long black bodies, each opening inside the previous body and closing lower
#[derive(Debug, Clone, Copy)]
pub struct ThreeBlackCrowsDetector {
    pub min_body_ratio: f64,
}

impl Default for ThreeBlackCrowsDetector {
    fn default() -> Self {
        Self {
            min_body_ratio: BODY_LONG_RATIO,
        }
    }
}

impl BarPattern for ThreeBlackCrowsDetector {
    fn min_bars(&self) -> usize {
        3
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, _ctx: &CandleContext) -> Option<PatternHit> {
        let (a, b, c) = window(bars, index)?;

        let solid = |bar: &T| bar.is_bearish() && bar.body_ratio().is_some_and(|r| r >= self.min_body_ratio);
        if !(solid(a) && solid(b) && solid(c)) {
            return None;
        }
        let steps = |prev: &T, curr: &T| {
            curr.close() < prev.close() && curr.open() < prev.open() && curr.open() >= prev.close()
        };
        if !(steps(a, b) && steps(b, c)) {
            return None;
        }

        Some(PatternHit::new(PatternSignal::Bearish, "Three Black Crows", "🐦"))
    }
}
