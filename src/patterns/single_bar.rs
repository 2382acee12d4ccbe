//! Single-bar patterns: Doji, Hammer, Shooting Star, Marubozu.

use super::helpers::{self, is_body_long, is_body_short, is_doji, is_shadow_very_short, Trend};
use super::{BarPattern, CandleContext, PatternHit, PatternSignal};
use crate::{OHLCVExt, OHLCV};

/// Open and close (nearly) equal: indecision
#[derive(Debug, Clone, Copy, Default)]
pub struct DojiDetector;

impl BarPattern for DojiDetector {
    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit> {
        let bar = bars.get(index)?;
        is_doji(bar.body(), ctx.avg_range, bar.range())
            .then_some(PatternHit::new(PatternSignal::Reversal, "Doji", "✚"))
    }
}

/// Small body on top of a long lower shadow after a decline
#[derive(Debug, Clone, Copy)]
pub struct HammerDetector {
    pub shadow_factor: f64,
}

impl Default for HammerDetector {
    fn default() -> Self {
        Self {
            shadow_factor: helpers::LONG_SHADOW_FACTOR,
        }
    }
}

impl BarPattern for HammerDetector {
    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit> {
        let bar = bars.get(index)?;
        let body = bar.body();
        let range = bar.range();

        if ctx.trend != Trend::Down || !is_body_short(body, ctx.avg_body, range) {
            return None;
        }
        let lower = bar.lower_shadow();
        if lower <= 0.0 || lower < body * self.shadow_factor {
            return None;
        }
        if !is_shadow_very_short(bar.upper_shadow(), range) {
            return None;
        }

        Some(PatternHit::new(PatternSignal::Bullish, "Hammer", "🔨"))
    }
}

/// Small body under a long upper shadow after an advance
#[derive(Debug, Clone, Copy)]
pub struct ShootingStarDetector {
    pub shadow_factor: f64,
}

impl Default for ShootingStarDetector {
    fn default() -> Self {
        Self {
            shadow_factor: helpers::LONG_SHADOW_FACTOR,
        }
    }
}

impl BarPattern for ShootingStarDetector {
    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit> {
        let bar = bars.get(index)?;
        let body = bar.body();
        let range = bar.range();

        if ctx.trend != Trend::Up || !is_body_short(body, ctx.avg_body, range) {
            return None;
        }
        let upper = bar.upper_shadow();
        if upper <= 0.0 || upper < body * self.shadow_factor {
            return None;
        }
        if !is_shadow_very_short(bar.lower_shadow(), range) {
            return None;
        }

        Some(PatternHit::new(PatternSignal::Bearish, "Shooting Star", "💫"))
    }
}

/// Long body with (almost) no shadows; direction follows the body colour
#[derive(Debug, Clone, Copy)]
pub struct MarubozuDetector {
    pub shadow_ratio: f64,
}

impl Default for MarubozuDetector {
    fn default() -> Self {
        Self {
            shadow_ratio: helpers::MARUBOZU_SHADOW_RATIO,
        }
    }
}

impl BarPattern for MarubozuDetector {
    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit> {
        let bar = bars.get(index)?;
        let range = bar.range();
        if range <= 0.0 || bar.body() <= 0.0 {
            return None;
        }
        if bar.upper_shadow() > range * self.shadow_ratio || bar.lower_shadow() > range * self.shadow_ratio {
            return None;
        }
        if !is_body_long(bar.body(), ctx.avg_body, range) {
            return None;
        }

        if bar.is_bullish() {
            Some(PatternHit::new(PatternSignal::Bullish, "Bullish Marubozu", "🟩"))
        } else {
            Some(PatternHit::new(PatternSignal::Bearish, "Bearish Marubozu", "🟥"))
        }
    }
}
