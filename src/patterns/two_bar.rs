//! Two-bar patterns: Engulfing, Piercing Line, Dark Cloud Cover.

use super::helpers::is_body_long;
use super::{BarPattern, CandleContext, PatternHit, PatternSignal};
use crate::{OHLCVExt, OHLCV};

/// Current body swallows the previous opposite-coloured body
#[derive(Debug, Clone, Copy, Default)]
pub struct EngulfingDetector;

impl BarPattern for EngulfingDetector {
    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, _ctx: &CandleContext) -> Option<PatternHit> {
        if index < 1 {
            return None;
        }
        let prev = bars.get(index - 1)?;
        let curr = bars.get(index)?;

        // White engulfs black; one end of the bodies may coincide, not both
        if curr.is_bullish() && prev.is_bearish() {
            let case_a = curr.close() >= prev.open() && curr.open() < prev.close();
            let case_b = curr.close() > prev.open() && curr.open() <= prev.close();
            if case_a || case_b {
                return Some(PatternHit::new(PatternSignal::Bullish, "Bullish Engulfing", "📈"));
            }
        }

        if curr.is_bearish() && prev.is_bullish() {
            let case_a = curr.open() >= prev.close() && curr.close() < prev.open();
            let case_b = curr.open() > prev.close() && curr.close() <= prev.open();
            if case_a || case_b {
                return Some(PatternHit::new(PatternSignal::Bearish, "Bearish Engulfing", "📉"));
            }
        }

        None
    }
}

/// Long black bar, then a white bar opening lower and closing past its midpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct PiercingDetector;

impl BarPattern for PiercingDetector {
    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit> {
        if index < 1 {
            return None;
        }
        let prev = bars.get(index - 1)?;
        let curr = bars.get(index)?;

        if !prev.is_bearish() || !curr.is_bullish() {
            return None;
        }
        if !is_body_long(prev.body(), ctx.avg_body, prev.range()) {
            return None;
        }
        let pierces = curr.open() < prev.close()
            && curr.close() > prev.midpoint()
            && curr.close() < prev.open();

        pierces.then_some(PatternHit::new(PatternSignal::Bullish, "Piercing Line", "🗡"))
    }
}

/// Long white bar, then a black bar opening higher and closing below its midpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct DarkCloudCoverDetector;

impl BarPattern for DarkCloudCoverDetector {
    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize, ctx: &CandleContext) -> Option<PatternHit> {
        if index < 1 {
            return None;
        }
        let prev = bars.get(index - 1)?;
        let curr = bars.get(index)?;

        if !prev.is_bullish() || !curr.is_bearish() {
            return None;
        }
        if !is_body_long(prev.body(), ctx.avg_body, prev.range()) {
            return None;
        }
        let covers = curr.open() > prev.close()
            && curr.close() < prev.midpoint()
            && curr.close() > prev.open();

        covers.then_some(PatternHit::new(PatternSignal::Bearish, "Dark Cloud Cover", "☁"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::helpers::compute_contexts;
    use crate::PricePoint;
    use chrono::{Days, NaiveDate};

    fn bars(ohlc: &[(f64, f64, f64, f64)]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ohlc.iter()
            .enumerate()
            .map(|(i, &(o, h, l, c))| PricePoint::new(start + Days::new(i as u64), o, h, l, c, 100))
            .collect()
    }

    fn detect_last<P: BarPattern>(p: &P, b: &[PricePoint]) -> Option<PatternHit> {
        let ctx = compute_contexts(b);
        let i = b.len() - 1;
        p.detect(b, i, &ctx[i])
    }

    #[test]
    fn test_bullish_engulfing() {
        let b = bars(&[(10.0, 10.2, 9.0, 9.1), (9.0, 10.4, 8.9, 10.3)]);
        let hit = detect_last(&EngulfingDetector, &b).unwrap();
        assert_eq!(hit.signal, PatternSignal::Bullish);
    }

    #[test]
    fn test_bearish_engulfing() {
        let b = bars(&[(9.0, 10.1, 8.9, 10.0), (10.2, 10.3, 8.7, 8.8)]);
        let hit = detect_last(&EngulfingDetector, &b).unwrap();
        assert_eq!(hit.signal, PatternSignal::Bearish);
    }

    #[test]
    fn test_same_colour_not_engulfing() {
        let b = bars(&[(9.0, 10.1, 8.9, 10.0), (8.8, 10.6, 8.7, 10.5)]);
        assert!(detect_last(&EngulfingDetector, &b).is_none());
    }

    #[test]
    fn test_piercing_line() {
        // Small bars set the average body, then a long black bar and the piercing white bar
        let b = bars(&[
            (20.0, 20.5, 19.5, 20.2),
            (20.2, 20.6, 19.9, 20.0),
            (20.0, 20.1, 17.9, 18.0),
            (17.5, 19.3, 17.4, 19.2),
        ]);
        let hit = detect_last(&PiercingDetector, &b).unwrap();
        assert_eq!(hit.name, "Piercing Line");
    }

    #[test]
    fn test_dark_cloud_cover() {
        let b = bars(&[
            (20.0, 20.5, 19.5, 20.2),
            (20.2, 20.6, 19.9, 20.0),
            (20.0, 22.1, 19.9, 22.0),
            (22.5, 22.6, 20.7, 20.8),
        ]);
        let hit = detect_last(&DarkCloudCoverDetector, &b).unwrap();
        assert_eq!(hit.signal, PatternSignal::Bearish);
    }
}
