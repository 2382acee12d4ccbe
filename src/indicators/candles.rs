//! Candlestick pattern scorer.
//!
//! Pattern detection itself is delegated to a [`PatternDetector`]; this module
//! only windows the events to the most recent candles and nets bullish against
//! bearish occurrences. Reversal patterns are reported but never scored.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::patterns::{PatternDetector, PatternEvent, PatternSignal};
use crate::{clamp_unit, PricePoint, SignalLabel};

pub const MIN_CANDLES: usize = 3;
/// Keeps a one-sided pattern count from saturating the scale
pub const PATTERN_DAMPENING: f64 = 0.8;

/// Candlestick reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleResult {
    pub signal: SignalLabel,
    pub score: f64,
    pub detail: String,
    pub lookback: usize,
    pub bullish_count: usize,
    pub bearish_count: usize,
    pub reversal_count: usize,
    /// Every pattern inside the window, reversals included
    pub patterns: Vec<PatternEvent>,
}

impl CandleResult {
    fn neutral(lookback: usize, detail: &str) -> Self {
        Self {
            signal: SignalLabel::Neutral,
            score: 0.0,
            detail: detail.to_string(),
            lookback,
            bullish_count: 0,
            bearish_count: 0,
            reversal_count: 0,
            patterns: Vec::new(),
        }
    }
}

/// Run `detector` over the whole series and score the last `lookback` candles.
pub fn analyze_candlesticks<D: PatternDetector + ?Sized>(
    series: &[PricePoint],
    detector: &D,
    lookback: usize,
) -> CandleResult {
    if series.len() < MIN_CANDLES {
        return CandleResult::neutral(lookback, "not enough candles");
    }
    let events = detector.detect_patterns(series);
    score_patterns(series, &events, lookback)
}

/// Score already-detected pattern events against the last `lookback` candles.
pub fn score_patterns(series: &[PricePoint], events: &[PatternEvent], lookback: usize) -> CandleResult {
    if series.len() < MIN_CANDLES {
        return CandleResult::neutral(lookback, "not enough candles");
    }

    let start = series.len().saturating_sub(lookback);
    let window: HashSet<NaiveDate> = series[start..].iter().map(|p| p.date).collect();

    let patterns: Vec<PatternEvent> = events
        .iter()
        .filter(|e| window.contains(&e.date))
        .cloned()
        .collect();

    let count = |signal: PatternSignal| patterns.iter().filter(|e| e.signal == signal).count();
    let bullish_count = count(PatternSignal::Bullish);
    let bearish_count = count(PatternSignal::Bearish);
    let reversal_count = count(PatternSignal::Reversal);
    let total = bullish_count + bearish_count;

    let (score, detail) = if total == 0 {
        let detail = if reversal_count > 0 {
            format!("{reversal_count} reversal pattern(s) in last {lookback} candles, no directional bias")
        } else {
            format!("no directional patterns in last {lookback} candles")
        };
        (0.0, detail)
    } else {
        let net = bullish_count as f64 - bearish_count as f64;
        let score = clamp_unit(net / total.max(1) as f64 * PATTERN_DAMPENING);
        let names: Vec<&str> = patterns
            .iter()
            .filter(|e| e.signal != PatternSignal::Reversal)
            .map(|e| e.name.as_str())
            .collect();
        (
            score,
            format!(
                "{bullish_count} bullish / {bearish_count} bearish in last {lookback} candles: {}",
                names.join(", ")
            ),
        )
    };

    CandleResult {
        signal: SignalLabel::from_score(score),
        score,
        detail,
        lookback,
        bullish_count,
        bearish_count,
        reversal_count,
        patterns,
    }
}
