//! Relative Strength Index scorer.
//!
//! RSI uses Wilder smoothing: the first value averages the first `period`
//! deltas, later values blend `(avg * (period - 1) + current) / period`.

use serde::{Deserialize, Serialize};

use crate::{clamp_unit, ratio_or_zero, SignalLabel};

/// Weight of the mild zones between the oversold/overbought bands and 50
pub const MILD_ZONE_WEIGHT: f64 = 0.3;

/// RSI reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsiResult {
    pub signal: SignalLabel,
    pub score: f64,
    pub detail: String,
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
    pub current: Option<f64>,
    pub values: Vec<Option<f64>>,
}

#[inline]
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// RSI per bar. The first value lands on index `period`; shorter input is all `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    let p = period as f64;
    for i in period + 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

/// Map the latest RSI onto `[-1, 1]`.
///
/// Overbought scales to `-1` at RSI 100, oversold to `+1` at RSI 0; between the
/// bands the reading is a mild lean capped at `±0.3`.
pub fn score_rsi(rsi: f64, overbought: f64, oversold: f64) -> f64 {
    let score = if rsi >= overbought {
        -ratio_or_zero(rsi - overbought, 100.0 - overbought)
    } else if rsi <= oversold {
        ratio_or_zero(oversold - rsi, oversold)
    } else if rsi > 50.0 {
        ratio_or_zero(rsi - 50.0, overbought - 50.0) * MILD_ZONE_WEIGHT
    } else {
        ratio_or_zero(rsi - 50.0, 50.0 - oversold) * MILD_ZONE_WEIGHT
    };
    clamp_unit(score)
}

pub fn analyze_rsi(closes: &[f64], period: usize, overbought: f64, oversold: f64) -> RsiResult {
    let values = calculate_rsi(closes, period);
    let current = values.last().copied().flatten();

    let Some(rsi) = current else {
        return RsiResult {
            signal: SignalLabel::Neutral,
            score: 0.0,
            detail: "insufficient data for RSI".to_string(),
            period,
            overbought,
            oversold,
            current: None,
            values,
        };
    };

    let score = score_rsi(rsi, overbought, oversold);
    let zone = if rsi >= overbought {
        "overbought"
    } else if rsi <= oversold {
        "oversold"
    } else if rsi > 50.0 {
        "bullish momentum"
    } else {
        "bearish momentum"
    };

    RsiResult {
        signal: SignalLabel::from_score(score),
        score,
        detail: format!("RSI({period}) {rsi:.1}, {zone}"),
        period,
        overbought,
        oversold,
        current: Some(rsi),
        values,
    }
}
