//! Moving-average crossover detector
//!
//! Computes a short/long SMA or EMA pair, lists every golden and death cross
//! and scores the current gap between the two averages.

use serde::{Deserialize, Serialize};

use crate::{clamp_unit, SignalLabel};

/// Gap (as a fraction of the long MA) below which the averages count as converging
pub const CONVERGENCE_BAND: f64 = 0.01;
/// Gap multiplier: a 5% gap saturates the score
pub const GAP_SCALE: f64 = 20.0;
/// Bonus applied when the latest cross agrees with the gap and is recent
pub const RECENT_CROSS_BONUS: f64 = 0.3;
/// A cross on one of the last this-many bars counts as recent
pub const RECENT_CROSS_BARS: usize = 5;

/// Averaging method for the crossover pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaType {
    #[default]
    Sma,
    Ema,
}

impl MaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MaType::Sma => "SMA",
            MaType::Ema => "EMA",
        }
    }

    /// Compute the average series of this type
    pub fn compute(self, closes: &[f64], period: usize) -> Vec<Option<f64>> {
        match self {
            MaType::Sma => calculate_sma(closes, period),
            MaType::Ema => calculate_ema(closes, period),
        }
    }
}

/// Direction of a crossover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossKind {
    GoldenCross,
    DeathCross,
}

/// A bar at which the short MA crossed the long MA
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossEvent {
    pub index: usize,
    pub kind: CrossKind,
    pub short_ma: f64,
    pub long_ma: f64,
}

/// Moving-average crossover reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaCrossResult {
    pub signal: SignalLabel,
    pub score: f64,
    pub detail: String,
    pub ma_type: MaType,
    pub short_period: usize,
    pub long_period: usize,
    /// `(short - long) / long` on the last bar, when both are defined
    pub gap: Option<f64>,
    pub short_ma: Vec<Option<f64>>,
    pub long_ma: Vec<Option<f64>>,
    pub crossovers: Vec<CrossEvent>,
}

/// Trailing simple mean. Index `i` is defined once `period` closes are available.
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let mut window_sum: f64 = closes[..period].iter().sum();
    out[period - 1] = Some(window_sum / period as f64);
    for i in period..closes.len() {
        window_sum += closes[i] - closes[i - period];
        out[i] = Some(window_sum / period as f64);
    }
    out
}

/// EMA seeded with the SMA of the first `period` closes, `k = 2 / (period + 1)`.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = closes[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema);
    for i in period..closes.len() {
        ema = closes[i] * k + ema * (1.0 - k);
        out[i] = Some(ema);
    }
    out
}

/// Scan consecutive bars where both averages are defined.
///
/// Golden cross: `short - long` goes from `<= 0` to `> 0`.
/// Death cross: `short - long` goes from `>= 0` to `< 0`.
pub fn detect_crossovers(short_ma: &[Option<f64>], long_ma: &[Option<f64>]) -> Vec<CrossEvent> {
    let len = short_ma.len().min(long_ma.len());
    let mut events = Vec::new();

    for i in 1..len {
        let (Some(prev_s), Some(prev_l), Some(curr_s), Some(curr_l)) =
            (short_ma[i - 1], long_ma[i - 1], short_ma[i], long_ma[i])
        else {
            continue;
        };

        let prev_diff = prev_s - prev_l;
        let curr_diff = curr_s - curr_l;

        let kind = if prev_diff <= 0.0 && curr_diff > 0.0 {
            CrossKind::GoldenCross
        } else if prev_diff >= 0.0 && curr_diff < 0.0 {
            CrossKind::DeathCross
        } else {
            continue;
        };

        events.push(CrossEvent {
            index: i,
            kind,
            short_ma: curr_s,
            long_ma: curr_l,
        });
    }

    events
}

/// Score the short/long MA relationship on the last bar.
pub fn analyze_ma_crossover(
    closes: &[f64],
    short_period: usize,
    long_period: usize,
    ma_type: MaType,
) -> MaCrossResult {
    let short_ma = ma_type.compute(closes, short_period);
    let long_ma = ma_type.compute(closes, long_period);
    let crossovers = detect_crossovers(&short_ma, &long_ma);

    let mut result = MaCrossResult {
        signal: SignalLabel::Neutral,
        score: 0.0,
        detail: "insufficient data".to_string(),
        ma_type,
        short_period,
        long_period,
        gap: None,
        short_ma,
        long_ma,
        crossovers,
    };

    let last_short = result.short_ma.last().copied().flatten();
    let last_long = result.long_ma.last().copied().flatten();
    let (Some(short), Some(long)) = (last_short, last_long) else {
        return result;
    };
    if !long.is_finite() || long.abs() <= f64::EPSILON {
        result.detail = "long MA is zero".to_string();
        return result;
    }

    let diff = (short - long) / long;
    result.gap = Some(diff);

    let len = closes.len();
    let recent = result
        .crossovers
        .last()
        .filter(|c| len - c.index <= RECENT_CROSS_BARS)
        .copied();
    let label = ma_type.as_str();

    let (score, detail) = if diff > CONVERGENCE_BAND {
        let mut score = (diff * GAP_SCALE).min(1.0);
        let mut detail = format!(
            "{label}({short_period}) above {label}({long_period}) by {:.2}%",
            diff * 100.0
        );
        if let Some(cross) = recent.filter(|c| c.kind == CrossKind::GoldenCross) {
            score = (score + RECENT_CROSS_BONUS).min(1.0);
            detail.push_str(&format!(", golden cross {} bars ago", len - 1 - cross.index));
        }
        (score, detail)
    } else if diff < -CONVERGENCE_BAND {
        let mut score = (diff * GAP_SCALE).max(-1.0);
        let mut detail = format!(
            "{label}({short_period}) below {label}({long_period}) by {:.2}%",
            -diff * 100.0
        );
        if let Some(cross) = recent.filter(|c| c.kind == CrossKind::DeathCross) {
            score = (score - RECENT_CROSS_BONUS).max(-1.0);
            detail.push_str(&format!(", death cross {} bars ago", len - 1 - cross.index));
        }
        (score, detail)
    } else {
        (0.0, "MAs converging".to_string())
    };

    result.score = clamp_unit(score);
    result.signal = SignalLabel::from_score(result.score);
    result.detail = detail;
    result
}
