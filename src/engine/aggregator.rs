//! Composite aggregation: weight normalization, weighted blend, five-level
//! classification and agreement-based confidence.

use serde::{Deserialize, Serialize};

use super::config::WeightSet;
use crate::indicators::IndicatorScore;
use crate::{clamp_unit, round_to};

/// Share each indicator gets when every configured weight is zero
pub const EQUAL_WEIGHT: f64 = 0.2;

pub const STRONG_BUY_THRESHOLD: f64 = 0.5;
pub const BUY_THRESHOLD: f64 = 0.15;
pub const SELL_THRESHOLD: f64 = -0.15;
pub const STRONG_SELL_THRESHOLD: f64 = -0.5;

pub const AGREEMENT_FACTOR: f64 = 1.2;
pub const DISAGREEMENT_FACTOR: f64 = 0.7;
pub const MAX_CONFIDENCE: f64 = 99.0;

// ============================================================
// WEIGHTS
// ============================================================

/// Weights scaled to sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeights {
    pub ma: f64,
    pub volume: f64,
    pub candle: f64,
    pub news: f64,
    pub rsi: f64,
}

impl NormalizedWeights {
    pub fn as_array(&self) -> [f64; 5] {
        [self.ma, self.volume, self.candle, self.news, self.rsi]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Divide each weight by the total. Negative or non-finite weights count as
/// zero; an all-zero set falls back to equal shares.
pub fn normalize_weights(weights: &WeightSet) -> NormalizedWeights {
    let usable = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let [ma, volume, candle, news, rsi] = weights.as_array().map(usable);
    let total = ma + volume + candle + news + rsi;

    if !(total > 0.0 && total.is_finite()) {
        return NormalizedWeights {
            ma: EQUAL_WEIGHT,
            volume: EQUAL_WEIGHT,
            candle: EQUAL_WEIGHT,
            news: EQUAL_WEIGHT,
            rsi: EQUAL_WEIGHT,
        };
    }

    NormalizedWeights {
        ma: ma / total,
        volume: volume / total,
        candle: candle / total,
        news: news / total,
        rsi: rsi / total,
    }
}

// ============================================================
// RECOMMENDATION
// ============================================================

/// Five-level trading recommendation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    #[default]
    Neutral,
    Sell,
    StrongSell,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "strong_buy",
            Recommendation::Buy => "buy",
            Recommendation::Neutral => "neutral",
            Recommendation::Sell => "sell",
            Recommendation::StrongSell => "strong_sell",
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Neutral => "NEUTRAL",
            Recommendation::Sell => "SELL",
            Recommendation::StrongSell => "STRONG SELL",
        }
    }

    /// Styling token for renderers
    pub fn class_name(self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "strong-buy",
            Recommendation::Buy => "buy",
            Recommendation::Neutral => "neutral",
            Recommendation::Sell => "sell",
            Recommendation::StrongSell => "strong-sell",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds are checked high to low; the first strict inequality wins.
pub fn classify(score: f64) -> Recommendation {
    if score > STRONG_BUY_THRESHOLD {
        Recommendation::StrongBuy
    } else if score > BUY_THRESHOLD {
        Recommendation::Buy
    } else if score > SELL_THRESHOLD {
        Recommendation::Neutral
    } else if score > STRONG_SELL_THRESHOLD {
        Recommendation::Sell
    } else {
        Recommendation::StrongSell
    }
}

/// Mean magnitude scaled to percent, amplified when every score points the
/// same way and discounted otherwise. Zero agrees with both sides.
pub fn compute_confidence(scores: &[f64; 5]) -> u8 {
    let scores = scores.map(clamp_unit);
    let all_same_sign = scores.iter().all(|&s| s >= 0.0) || scores.iter().all(|&s| s <= 0.0);
    let avg_magnitude = scores.iter().map(|s| s.abs()).sum::<f64>() / scores.len() as f64;
    let factor = if all_same_sign {
        AGREEMENT_FACTOR
    } else {
        DISAGREEMENT_FACTOR
    };

    (avg_magnitude * 100.0 * factor).min(MAX_CONFIDENCE).round() as u8
}

// ============================================================
// COMPOSITE
// ============================================================

/// The five indicator scores in a fixed shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub ma: f64,
    pub volume: f64,
    pub candle: f64,
    pub news: f64,
    pub rsi: f64,
}

impl ScoreSet {
    pub fn new(ma: f64, volume: f64, candle: f64, news: f64, rsi: f64) -> Self {
        Self {
            ma,
            volume,
            candle,
            news,
            rsi,
        }
    }

    pub fn from_results<A, B, C, D, E>(ma: &A, volume: &B, candle: &C, news: &D, rsi: &E) -> Self
    where
        A: IndicatorScore,
        B: IndicatorScore,
        C: IndicatorScore,
        D: IndicatorScore,
        E: IndicatorScore,
    {
        Self::new(ma.score(), volume.score(), candle.score(), news.score(), rsi.score())
    }

    pub fn as_array(&self) -> [f64; 5] {
        [self.ma, self.volume, self.candle, self.news, self.rsi]
    }
}

/// Final blended reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSignal {
    pub signal: Recommendation,
    pub label: String,
    pub class_name: String,
    /// In `[-1, 1]`, three decimals
    pub score: f64,
    /// Integer percent, 0..=99
    pub confidence: u8,
}

impl CompositeSignal {
    pub fn new(signal: Recommendation, score: f64, confidence: u8) -> Self {
        Self {
            signal,
            label: signal.label().to_string(),
            class_name: signal.class_name().to_string(),
            score,
            confidence,
        }
    }
}

/// Blend five scores under `weights`. Never fails; non-finite inputs are
/// treated as zero. The unrounded blend is classified; only the reported
/// score is rounded.
pub fn aggregate(scores: &ScoreSet, weights: &WeightSet) -> CompositeSignal {
    let normalized = normalize_weights(weights);
    let scores = scores.as_array().map(clamp_unit);

    let raw: f64 = scores
        .iter()
        .zip(normalized.as_array())
        .map(|(s, w)| s * w)
        .sum();
    let raw = clamp_unit(raw);

    CompositeSignal::new(classify(raw), round_to(raw, 3), compute_confidence(&scores))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_default_weights_normalize() {
        let n = normalize_weights(&WeightSet::default());
        assert!((n.ma - 0.25).abs() < EPS);
        assert!((n.news - 0.15).abs() < EPS);
        assert!((n.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_weights_fall_back_to_equal() {
        let n = normalize_weights(&WeightSet::new(0.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(n.as_array(), [EQUAL_WEIGHT; 5]);
    }

    #[test]
    fn test_unusable_weights_count_as_zero() {
        let n = normalize_weights(&WeightSet::new(1.0, -5.0, f64::NAN, f64::INFINITY, 1.0));
        assert_eq!(n.as_array(), [0.5, 0.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.51), Recommendation::StrongBuy);
        assert_eq!(classify(0.5), Recommendation::Buy);
        assert_eq!(classify(0.15), Recommendation::Neutral);
        assert_eq!(classify(0.0), Recommendation::Neutral);
        assert_eq!(classify(-0.15), Recommendation::Sell);
        assert_eq!(classify(-0.5), Recommendation::StrongSell);
        assert_eq!(classify(-1.0), Recommendation::StrongSell);
    }

    #[test]
    fn test_confidence_agreement() {
        // avg 0.4 * 100 * 1.2
        assert_eq!(compute_confidence(&[0.4, 0.4, 0.4, 0.4, 0.4]), 48);
        // avg 0.4 * 100 * 0.7
        assert_eq!(compute_confidence(&[0.4, -0.4, 0.4, 0.4, 0.4]), 28);
        assert_eq!(compute_confidence(&[0.0; 5]), 0);
        // zeros agree with either side
        assert_eq!(compute_confidence(&[0.5, 0.0, 0.5, 0.0, 0.0]), 24);
    }

    #[test]
    fn test_confidence_capped() {
        assert_eq!(compute_confidence(&[1.0; 5]), 99);
        assert_eq!(compute_confidence(&[-1.0; 5]), 99);
    }

    #[test]
    fn test_aggregate_blend() {
        let scores = ScoreSet::new(1.0, 0.8, 0.0, 0.0, -0.3);
        let c = aggregate(&scores, &WeightSet::default());
        // 0.25 + 0.16 + 0 + 0 - 0.06
        assert!((c.score - 0.35).abs() < EPS);
        assert_eq!(c.signal, Recommendation::Buy);
        assert_eq!(c.label, "BUY");
        assert_eq!(c.class_name, "buy");
        // avg 0.42 * 70
        assert_eq!(c.confidence, 29);
    }

    #[test]
    fn test_aggregate_all_zero() {
        let c = aggregate(&ScoreSet::default(), &WeightSet::default());
        assert_eq!(c.score, 0.0);
        assert_eq!(c.signal, Recommendation::Neutral);
        assert_eq!(c.confidence, 0);
    }

    #[test]
    fn test_aggregate_ignores_nan_scores() {
        let c = aggregate(&ScoreSet::new(f64::NAN, 1.0, 1.0, 1.0, 1.0), &WeightSet::default());
        assert!(c.score.is_finite());
        assert!((c.score - 0.75).abs() < EPS);
    }

    #[test]
    fn test_classifies_unrounded_blend() {
        let only_ma = WeightSet::new(1.0, 0.0, 0.0, 0.0, 0.0);

        let c = aggregate(&ScoreSet::new(0.1504, 0.0, 0.0, 0.0, 0.0), &only_ma);
        assert_eq!(c.score, 0.15);
        assert_eq!(c.signal, Recommendation::Buy);

        let c = aggregate(&ScoreSet::new(0.5004, 0.0, 0.0, 0.0, 0.0), &only_ma);
        assert_eq!(c.score, 0.5);
        assert_eq!(c.signal, Recommendation::StrongBuy);

        let c = aggregate(&ScoreSet::new(-0.1496, 0.0, 0.0, 0.0, 0.0), &only_ma);
        assert_eq!(c.score, -0.15);
        assert_eq!(c.signal, Recommendation::Neutral);
    }

    #[test]
    fn test_composite_wire_form() {
        let c = CompositeSignal::new(Recommendation::StrongSell, -0.612, 71);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["signal"], "strong_sell");
        assert_eq!(json["label"], "STRONG SELL");
        assert_eq!(json["className"], "strong-sell");
        assert_eq!(json["confidence"], 71);
    }
}
