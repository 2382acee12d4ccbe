//! News sentiment adapter.

use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentSummary;
use crate::{clamp_unit, SignalLabel};

/// Largest per-keyword weight in the sentiment lexicon; maps `avgScore` onto `[-1, 1]`
pub const SENTIMENT_SCALE: f64 = 3.0;

/// News reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResult {
    pub signal: SignalLabel,
    pub score: f64,
    pub detail: String,
    pub confidence: u8,
    pub article_count: u32,
}

/// Normalize an external sentiment summary. The label is taken from the
/// summary as-is rather than re-derived from the normalized score.
pub fn analyze_news(summary: Option<&SentimentSummary>) -> NewsResult {
    let Some(summary) = summary.filter(|s| s.confidence > 0) else {
        return NewsResult {
            signal: SignalLabel::Neutral,
            score: 0.0,
            detail: "no news data available".to_string(),
            confidence: 0,
            article_count: 0,
        };
    };

    NewsResult {
        signal: summary.signal,
        score: clamp_unit(summary.avg_score / SENTIMENT_SCALE),
        detail: format!(
            "{} bullish, {} bearish, {} neutral articles ({}% confidence)",
            summary.bullish_count, summary.bearish_count, summary.neutral_count, summary.confidence
        ),
        confidence: summary.confidence,
        article_count: summary.total(),
    }
}
