//! News sentiment collaborator
//!
//! The signal engine only consumes a [`SentimentSummary`]. Anything able to
//! turn articles into one implements [`SentimentAnalyzer`]; the crate ships a
//! keyword-lexicon implementation, [`LexiconAnalyzer`].

pub mod lexicon;

pub use lexicon::LexiconAnalyzer;

use serde::{Deserialize, Serialize};

use crate::SignalLabel;

/// One news headline as stored in the per-stock news files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsArticle {
    pub title: String,
    pub publisher: String,
    pub link: String,
    /// Provider timestamp, kept verbatim (RFC 3339 string or epoch seconds)
    pub published_at: serde_json::Value,
    pub thumbnail: String,
    pub related_tickers: Vec<String>,
}

impl NewsArticle {
    pub fn from_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Aggregate sentiment over a batch of articles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    pub signal: SignalLabel,
    /// Integer percent, 0..=100
    pub confidence: u8,
    /// Mean lexicon score per article; unbounded
    pub avg_score: f64,
    pub bullish_count: u32,
    pub bearish_count: u32,
    pub neutral_count: u32,
}

impl SentimentSummary {
    pub fn total(&self) -> u32 {
        self.bullish_count
            .saturating_add(self.bearish_count)
            .saturating_add(self.neutral_count)
    }
}

/// Turns raw articles into a [`SentimentSummary`]
pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, articles: &[NewsArticle]) -> SentimentSummary;
}
