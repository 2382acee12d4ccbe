//! Keyword-lexicon sentiment analyzer.
//!
//! Every lexicon keyword carries a weight of 1 to 3. A negation word up to
//! three tokens before a keyword flips its sign. An article's score is the sum
//! over its headline.

use std::collections::{HashMap, HashSet};

use super::{NewsArticle, SentimentAnalyzer, SentimentSummary};
use crate::{round_to, SignalLabel};

/// Highest weight any keyword may carry
pub const MAX_KEYWORD_WEIGHT: i32 = 3;
/// Average article score beyond which the batch reads directional
pub const SIGNAL_THRESHOLD: f64 = 0.5;

const NEGATION_WINDOW: usize = 3;

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "won't",
    "without", "hardly", "barely",
];

const POSITIVE: &[(&str, i32)] = &[
    ("bullish", 3),
    ("surge", 3),
    ("soar", 3),
    ("skyrocket", 3),
    ("record", 2),
    ("beat", 2),
    ("upgrade", 2),
    ("rally", 2),
    ("rebound", 2),
    ("jump", 2),
    ("outperform", 2),
    ("buyback", 2),
    ("breakthrough", 2),
    ("profit", 1),
    ("growth", 1),
    ("gain", 1),
    ("rise", 1),
    ("strong", 1),
    ("dividend", 1),
    ("expand", 1),
    ("optimistic", 1),
    ("recovery", 1),
];

const NEGATIVE: &[(&str, i32)] = &[
    ("bearish", 3),
    ("plunge", 3),
    ("crash", 3),
    ("default", 3),
    ("bankruptcy", 3),
    ("slump", 2),
    ("downgrade", 2),
    ("miss", 2),
    ("lawsuit", 2),
    ("probe", 2),
    ("warning", 2),
    ("underperform", 2),
    ("tumble", 2),
    ("sell-off", 2),
    ("loss", 1),
    ("fall", 1),
    ("drop", 1),
    ("weak", 1),
    ("decline", 1),
    ("concern", 1),
    ("risk", 1),
    ("cut", 1),
];

/// Inflections accepted after a keyword stem
const SUFFIXES: &[&str] = &["s", "es", "d", "ed", "ing"];

#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    weights: HashMap<&'static str, i32>,
    negations: HashSet<&'static str>,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        let weights = POSITIVE
            .iter()
            .map(|&(w, s)| (w, s))
            .chain(NEGATIVE.iter().map(|&(w, s)| (w, -s)))
            .collect();
        Self {
            weights,
            negations: NEGATION_WORDS.iter().copied().collect(),
        }
    }
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    fn keyword_weight(&self, token: &str) -> Option<i32> {
        if let Some(&w) = self.weights.get(token) {
            return Some(w);
        }
        SUFFIXES.iter().find_map(|suffix| {
            let stem = token.strip_suffix(suffix)?;
            self.stem_weight(stem)
        })
    }

    fn stem_weight(&self, stem: &str) -> Option<i32> {
        if let Some(&w) = self.weights.get(stem) {
            return Some(w);
        }
        // rising -> rise
        if let Some(&w) = self.weights.get(format!("{stem}e").as_str()) {
            return Some(w);
        }
        // dropped -> drop
        let mut tail = stem.chars().rev();
        match (tail.next(), tail.next()) {
            (Some(a), Some(b)) if a == b => {
                self.weights.get(&stem[..stem.len() - a.len_utf8()]).copied()
            }
            _ => None,
        }
    }

    /// Lexicon score of a single piece of text
    pub fn score_text(&self, text: &str) -> i32 {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut score = 0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(weight) = self.keyword_weight(token) else {
                continue;
            };
            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| self.negations.contains(*t));
            score += if negated { -weight } else { weight };
        }
        score
    }

    pub fn score_article(&self, article: &NewsArticle) -> i32 {
        self.score_text(&article.title)
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn analyze(&self, articles: &[NewsArticle]) -> SentimentSummary {
        if articles.is_empty() {
            return SentimentSummary::default();
        }

        let scores: Vec<i32> = articles.iter().map(|a| self.score_article(a)).collect();
        let bullish_count = scores.iter().filter(|&&s| s > 0).count() as u32;
        let bearish_count = scores.iter().filter(|&&s| s < 0).count() as u32;
        let neutral_count = scores.len() as u32 - bullish_count - bearish_count;
        let avg_score = scores.iter().sum::<i32>() as f64 / scores.len() as f64;

        let (signal, winning) = if avg_score > SIGNAL_THRESHOLD {
            (SignalLabel::Bullish, bullish_count)
        } else if avg_score < -SIGNAL_THRESHOLD {
            (SignalLabel::Bearish, bearish_count)
        } else {
            (SignalLabel::Neutral, neutral_count)
        };
        let confidence = (winning as f64 * 100.0 / scores.len() as f64).round() as u8;

        tracing::trace!(articles = scores.len(), avg_score, %signal, confidence, "scored news batch");

        SentimentSummary {
            signal,
            confidence,
            avg_score: round_to(avg_score, 3),
            bullish_count,
            bearish_count,
            neutral_count,
        }
    }
}
