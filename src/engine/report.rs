//! Report shapes handed to renderers.

use serde::{Deserialize, Serialize};

use super::aggregator::CompositeSignal;
use super::config::SignalConfig;
use crate::indicators::{CandleResult, MaCrossResult, NewsResult, RsiResult, VolumeResult};
use crate::PricePoint;

/// An indicator result annotated with its normalized weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weighted<T> {
    #[serde(flatten)]
    pub result: T,
    pub weight: f64,
}

impl<T> Weighted<T> {
    pub fn new(result: T, weight: f64) -> Self {
        Self { result, weight }
    }
}

impl<T> std::ops::Deref for Weighted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.result
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBreakdown {
    pub ma: Weighted<MaCrossResult>,
    pub volume: Weighted<VolumeResult>,
    pub candle: Weighted<CandleResult>,
    pub news: Weighted<NewsResult>,
    pub rsi: Weighted<RsiResult>,
}

/// Everything one evaluation produced, plus the inputs it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub composite: CompositeSignal,
    pub indicators: IndicatorBreakdown,
    pub config: SignalConfig,
    pub series: Vec<PricePoint>,
}

/// Successful evaluation of one symbol in a batch
#[derive(Debug, Clone, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub report: SignalReport,
}

/// Failed evaluation of one symbol in a batch
#[derive(Debug)]
pub struct SymbolError {
    pub symbol: String,
    pub error: crate::SignalError,
}

impl std::fmt::Display for SymbolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.symbol, self.error)
    }
}
