//! Signal engine: runs the five scorers over one series and blends them.
//!
//! [`generate_signals`] is the one-call entry point. [`SignalEngine`] carries a
//! validated configuration and a pattern detector for repeated use, and
//! [`generate_parallel`] fans one engine out over many symbols.

pub mod aggregator;
pub mod config;
pub mod report;

pub use aggregator::{
    aggregate, classify, compute_confidence, normalize_weights, CompositeSignal, NormalizedWeights,
    Recommendation, ScoreSet,
};
pub use config::{SignalConfig, WeightSet, DEFAULT_WEIGHTS};
pub use crate::indicators::MaType;
pub use report::{IndicatorBreakdown, SignalReport, SymbolError, SymbolReport, Weighted};

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::data::validate_series;
use crate::indicators::{analyze_candlesticks, analyze_ma_crossover, analyze_news, analyze_rsi, analyze_volume};
use crate::patterns::{CandlestickDetector, PatternDetector};
use crate::sentiment::SentimentSummary;
use crate::{PricePoint, Result};

// ============================================================
// ENTRY POINT
// ============================================================

/// Evaluate `series` with the builtin candlestick detector. Never fails:
/// short or degenerate input yields neutral indicator results.
pub fn generate_signals(
    series: &[PricePoint],
    sentiment: Option<&SentimentSummary>,
    config: &SignalConfig,
) -> SignalReport {
    evaluate(series, sentiment, config, &CandlestickDetector::default())
}

fn evaluate<D: PatternDetector + ?Sized>(
    series: &[PricePoint],
    sentiment: Option<&SentimentSummary>,
    config: &SignalConfig,
    detector: &D,
) -> SignalReport {
    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();

    let ma = analyze_ma_crossover(
        &closes,
        config.short_ma_period.get(),
        config.long_ma_period.get(),
        config.ma_type,
    );
    let volume = analyze_volume(series, config.volume_avg_period.get(), config.volume_spike_threshold);
    let candle = analyze_candlesticks(series, detector, config.candle_lookback.get());
    let news = analyze_news(sentiment);
    let rsi = analyze_rsi(
        &closes,
        config.rsi_period.get(),
        config.rsi_overbought,
        config.rsi_oversold,
    );

    trace!(
        ma = ma.score,
        volume = volume.score,
        candle = candle.score,
        news = news.score,
        rsi = rsi.score,
        "indicator scores"
    );

    let scores = ScoreSet::from_results(&ma, &volume, &candle, &news, &rsi);
    let composite = aggregate(&scores, &config.weights);
    let weights = normalize_weights(&config.weights);

    debug!(
        bars = series.len(),
        score = composite.score,
        signal = %composite.signal,
        confidence = composite.confidence,
        "generated signal report"
    );

    SignalReport {
        composite,
        indicators: IndicatorBreakdown {
            ma: Weighted::new(ma, weights.ma),
            volume: Weighted::new(volume, weights.volume),
            candle: Weighted::new(candle, weights.candle),
            news: Weighted::new(news, weights.news),
            rsi: Weighted::new(rsi, weights.rsi),
        },
        config: config.clone(),
        series: series.to_vec(),
    }
}

// ============================================================
// SIGNAL ENGINE
// ============================================================

/// Reusable engine with a validated configuration
#[derive(Debug, Clone)]
pub struct SignalEngine<D: PatternDetector = CandlestickDetector> {
    config: SignalConfig,
    detector: D,
    validate_data: bool,
}

impl<D: PatternDetector> SignalEngine<D> {
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Score `series` without checking it.
    pub fn generate(&self, series: &[PricePoint], sentiment: Option<&SentimentSummary>) -> SignalReport {
        evaluate(series, sentiment, &self.config, &self.detector)
    }

    /// Like [`generate`](Self::generate), but rejects malformed series first
    /// when data validation is enabled.
    pub fn generate_checked(
        &self,
        series: &[PricePoint],
        sentiment: Option<&SentimentSummary>,
    ) -> Result<SignalReport> {
        if self.validate_data {
            validate_series(series).inspect_err(|e| warn!(error = %e, "rejected price series"))?;
        }
        Ok(self.generate(series, sentiment))
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for [`SignalEngine`]
#[derive(Debug, Clone)]
pub struct EngineBuilder<D: PatternDetector = CandlestickDetector> {
    config: SignalConfig,
    detector: D,
    validate_data: bool,
}

impl Default for EngineBuilder<CandlestickDetector> {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder<CandlestickDetector> {
    pub fn new() -> Self {
        Self {
            config: SignalConfig::default(),
            detector: CandlestickDetector::default(),
            validate_data: false,
        }
    }
}

impl<D: PatternDetector> EngineBuilder<D> {
    pub fn config(mut self, config: SignalConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the candlestick pattern detector
    pub fn pattern_detector<D2: PatternDetector>(self, detector: D2) -> EngineBuilder<D2> {
        EngineBuilder {
            config: self.config,
            detector,
            validate_data: self.validate_data,
        }
    }

    /// Enable/disable series validation in `generate_checked`
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.validate_data = enable;
        self
    }

    pub fn build(self) -> Result<SignalEngine<D>> {
        self.config
            .validate()
            .inspect_err(|e| warn!(error = %e, "invalid signal config"))?;
        Ok(SignalEngine {
            config: self.config,
            detector: self.detector,
            validate_data: self.validate_data,
        })
    }
}

// ============================================================
// PARALLEL EVALUATION
// ============================================================

/// Evaluate many symbols at once. Successes and failures are split; each
/// keeps the input order.
pub fn generate_parallel<'a, D, I>(engine: &SignalEngine<D>, instruments: I) -> (Vec<SymbolReport>, Vec<SymbolError>)
where
    D: PatternDetector,
    I: IntoParallelIterator<Item = (&'a str, &'a [PricePoint], Option<&'a SentimentSummary>)>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, series, sentiment)| {
            engine
                .generate_checked(series, sentiment)
                .map(|report| SymbolReport {
                    symbol: symbol.to_string(),
                    report,
                })
                .map_err(|error| SymbolError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}
