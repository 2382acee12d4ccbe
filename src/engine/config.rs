//! Engine configuration: indicator parameters and the five-way weight set.

use serde::{Deserialize, Serialize};

use crate::indicators::MaType;
use crate::{Period, Result, SignalError};

pub const DEFAULT_SHORT_MA_PERIOD: Period = Period::new_const(10);
pub const DEFAULT_LONG_MA_PERIOD: Period = Period::new_const(30);
pub const DEFAULT_RSI_PERIOD: Period = Period::new_const(14);
pub const DEFAULT_RSI_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_RSI_OVERSOLD: f64 = 30.0;
pub const DEFAULT_VOLUME_AVG_PERIOD: Period = Period::new_const(20);
pub const DEFAULT_VOLUME_SPIKE_THRESHOLD: f64 = 1.5;
pub const DEFAULT_CANDLE_LOOKBACK: Period = Period::new_const(10);

pub const DEFAULT_WEIGHTS: WeightSet = WeightSet {
    ma: 25.0,
    volume: 20.0,
    candle: 20.0,
    news: 15.0,
    rsi: 20.0,
};

/// Relative importance of each indicator. Need not sum to anything in
/// particular; the aggregator normalizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightSet {
    pub ma: f64,
    pub volume: f64,
    pub candle: f64,
    pub news: f64,
    pub rsi: f64,
}

impl Default for WeightSet {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl WeightSet {
    pub const fn new(ma: f64, volume: f64, candle: f64, news: f64, rsi: f64) -> Self {
        Self {
            ma,
            volume,
            candle,
            news,
            rsi,
        }
    }

    /// Weights in aggregation order: ma, volume, candle, news, rsi
    pub fn as_array(&self) -> [f64; 5] {
        [self.ma, self.volume, self.candle, self.news, self.rsi]
    }
}

/// Everything the engine can be tuned with. Missing keys take their
/// defaults and unknown keys are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalConfig {
    pub ma_type: MaType,
    #[serde(rename = "shortMAPeriod")]
    pub short_ma_period: Period,
    #[serde(rename = "longMAPeriod")]
    pub long_ma_period: Period,
    pub rsi_period: Period,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub volume_avg_period: Period,
    pub volume_spike_threshold: f64,
    pub candle_lookback: Period,
    pub weights: WeightSet,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            ma_type: MaType::Sma,
            short_ma_period: DEFAULT_SHORT_MA_PERIOD,
            long_ma_period: DEFAULT_LONG_MA_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
            rsi_overbought: DEFAULT_RSI_OVERBOUGHT,
            rsi_oversold: DEFAULT_RSI_OVERSOLD,
            volume_avg_period: DEFAULT_VOLUME_AVG_PERIOD,
            volume_spike_threshold: DEFAULT_VOLUME_SPIKE_THRESHOLD,
            candle_lookback: DEFAULT_CANDLE_LOOKBACK,
            weights: DEFAULT_WEIGHTS,
        }
    }
}

impl SignalConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_weights(mut self, weights: WeightSet) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_ma(mut self, ma_type: MaType, short: Period, long: Period) -> Self {
        self.ma_type = ma_type;
        self.short_ma_period = short;
        self.long_ma_period = long;
        self
    }

    /// Check cross-field constraints the individual types cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.short_ma_period >= self.long_ma_period {
            return Err(SignalError::InvalidConfig(format!(
                "shortMAPeriod ({}) must be less than longMAPeriod ({})",
                self.short_ma_period.get(),
                self.long_ma_period.get()
            )));
        }

        check_range("rsiOverbought", self.rsi_overbought, 50.0, 100.0)?;
        check_range("rsiOversold", self.rsi_oversold, 0.0, 50.0)?;
        if !(self.rsi_oversold > 0.0 && self.rsi_oversold < 50.0 && self.rsi_overbought > 50.0 && self.rsi_overbought < 100.0) {
            return Err(SignalError::InvalidConfig(format!(
                "RSI bands must satisfy 0 < oversold ({}) < 50 < overbought ({}) < 100",
                self.rsi_oversold, self.rsi_overbought
            )));
        }

        if !self.volume_spike_threshold.is_finite() || self.volume_spike_threshold <= 0.0 {
            return Err(SignalError::InvalidValue("volumeSpikeThreshold must be a positive number"));
        }

        for (field, w) in ["ma", "volume", "candle", "news", "rsi"]
            .into_iter()
            .zip(self.weights.as_array())
        {
            if !w.is_finite() || w < 0.0 {
                return Err(SignalError::InvalidConfig(format!(
                    "weight '{field}' must be a non-negative number, got {w}"
                )));
            }
        }

        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(SignalError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
