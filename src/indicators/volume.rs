//! Volume analyzer: spikes and expansion/contraction against price direction.

use serde::{Deserialize, Serialize};

use crate::{clamp_unit, ratio_or_zero, PricePoint, SignalLabel};

/// Bars in each half of the trend comparison (last 5 vs the 5 before)
pub const TREND_WINDOW: usize = 5;
pub const EXPANDING_FACTOR: f64 = 1.1;
pub const CONTRACTING_FACTOR: f64 = 0.9;

/// Recent volume versus the prior window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Expanding,
    Contracting,
    #[default]
    Stable,
}

/// Volume reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeResult {
    pub signal: SignalLabel,
    pub score: f64,
    pub detail: String,
    pub is_spike: bool,
    pub trend: VolumeTrend,
    pub avg_volume: f64,
    pub last_volume: f64,
    /// `last / avg`, absent when the average is zero
    pub volume_ratio: Option<f64>,
}

impl VolumeResult {
    fn insufficient() -> Self {
        Self {
            signal: SignalLabel::Neutral,
            score: 0.0,
            detail: "insufficient volume data".to_string(),
            is_spike: false,
            trend: VolumeTrend::Stable,
            avg_volume: 0.0,
            last_volume: 0.0,
            volume_ratio: None,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn volume_trend(volumes: &[f64]) -> VolumeTrend {
    let len = volumes.len();
    if len < TREND_WINDOW * 2 {
        return VolumeTrend::Stable;
    }
    let recent = mean(&volumes[len - TREND_WINDOW..]);
    let prior = mean(&volumes[len - TREND_WINDOW * 2..len - TREND_WINDOW]);

    if recent > prior * EXPANDING_FACTOR {
        VolumeTrend::Expanding
    } else if recent < prior * CONTRACTING_FACTOR {
        VolumeTrend::Contracting
    } else {
        VolumeTrend::Stable
    }
}

/// Score the last bar's volume against the `avg_period` bars before it.
pub fn analyze_volume(series: &[PricePoint], avg_period: usize, spike_threshold: f64) -> VolumeResult {
    let len = series.len();
    if avg_period == 0 || len < avg_period + 1 {
        return VolumeResult::insufficient();
    }

    let volumes: Vec<f64> = series.iter().map(|p| p.volume as f64).collect();
    let last_volume = volumes[len - 1];
    let avg_volume = mean(&volumes[len - 1 - avg_period..len - 1]);

    let is_spike = last_volume > avg_volume * spike_threshold;
    let trend = volume_trend(&volumes);

    let change = series[len - 1].close - series[len - 2].close;
    let up = change > 0.0;
    let down = change < 0.0;

    let (score, reading) = match (is_spike, trend) {
        (true, _) if up => (0.8, "volume spike on up day"),
        (true, _) if down => (-0.8, "volume spike on down day"),
        (_, VolumeTrend::Expanding) if up => (0.4, "expanding volume on rally"),
        (_, VolumeTrend::Expanding) if down => (-0.4, "expanding volume on decline"),
        (_, VolumeTrend::Contracting) if up => (-0.2, "weakening rally on contracting volume"),
        (_, VolumeTrend::Contracting) if down => (0.2, "selling easing on contracting volume"),
        _ => (0.0, "no volume signal"),
    };

    let volume_ratio = (avg_volume > 0.0).then(|| ratio_or_zero(last_volume, avg_volume));
    let detail = match volume_ratio {
        Some(r) => format!("{reading} ({r:.2}x {avg_period}-day average)"),
        None => reading.to_string(),
    };

    let score = clamp_unit(score);
    VolumeResult {
        signal: SignalLabel::from_score(score),
        score,
        detail,
        is_spike,
        trend,
        avg_volume,
        last_volume,
        volume_ratio,
    }
}
