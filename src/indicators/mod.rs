//! Indicator scorers
//!
//! Each scorer is a pure function over its inputs that returns a result with a
//! directional [`SignalLabel`], a score in `[-1, +1]`, a human-readable detail
//! line and whatever auxiliary series a chart needs to draw the indicator.
//! Insufficient input is a normal neutral result, never an error.

pub mod candles;
pub mod moving_average;
pub mod news;
pub mod rsi;
pub mod volume;

pub use candles::*;
pub use moving_average::*;
pub use news::*;
pub use rsi::*;
pub use volume::*;

use crate::SignalLabel;

/// Common view over the five indicator results, used by the aggregator.
pub trait IndicatorScore {
    fn signal(&self) -> SignalLabel;
    fn score(&self) -> f64;
    fn detail(&self) -> &str;
}

/// Implements [`IndicatorScore`] for result structs with `signal`, `score` and `detail` fields.
macro_rules! impl_indicator_score {
    ($($result:ty),* $(,)?) => {
        $(impl IndicatorScore for $result {
            #[inline]
            fn signal(&self) -> SignalLabel { self.signal }
            #[inline]
            fn score(&self) -> f64 { self.score }
            #[inline]
            fn detail(&self) -> &str { &self.detail }
        })*
    };
}

impl_indicator_score!(MaCrossResult, VolumeResult, CandleResult, NewsResult, RsiResult);
