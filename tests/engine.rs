//! Integration tests for the signal engine.
//!
//! Scenario tests pin the documented behaviour of each scorer and of the
//! composite on small hand-built series.

use chrono::{Days, NaiveDate};
use hkopt_signals::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// Bars from closes: open at the previous close, one unit of wick each side
fn series_from(closes: &[f64], volumes: &[u64]) -> Vec<PricePoint> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| {
            let o = if i == 0 { c } else { closes[i - 1] };
            PricePoint::new(start() + Days::new(i as u64), o, o.max(c) + 1.0, o.min(c) - 1.0, c, v)
        })
        .collect()
}

fn flat_volume(closes: &[f64]) -> Vec<PricePoint> {
    series_from(closes, &vec![1_000; closes.len()])
}

#[test]
fn test_rsi_saturates_on_monotonic_rise() {
    let closes: Vec<f64> = (100..=130).map(f64::from).collect();
    let rsi = analyze_rsi(&closes, 14, 70.0, 30.0);

    assert_eq!(rsi.current, Some(100.0));
    assert_eq!(rsi.signal, SignalLabel::Bearish);
    assert_eq!(rsi.score, -1.0);
    assert!(rsi.detail.contains("overbought"));
}

#[test]
fn test_golden_cross_after_dip() {
    let closes = [10.0, 10.0, 10.0, 10.0, 10.0, 9.0, 9.0, 9.0, 12.0, 13.0, 14.0, 15.0, 16.0];
    let ma = analyze_ma_crossover(&closes, 3, 5, MaType::Sma);

    let golden: Vec<_> = ma
        .crossovers
        .iter()
        .filter(|c| c.kind == CrossKind::GoldenCross)
        .collect();
    assert_eq!(golden.len(), 1);
    assert_eq!(golden[0].index, 8);

    // The dip from a flat start is a death cross at the first negative gap
    assert_eq!(ma.crossovers[0].kind, CrossKind::DeathCross);
    assert_eq!(ma.crossovers[0].index, 5);

    // Gap of 1/14 already saturates; the recent cross keeps it pinned at 1
    assert_eq!(ma.score, 1.0);
    assert_eq!(ma.signal, SignalLabel::Bullish);
    assert!(ma.detail.contains("golden cross 4 bars ago"));
}

#[test]
fn test_volume_spike_on_rising_bar() {
    let mut closes = vec![50.0; 20];
    closes.push(51.0);
    let mut volumes = vec![100; 20];
    volumes.push(500);
    let series = series_from(&closes, &volumes);

    let vol = analyze_volume(&series, 20, 1.5);
    assert!(vol.is_spike);
    assert_eq!(vol.signal, SignalLabel::Bullish);
    assert_eq!(vol.score, 0.8);
    assert_eq!(vol.avg_volume, 100.0);
    assert_eq!(vol.volume_ratio, Some(5.0));
}

#[test]
fn test_short_series_still_reports() {
    let closes: Vec<f64> = (0..10).map(|i| 20.0 + i as f64 * 0.1).collect();
    let report = generate_signals(&flat_volume(&closes), None, &SignalConfig::default());

    let rsi = &report.indicators.rsi;
    assert_eq!(rsi.signal, SignalLabel::Neutral);
    assert_eq!(rsi.score, 0.0);
    assert!(rsi.detail.contains("insufficient data"));

    assert_eq!(report.indicators.ma.detail, "insufficient data");
    assert_eq!(report.indicators.volume.detail, "insufficient volume data");
    assert_eq!(report.indicators.news.detail, "no news data available");
    assert!(report.composite.score.is_finite());
    assert!(report.composite.confidence <= 99);
}

#[test]
fn test_empty_series() {
    let report = generate_signals(&[], None, &SignalConfig::default());
    assert_eq!(report.composite.score, 0.0);
    assert_eq!(report.composite.signal, Recommendation::Neutral);
    assert_eq!(report.indicators.candle.detail, "not enough candles");
}

#[test]
fn test_all_neutral_inputs_give_neutral_composite() {
    // Flat closes and flat volume zero out MA and volume; RSI is left short of data
    let closes = vec![42.0; 60];
    let config = SignalConfig {
        rsi_period: Period::new(100).unwrap(),
        ..SignalConfig::default()
    };
    let engine = EngineBuilder::new()
        .config(config)
        .pattern_detector(NoPatterns)
        .build()
        .unwrap();
    let report = engine.generate(&flat_volume(&closes), None);

    assert_eq!(report.indicators.ma.score, 0.0);
    assert_eq!(report.indicators.volume.score, 0.0);
    assert_eq!(report.indicators.candle.score, 0.0);
    assert_eq!(report.indicators.news.score, 0.0);
    assert_eq!(report.indicators.rsi.score, 0.0);
    assert_eq!(report.composite.score, 0.0);
    assert_eq!(report.composite.confidence, 0);
    assert_eq!(report.composite.signal, Recommendation::Neutral);
    assert_eq!(report.composite.label, "NEUTRAL");
}

#[test]
fn test_generation_is_idempotent() {
    let closes: Vec<f64> = (0..80)
        .map(|i| 100.0 + ((i * 37 % 23) as f64 - 11.0) * 0.7 + i as f64 * 0.2)
        .collect();
    let volumes: Vec<u64> = (0..80).map(|i| 5_000 + (i * 7919 % 3000) as u64).collect();
    let series = series_from(&closes, &volumes);
    let news = SentimentSummary {
        signal: SignalLabel::Bullish,
        confidence: 67,
        avg_score: 1.2,
        bullish_count: 4,
        bearish_count: 1,
        neutral_count: 1,
    };
    let config = SignalConfig::default();

    let a = generate_signals(&series, Some(&news), &config);
    let b = generate_signals(&series, Some(&news), &config);
    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn test_news_passthrough_and_scaling() {
    let closes = vec![42.0; 40];
    let news = SentimentSummary {
        signal: SignalLabel::Bearish,
        confidence: 80,
        avg_score: 4.5,
        bullish_count: 0,
        bearish_count: 4,
        neutral_count: 1,
    };
    let report = generate_signals(&flat_volume(&closes), Some(&news), &SignalConfig::default());
    let n = &report.indicators.news;

    // label comes from the summary even though the score is positive
    assert_eq!(n.signal, SignalLabel::Bearish);
    assert_eq!(n.score, 1.0);
    assert_eq!(n.article_count, 5);
}

#[test]
fn test_lexicon_to_report() {
    let articles = vec![
        NewsArticle::from_title("Tencent profit surges on gaming rebound"),
        NewsArticle::from_title("Analysts upgrade Tencent after record quarter"),
        NewsArticle::from_title("Tencent shares little changed"),
    ];
    let summary = LexiconAnalyzer::new().analyze(&articles);
    assert_eq!(summary.signal, SignalLabel::Bullish);
    assert_eq!(summary.bullish_count, 2);
    assert_eq!(summary.neutral_count, 1);
    assert_eq!(summary.confidence, 67);

    let closes = vec![300.0; 40];
    let report = generate_signals(&flat_volume(&closes), Some(&summary), &SignalConfig::default());
    assert_eq!(report.indicators.news.signal, SignalLabel::Bullish);
    assert_eq!(report.indicators.news.score, 1.0);
    assert_eq!(report.indicators.news.confidence, 67);
}

#[test]
fn test_news_only_weighting() {
    let closes = vec![42.0; 40];
    let news = SentimentSummary {
        signal: SignalLabel::Bullish,
        confidence: 90,
        avg_score: 3.0,
        bullish_count: 9,
        bearish_count: 0,
        neutral_count: 1,
    };
    let config = SignalConfig::default().with_weights(WeightSet::new(0.0, 0.0, 0.0, 1.0, 0.0));
    let report = generate_signals(&flat_volume(&closes), Some(&news), &config);

    assert_eq!(report.indicators.news.weight, 1.0);
    assert_eq!(report.indicators.ma.weight, 0.0);
    assert_eq!(report.composite.score, 1.0);
    assert_eq!(report.composite.signal, Recommendation::StrongBuy);
}

#[test]
fn test_zero_weights_fall_back_to_equal_share() {
    let config = SignalConfig::default().with_weights(WeightSet::new(0.0, 0.0, 0.0, 0.0, 0.0));
    let report = generate_signals(&flat_volume(&[10.0; 30]), None, &config);
    assert_eq!(report.indicators.ma.weight, 0.2);
    assert_eq!(report.indicators.rsi.weight, 0.2);
}

#[test]
fn test_ema_config() {
    let closes: Vec<f64> = (0..60).map(|i| 80.0 - i as f64 * 0.5).collect();
    let config = SignalConfig::from_json(r#"{"maType":"EMA","shortMAPeriod":5,"longMAPeriod":20}"#).unwrap();
    let report = generate_signals(&flat_volume(&closes), None, &config);

    assert_eq!(report.indicators.ma.ma_type, MaType::Ema);
    assert_eq!(report.indicators.ma.signal, SignalLabel::Bearish);
    assert!(report.indicators.ma.detail.starts_with("EMA(5) below EMA(20)"));
}

#[test]
fn test_report_wire_shape() {
    let closes: Vec<f64> = (0..40).map(|i| 10.0 + i as f64 * 0.1).collect();
    let report = generate_signals(&flat_volume(&closes), None, &SignalConfig::default());
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["composite"]["className"].is_string());
    assert!(json["indicators"]["ma"]["weight"].is_number());
    assert!(json["indicators"]["ma"]["shortMa"].is_array());
    assert!(json["indicators"]["rsi"]["values"].is_array());
    assert_eq!(json["indicators"]["volume"]["trend"], "stable");
    assert_eq!(json["config"]["shortMAPeriod"], 10);
    assert_eq!(json["series"][0]["date"], "2024-01-02");

    let back: SignalReport = serde_json::from_value(json).unwrap();
    assert_eq!(back.composite, report.composite);
}

#[test]
fn test_parallel_matches_sequential() {
    let a: Vec<f64> = (0..50).map(|i| 20.0 + i as f64 * 0.3).collect();
    let b: Vec<f64> = (0..50).map(|i| 40.0 - i as f64 * 0.2).collect();
    let sa = flat_volume(&a);
    let sb = flat_volume(&b);

    let engine = EngineBuilder::new().validate_data(true).build().unwrap();
    let inputs: Vec<(&str, &[PricePoint], Option<&SentimentSummary>)> =
        vec![("00700", sa.as_slice(), None), ("00005", sb.as_slice(), None)];
    let (ok, failed) = generate_parallel(&engine, inputs);

    assert!(failed.is_empty());
    assert_eq!(ok[0].report, engine.generate(&sa, None));
    assert_eq!(ok[1].report, engine.generate(&sb, None));
}
