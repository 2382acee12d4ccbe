//! hkopt-signals
//!
//! Scores one stock's price file (and optionally its news file) and prints the
//! signal report as JSON on stdout. Logs go to stderr.
//!
//! Usage: `hkopt-signals <prices.json> [news.json]`
//!
//! Environment:
//! - `HKOPT_CONFIG`: path to a JSON signal config (defaults otherwise)
//! - `RUST_LOG`: log filter, `info` by default
//! - `LOG_FORMAT=json`: structured logs

use std::env;

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use hkopt_signals::prelude::*;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn load_config() -> Result<SignalConfig> {
    let Ok(path) = env::var("HKOPT_CONFIG") else {
        return Ok(SignalConfig::default());
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
    let config = SignalConfig::from_json(&json).with_context(|| format!("parsing config {path}"))?;
    info!(path = %path, "loaded signal config");
    Ok(config)
}

fn main() -> Result<()> {
    dotenv().ok();
    init_logging();

    let mut args = env::args().skip(1);
    let Some(prices_path) = args.next() else {
        bail!("usage: hkopt-signals <prices.json> [news.json]");
    };
    let news_path = args.next();

    let engine = EngineBuilder::new()
        .config(load_config()?)
        .validate_data(true)
        .build()
        .context("invalid signal config")?;

    let prices = load_price_file(&prices_path)?;
    info!(code = %prices.code, ticker = %prices.ticker, bars = prices.prices.len(), "loaded prices");

    let sentiment = match news_path {
        Some(path) => {
            let news = load_news_file(&path)?;
            let summary = LexiconAnalyzer::new().analyze(&news.articles);
            info!(
                articles = news.articles.len(),
                signal = %summary.signal,
                confidence = summary.confidence,
                "scored news"
            );
            Some(summary)
        }
        None => None,
    };

    let report = engine
        .generate_checked(&prices.prices, sentiment.as_ref())
        .with_context(|| format!("scoring {}", prices.code))?;

    info!(
        code = %prices.code,
        signal = %report.composite.signal,
        score = report.composite.score,
        confidence = report.composite.confidence,
        "signal ready"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
