//! Per-stock JSON data files and price-series validation.
//!
//! Price files hold one year of daily bars for an option underlying, news
//! files the latest headlines for the same stock. Both are keyed by the
//! exchange stock code and carry the provider ticker alongside.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sentiment::NewsArticle;
use crate::{PricePoint, Result, SignalError, OHLCV};

/// `prices/<code>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFile {
    pub ticker: String,
    pub code: String,
    #[serde(default)]
    pub days: usize,
    pub prices: Vec<PricePoint>,
    #[serde(default)]
    pub fetched_at: Option<String>,
}

impl PriceFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// `news/<code>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFile {
    pub ticker: String,
    pub code: String,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    #[serde(default)]
    pub fetched_at: Option<String>,
}

impl NewsFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SignalError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_price_file(path: impl AsRef<Path>) -> Result<PriceFile> {
    PriceFile::from_json(&read(path.as_ref())?)
}

pub fn load_news_file(path: impl AsRef<Path>) -> Result<NewsFile> {
    NewsFile::from_json(&read(path.as_ref())?)
}

fn validate_bar(bar: &PricePoint) -> std::result::Result<(), &'static str> {
    let prices = [bar.open(), bar.high(), bar.low(), bar.close()];
    if prices.iter().any(|p| !p.is_finite()) {
        return Err("non-finite price");
    }
    if prices.iter().any(|&p| p <= 0.0) {
        return Err("price must be > 0");
    }
    if bar.high < bar.low {
        return Err("high < low");
    }
    if bar.high < bar.open.max(bar.close) {
        return Err("high below open/close");
    }
    if bar.low > bar.open.min(bar.close) {
        return Err("low above open/close");
    }
    Ok(())
}

/// Check every bar and the date ordering. The error names the first
/// offending index.
pub fn validate_series(series: &[PricePoint]) -> Result<()> {
    for (index, bar) in series.iter().enumerate() {
        validate_bar(bar).map_err(|reason| SignalError::InvalidPricePoint { index, reason })?;
        if index > 0 && bar.date <= series[index - 1].date {
            return Err(SignalError::InvalidPricePoint {
                index,
                reason: "dates must be strictly ascending",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PRICE_JSON: &str = r#"{
        "ticker": "0700.HK",
        "code": "00700",
        "days": 2,
        "prices": [
            {"date": "2024-05-02", "open": 370.2, "high": 375.0, "low": 368.4, "close": 373.6, "volume": 18234000},
            {"date": "2024-05-03", "open": 374.0, "high": 380.2, "low": 372.8, "close": 379.4, "volume": 21900311}
        ],
        "fetchedAt": "2024-05-04T01:00:00Z"
    }"#;

    fn point(day: u32, o: f64, h: f64, l: f64, c: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 5, day).unwrap(), o, h, l, c, 100)
    }

    #[test]
    fn test_parse_price_file() {
        let file = PriceFile::from_json(PRICE_JSON).unwrap();
        assert_eq!(file.code, "00700");
        assert_eq!(file.prices.len(), 2);
        assert_eq!(file.prices[1].volume, 21900311);
        assert_eq!(file.fetched_at.as_deref(), Some("2024-05-04T01:00:00Z"));
        assert!(validate_series(&file.prices).is_ok());
    }

    #[test]
    fn test_parse_news_file_sparse_articles() {
        let json = r#"{
            "ticker": "0005.HK",
            "code": "00005",
            "articles": [
                {"title": "HSBC profit surges on rate windfall", "publishedAt": 1714780800},
                {"title": "HSBC faces probe", "publisher": "Reuters", "relatedTickers": ["0005.HK"]}
            ]
        }"#;
        let file = NewsFile::from_json(json).unwrap();
        assert_eq!(file.articles.len(), 2);
        assert_eq!(file.articles[0].publisher, "");
        assert_eq!(file.articles[1].related_tickers, vec!["0005.HK".to_string()]);
        assert!(file.fetched_at.is_none());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(PriceFile::from_json("{\"ticker\":"), Err(SignalError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_price_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SignalError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("hkopt-prices-{}.json", std::process::id()));
        std::fs::write(&path, PRICE_JSON).unwrap();
        let file = load_price_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(file.ticker, "0700.HK");
    }

    #[test]
    fn test_validate_series_reports_index() {
        let series = vec![
            point(1, 10.0, 11.0, 9.0, 10.5),
            point(2, 10.5, 10.0, 9.0, 9.5),
        ];
        assert!(matches!(
            validate_series(&series),
            Err(SignalError::InvalidPricePoint { index: 1, reason: "high below open/close" })
        ));

        let series = vec![point(1, 10.0, 11.0, 9.0, 10.5), point(2, 0.0, 11.0, 0.0, 10.5)];
        assert!(matches!(
            validate_series(&series),
            Err(SignalError::InvalidPricePoint { index: 1, reason: "price must be > 0" })
        ));

        let series = vec![point(2, 10.0, 11.0, 9.0, 10.5), point(2, 10.0, 11.0, 9.0, 10.5)];
        assert!(matches!(
            validate_series(&series),
            Err(SignalError::InvalidPricePoint { index: 1, .. })
        ));
    }

    #[test]
    fn test_validate_empty() {
        assert!(validate_series(&[]).is_ok());
    }
}
