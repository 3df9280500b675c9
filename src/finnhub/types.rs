use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::model::news::NewsItem;
use crate::model::quote::{IndicatorKind, Quote};

/// Finnhub quote (GET /quote). Unknown symbols come back as all zeros.
#[derive(Debug, Deserialize)]
pub struct FinnhubQuoteResponse {
    #[serde(rename = "c")]
    pub current: f64,
    #[serde(rename = "d", default)]
    pub change: Option<f64>,
    #[serde(rename = "dp", default)]
    pub change_pct: Option<f64>,
    #[serde(rename = "h", default)]
    pub high: Option<f64>,
    #[serde(rename = "l", default)]
    pub low: Option<f64>,
    #[serde(rename = "o", default)]
    pub open: Option<f64>,
    #[serde(rename = "pc", default)]
    pub prev_close: Option<f64>,
    #[serde(rename = "t", default)]
    pub timestamp: i64,
}

impl FinnhubQuoteResponse {
    pub fn into_quote(self, symbol: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price: self.current,
            change: self.change,
            change_pct: self.change_pct,
            high: self.high,
            low: self.low,
            open: self.open,
            prev_close: self.prev_close,
            timestamp_s: self.timestamp,
        }
    }
}

/// Company news item (GET /company-news).
#[derive(Debug, Deserialize)]
pub struct FinnhubNewsItem {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub datetime: i64,
}

impl From<FinnhubNewsItem> for NewsItem {
    fn from(item: FinnhubNewsItem) -> Self {
        let published_at: Option<DateTime<Utc>> = if item.datetime > 0 {
            DateTime::from_timestamp(item.datetime, 0)
        } else {
            None
        };
        NewsItem {
            headline: item.headline,
            summary: item.summary,
            url: item.url,
            source: item.source,
            published_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FinnhubErrorResponse {
    pub error: String,
}

/// Technical-indicator responses carry the candle arrays plus one array named
/// after the indicator (`"sma": [...]`). Only the final element counts: a
/// trailing `null` or `0`, an empty array or `{"s": "no_data"}` all mean the
/// indicator has no value for the requested window.
pub fn last_indicator_value(root: &Value, kind: IndicatorKind) -> Option<f64> {
    root.get(kind.as_finnhub_str())
        .and_then(Value::as_array)?
        .last()
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v != 0.0)
}
