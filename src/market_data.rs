use std::future::Future;

use anyhow::Result;
use chrono::NaiveDate;

use crate::model::news::NewsItem;
use crate::model::quote::{IndicatorKind, Quote};

/// Time window and smoothing period for one indicator request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorWindow {
    pub resolution: String,
    pub period: u32,
    pub from_s: i64,
    pub to_s: i64,
}

impl IndicatorWindow {
    /// Window ending at `now_s` and reaching `lookback_s` into the past.
    pub fn trailing(resolution: &str, period: u32, now_s: i64, lookback_s: i64) -> Self {
        Self {
            resolution: resolution.to_string(),
            period,
            from_s: now_s - lookback_s,
            to_s: now_s,
        }
    }
}

/// Quote, indicator and news source used by the poll loop and trade actions.
pub trait MarketData: Send + Sync {
    fn quote(&self, symbol: &str) -> impl Future<Output = Result<Quote>> + Send;

    /// Latest indicator value; `Ok(None)` when the source has no data for the window.
    fn indicator(
        &self,
        symbol: &str,
        kind: IndicatorKind,
        window: &IndicatorWindow,
    ) -> impl Future<Output = Result<Option<f64>>> + Send;

    fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = Result<Vec<NewsItem>>> + Send;
}
