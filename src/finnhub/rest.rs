use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::market_data::{IndicatorWindow, MarketData};
use crate::model::news::NewsItem;
use crate::model::quote::{IndicatorKind, Quote};

use super::types::{last_indicator_value, FinnhubErrorResponse, FinnhubNewsItem, FinnhubQuoteResponse};

/// Free-tier budget is 60 calls/minute; warn once 80% of it is used.
const RATE_LIMIT_PER_MINUTE: u64 = 60;
const RATE_LIMIT_WARN_AT: u64 = RATE_LIMIT_PER_MINUTE * 8 / 10;

pub struct FinnhubRestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    request_count: AtomicU64,
    window_start: std::sync::Mutex<Instant>,
}

impl FinnhubRestClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Finnhub HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            request_count: AtomicU64::new(0),
            window_start: std::sync::Mutex::new(Instant::now()),
        })
    }

    fn compact_error_body(body: &str) -> String {
        let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.chars().count() > 180 {
            format!("{}...", normalized.chars().take(180).collect::<String>())
        } else {
            normalized
        }
    }

    fn check_rate_limit(&self) {
        let mut start = self
            .window_start
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if start.elapsed().as_secs() >= 60 {
            *start = Instant::now();
            self.request_count.store(0, Ordering::Relaxed);
        }
        let count = self.request_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count > RATE_LIMIT_WARN_AT {
            tracing::warn!(
                count,
                limit = RATE_LIMIT_PER_MINUTE,
                "Approaching Finnhub rate limit"
            );
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        self.check_rate_limit();
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(endpoint = path, "Finnhub request");

        let resp = self
            .http
            .get(&url)
            .query(query)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("finnhub {} HTTP failed", what))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let msg = serde_json::from_str::<FinnhubErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| Self::compact_error_body(&body));
            return Err(AppError::FinnhubApi {
                status: status.as_u16(),
                msg,
            }
            .into());
        }

        resp.json::<T>()
            .await
            .with_context(|| format!("finnhub {} JSON parse failed", what))
    }

    pub async fn get_quote(&self, symbol: &str) -> Result<Quote> {
        let resp: FinnhubQuoteResponse = self
            .get_json("quote", &[("symbol", symbol.to_string())], "quote")
            .await?;
        Ok(resp.into_quote(symbol))
    }

    pub async fn get_indicator(
        &self,
        symbol: &str,
        kind: IndicatorKind,
        window: &IndicatorWindow,
    ) -> Result<Option<f64>> {
        let root: Value = self
            .get_json(
                "indicator",
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", window.resolution.clone()),
                    ("from", window.from_s.to_string()),
                    ("to", window.to_s.to_string()),
                    ("indicator", kind.as_finnhub_str().to_string()),
                    ("timeperiod", window.period.to_string()),
                ],
                "indicator",
            )
            .await?;
        let value = last_indicator_value(&root, kind);
        if value.is_none() {
            tracing::debug!(symbol, indicator = kind.as_finnhub_str(), "Indicator returned no data");
        }
        Ok(value)
    }

    pub async fn get_company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsItem>> {
        let items: Vec<FinnhubNewsItem> = self
            .get_json(
                "company-news",
                &[
                    ("symbol", symbol.to_string()),
                    ("from", from.format("%Y-%m-%d").to_string()),
                    ("to", to.format("%Y-%m-%d").to_string()),
                ],
                "company-news",
            )
            .await?;
        Ok(items.into_iter().map(NewsItem::from).collect())
    }
}

impl MarketData for FinnhubRestClient {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        self.get_quote(symbol).await
    }

    async fn indicator(
        &self,
        symbol: &str,
        kind: IndicatorKind,
        window: &IndicatorWindow,
    ) -> Result<Option<f64>> {
        self.get_indicator(symbol, kind, window).await
    }

    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsItem>> {
        self.get_company_news(symbol, from, to).await
    }
}
