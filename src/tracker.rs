use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::event::AppEvent;
use crate::market_data::{IndicatorWindow, MarketData};
use crate::model::news::NewsItem;
use crate::model::quote::{IndicatorKind, Quote};
use crate::model::sample::Sample;
use crate::sequencer::Generation;

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub indicator_resolution: String,
    pub indicator_period: u32,
    pub indicator_lookback_secs: i64,
    pub news_lookback_days: i64,
    pub news_limit: usize,
}

impl PollSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll.interval(),
            indicator_resolution: config.finnhub.indicator_resolution.clone(),
            indicator_period: config.finnhub.indicator_period,
            indicator_lookback_secs: config.finnhub.indicator_lookback_secs,
            news_lookback_days: config.finnhub.news_lookback_days,
            news_limit: config.finnhub.news_limit,
        }
    }
}

/// One fan-out/fan-in round: quote, SMA and EMA are fetched together and the
/// sample is only built once all three have resolved.
pub async fn poll_sample<C, Tz>(
    client: &C,
    symbol: &str,
    settings: &PollSettings,
    now: DateTime<Tz>,
) -> Result<(Sample, Quote)>
where
    C: MarketData,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let window = IndicatorWindow::trailing(
        &settings.indicator_resolution,
        settings.indicator_period,
        now.timestamp(),
        settings.indicator_lookback_secs,
    );
    let (quote, sma, ema) = tokio::try_join!(
        client.quote(symbol),
        client.indicator(symbol, IndicatorKind::Sma, &window),
        client.indicator(symbol, IndicatorKind::Ema, &window),
    )?;
    if !quote.is_tradable() {
        bail!("no quote data for {}", symbol);
    }
    let label = now.format("%H:%M:%S").to_string();
    Ok((Sample::new(label, quote.price, sma, ema), quote))
}

pub async fn fetch_news<C: MarketData>(
    client: &C,
    symbol: &str,
    settings: &PollSettings,
    today: NaiveDate,
) -> Result<Vec<NewsItem>> {
    let from = today - chrono::Duration::days(settings.news_lookback_days);
    let mut items = client.company_news(symbol, from, today).await?;
    items.truncate(settings.news_limit);
    Ok(items)
}

async fn run_tick<C: MarketData>(
    client: &C,
    symbol: &str,
    generation: Generation,
    settings: &PollSettings,
    app_tx: &mpsc::Sender<AppEvent>,
) {
    let now = Local::now();
    match poll_sample(client, symbol, settings, now).await {
        Ok((sample, quote)) => {
            tracing::debug!(
                symbol,
                generation = generation.value(),
                price = sample.price,
                sma = ?sample.sma,
                ema = ?sample.ema,
                "Poll tick sampled"
            );
            let _ = app_tx
                .send(AppEvent::SampleReady {
                    generation,
                    symbol: symbol.to_string(),
                    sample,
                    quote,
                })
                .await;
        }
        Err(e) => {
            tracing::warn!(symbol, error = %e, "Poll tick failed");
            let _ = app_tx
                .send(AppEvent::PollFailed {
                    generation,
                    symbol: symbol.to_string(),
                    error: format!("{:#}", e),
                })
                .await;
        }
    }

    match fetch_news(client, symbol, settings, now.date_naive()).await {
        Ok(items) => {
            let _ = app_tx
                .send(AppEvent::NewsReady {
                    generation,
                    symbol: symbol.to_string(),
                    items,
                })
                .await;
        }
        Err(e) => {
            tracing::warn!(symbol, error = %e, "News fetch failed");
            let _ = app_tx
                .send(AppEvent::LogMessage(format!(
                    "[WARN] News fetch failed for {}: {:#}",
                    symbol, e
                )))
                .await;
        }
    }
}

/// Owns the poll task of the currently tracked ticker. Dropping or stopping
/// the handle aborts the task, so no further ticks of it are scheduled.
pub struct TrackerHandle {
    symbol: String,
    generation: Generation,
    task: JoinHandle<()>,
}

impl TrackerHandle {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn stop(self) {
        tracing::info!(symbol = %self.symbol, generation = self.generation.value(), "Tracker stopped");
        // Drop aborts.
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Poll `symbol` every `settings.interval`, first tick immediately. A tick
/// that overruns the interval delays the next one instead of overlapping it.
pub fn spawn_tracker<C>(
    client: Arc<C>,
    symbol: String,
    generation: Generation,
    settings: PollSettings,
    app_tx: mpsc::Sender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> TrackerHandle
where
    C: MarketData + 'static,
{
    let task_symbol = symbol.clone();
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(settings.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            symbol = %task_symbol,
            generation = generation.value(),
            interval_secs = settings.interval.as_secs(),
            "Tracker started"
        );
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tokio::select! {
                        _ = run_tick(client.as_ref(), &task_symbol, generation, &settings, &app_tx) => {}
                        _ = shutdown.changed() => break,
                    }
                }
                _ = shutdown.changed() => break,
            }
            if *shutdown.borrow() {
                break;
            }
        }
        tracing::info!(symbol = %task_symbol, "Tracker task exiting");
    });
    TrackerHandle {
        symbol,
        generation,
        task,
    }
}
