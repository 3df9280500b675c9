use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use tokio::sync::{mpsc, watch};

use ticker_desk::event::{AppEvent, TradeKind};
use ticker_desk::market_data::{IndicatorWindow, MarketData};
use ticker_desk::model::news::NewsItem;
use ticker_desk::model::quote::{IndicatorKind, Quote};
use ticker_desk::sequencer::RequestSequencer;
use ticker_desk::tracker::{fetch_news, poll_sample, spawn_tracker, PollSettings};
use ticker_desk::trading::{fetch_trade_quote, spawn_trade_quote};

#[derive(Default)]
struct FakeMarket {
    price: f64,
    sma: Option<f64>,
    ema: Option<f64>,
    news_count: usize,
    fail_indicator: bool,
    fail_news: bool,
    quote_calls: AtomicUsize,
    windows: Mutex<Vec<(IndicatorKind, IndicatorWindow)>>,
    news_ranges: Mutex<Vec<(NaiveDate, NaiveDate)>>,
}

impl MarketData for FakeMarket {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Quote {
            symbol: symbol.to_string(),
            price: self.price,
            change: None,
            change_pct: None,
            high: None,
            low: None,
            open: None,
            prev_close: None,
            timestamp_s: 0,
        })
    }

    async fn indicator(
        &self,
        _symbol: &str,
        kind: IndicatorKind,
        window: &IndicatorWindow,
    ) -> Result<Option<f64>> {
        self.windows.lock().unwrap().push((kind, window.clone()));
        if self.fail_indicator {
            bail!("indicator endpoint unavailable");
        }
        Ok(match kind {
            IndicatorKind::Sma => self.sma,
            IndicatorKind::Ema => self.ema,
        })
    }

    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsItem>> {
        self.news_ranges.lock().unwrap().push((from, to));
        if self.fail_news {
            bail!("news endpoint unavailable");
        }
        Ok((0..self.news_count)
            .map(|i| NewsItem {
                headline: format!("{} headline {}", symbol, i),
                summary: String::new(),
                url: format!("https://example.com/{}", i),
                source: "wire".to_string(),
                published_at: None,
            })
            .collect())
    }
}

fn settings(interval: Duration) -> PollSettings {
    PollSettings {
        interval,
        indicator_resolution: "1".to_string(),
        indicator_period: 5,
        indicator_lookback_secs: 300,
        news_lookback_days: 3,
        news_limit: 5,
    }
}

#[tokio::test]
async fn poll_sample_combines_quote_and_indicators() {
    let market = FakeMarket {
        price: 187.5,
        sma: Some(186.0),
        ema: Some(186.4),
        ..Default::default()
    };
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 15).unwrap();

    let (sample, quote) = poll_sample(&market, "AAPL", &settings(Duration::from_secs(10)), now)
        .await
        .unwrap();

    assert_eq!(sample.label, "09:30:15");
    assert_eq!(sample.price, 187.5);
    assert_eq!(sample.sma, Some(186.0));
    assert_eq!(sample.ema, Some(186.4));
    assert_eq!(quote.symbol, "AAPL");

    let windows = market.windows.lock().unwrap();
    assert_eq!(windows.len(), 2);
    for (_, window) in windows.iter() {
        assert_eq!(window.to_s, now.timestamp());
        assert_eq!(window.from_s, now.timestamp() - 300);
        assert_eq!(window.period, 5);
        assert_eq!(window.resolution, "1");
    }
}

#[tokio::test]
async fn missing_indicator_data_is_none_not_zero() {
    let market = FakeMarket {
        price: 50.0,
        ..Default::default()
    };
    let (sample, _) = poll_sample(&market, "XYZ", &settings(Duration::from_secs(10)), Utc::now())
        .await
        .unwrap();
    assert_eq!(sample.sma, None);
    assert_eq!(sample.ema, None);
}

#[tokio::test]
async fn any_failed_fetch_abandons_the_tick() {
    let market = FakeMarket {
        price: 50.0,
        sma: Some(49.0),
        fail_indicator: true,
        ..Default::default()
    };
    let err = poll_sample(&market, "XYZ", &settings(Duration::from_secs(10)), Utc::now())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("indicator endpoint unavailable"));
}

#[tokio::test]
async fn zero_quote_is_reported_as_missing_data() {
    let market = FakeMarket::default();
    let err = poll_sample(&market, "NOPE", &settings(Duration::from_secs(10)), Utc::now())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no quote data for NOPE"));
}

#[tokio::test]
async fn news_is_truncated_and_uses_lookback_range() {
    let market = FakeMarket {
        news_count: 12,
        ..Default::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let items = fetch_news(&market, "AAPL", &settings(Duration::from_secs(10)), today)
        .await
        .unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0].headline, "AAPL headline 0");
    assert_eq!(items[0].summary_or_placeholder(), "No summary available.");
    let ranges = market.news_ranges.lock().unwrap();
    assert_eq!(
        ranges[0],
        (NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(), today)
    );
}

#[tokio::test]
async fn tracker_ticks_immediately_and_stops_on_request() {
    let market = Arc::new(FakeMarket {
        price: 10.0,
        sma: Some(9.5),
        news_count: 2,
        ..Default::default()
    });
    let (app_tx, mut app_rx) = mpsc::channel(16);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut seq = RequestSequencer::new();
    let generation = seq.advance();

    let handle = spawn_tracker(
        Arc::clone(&market),
        "AAPL".to_string(),
        generation,
        settings(Duration::from_secs(3600)),
        app_tx,
        shutdown_rx,
    );
    assert_eq!(handle.symbol(), "AAPL");
    assert_eq!(handle.generation(), generation);

    let first = tokio::time::timeout(Duration::from_secs(2), app_rx.recv())
        .await
        .unwrap()
        .unwrap();
    match first {
        AppEvent::SampleReady {
            generation: g,
            symbol,
            sample,
            ..
        } => {
            assert_eq!(g, generation);
            assert_eq!(symbol, "AAPL");
            assert_eq!(sample.price, 10.0);
        }
        other => panic!("expected a sample, got {:?}", other),
    }
    let second = tokio::time::timeout(Duration::from_secs(2), app_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(second, AppEvent::NewsReady { ref items, .. } if items.len() == 2));

    handle.stop();
    // The aborted task drops the only sender.
    let after = tokio::time::timeout(Duration::from_secs(2), app_rx.recv())
        .await
        .unwrap();
    assert!(after.is_none());
    assert_eq!(market.quote_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn tracker_exits_on_shutdown_signal() {
    let market = Arc::new(FakeMarket {
        price: 10.0,
        ..Default::default()
    });
    let (app_tx, mut app_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let _handle = spawn_tracker(
        market,
        "AAPL".to_string(),
        RequestSequencer::new().advance(),
        settings(Duration::from_secs(3600)),
        app_tx,
        shutdown_rx,
    );

    // Sample and news of the first tick.
    for _ in 0..2 {
        tokio::time::timeout(Duration::from_secs(2), app_rx.recv())
            .await
            .unwrap()
            .unwrap();
    }
    shutdown_tx.send(true).unwrap();
    let after = tokio::time::timeout(Duration::from_secs(2), app_rx.recv())
        .await
        .unwrap();
    assert!(after.is_none());
}

#[tokio::test]
async fn failed_news_only_logs() {
    let market = Arc::new(FakeMarket {
        price: 10.0,
        fail_news: true,
        ..Default::default()
    });
    let (app_tx, mut app_rx) = mpsc::channel(16);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let _handle = spawn_tracker(
        market,
        "AAPL".to_string(),
        RequestSequencer::new().advance(),
        settings(Duration::from_secs(3600)),
        app_tx,
        shutdown_rx,
    );

    let first = app_rx.recv().await.unwrap();
    assert!(matches!(first, AppEvent::SampleReady { .. }));
    let second = app_rx.recv().await.unwrap();
    match second {
        AppEvent::LogMessage(msg) => assert!(msg.contains("News fetch failed for AAPL")),
        other => panic!("expected a log message, got {:?}", other),
    }
}

#[tokio::test]
async fn trade_quote_rejects_unknown_symbols() {
    let market = FakeMarket::default();
    let err = fetch_trade_quote(&market, "NOPE").await.unwrap_err();
    assert!(err.to_string().contains("no quote data"));

    let market = FakeMarket {
        price: 42.0,
        ..Default::default()
    };
    assert_eq!(fetch_trade_quote(&market, "OK").await.unwrap().price, 42.0);
}

#[tokio::test]
async fn spawned_trade_quote_reports_back_with_its_token() {
    let market = Arc::new(FakeMarket {
        price: 42.0,
        ..Default::default()
    });
    let (app_tx, mut app_rx) = mpsc::channel(4);
    let token = RequestSequencer::new().advance();
    spawn_trade_quote(market, "MSFT".to_string(), TradeKind::Sell, token, app_tx);

    match app_rx.recv().await.unwrap() {
        AppEvent::TradeQuote { token: t, kind, quote } => {
            assert_eq!(t, token);
            assert_eq!(kind, TradeKind::Sell);
            assert_eq!(quote.price, 42.0);
        }
        other => panic!("expected a trade quote, got {:?}", other),
    }

    let (app_tx, mut app_rx) = mpsc::channel(4);
    spawn_trade_quote(
        Arc::new(FakeMarket::default()),
        "NOPE".to_string(),
        TradeKind::Invest,
        token,
        app_tx,
    );
    assert!(matches!(
        app_rx.recv().await.unwrap(),
        AppEvent::TradeFailed {
            kind: TradeKind::Invest,
            ..
        }
    ));
}

#[test]
fn trade_quote_resolves_outside_a_runtime() {
    let market = FakeMarket {
        price: 12.5,
        ..Default::default()
    };
    let quote = tokio_test::block_on(fetch_trade_quote(&market, "IBM")).unwrap();
    assert_eq!(quote.symbol, "IBM");
    assert_eq!(quote.price, 12.5);
    assert_eq!(market.quote_calls.load(Ordering::SeqCst), 1);
}
