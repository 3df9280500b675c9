use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use ticker_desk::config::Config;
use ticker_desk::content::LearningContent;
use ticker_desk::event::AppEvent;
use ticker_desk::finnhub::rest::FinnhubRestClient;
use ticker_desk::tracker::{spawn_tracker, PollSettings, TrackerHandle};
use ticker_desk::trading::spawn_trade_quote;
use ticker_desk::ui::{self, AppState};
use ticker_desk::ui_handlers::{handle_key, KeyAction};

const LOG_FILE: &str = "ticker-desk.log";

fn schedule_chat_reply(text: String, delay: Duration, app_tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = app_tx.send(AppEvent::ChatReply { text }).await;
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure .env exists with FINNHUB_API_KEY (see .env.example)");
            std::process::exit(1);
        }
    };

    // Log to a file so output doesn't interfere with the TUI
    let log_file = std::fs::File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"))
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        rest_url = %config.finnhub.rest_base_url,
        poll_secs = config.poll.interval_secs,
        series_window = config.ui.series_window,
        "Starting ticker-desk"
    );

    let content = LearningContent::load()?;

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let client = Arc::new(FinnhubRestClient::new(
        &config.finnhub.rest_base_url,
        &config.finnhub.api_key,
        config.finnhub.request_timeout(),
    )?);
    let poll_settings = PollSettings::from_config(&config);
    let chat_delay = Duration::from_millis(config.chat.reply_delay_ms);

    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(&config, content);
    app_state.push_log(format!(
        "ticker-desk started | polling every {}s | balance {}{:.2}",
        config.poll.interval_secs,
        config.wallet.currency_symbol,
        config.wallet.starting_balance
    ));
    let mut tracker: Option<TrackerHandle> = None;

    let result: Result<()> = async {
        loop {
            app_state.prune_notices(Instant::now());
            terminal.draw(|frame| ui::render(frame, &app_state))?;

            if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match handle_key(&key.code, &mut app_state) {
                        Some(KeyAction::Quit) => {
                            tracing::info!("User quit");
                            let _ = shutdown_tx.send(true);
                            break;
                        }
                        Some(KeyAction::StartTracker { symbol, generation }) => {
                            if let Some(old) = tracker.take() {
                                old.stop();
                            }
                            tracker = Some(spawn_tracker(
                                Arc::clone(&client),
                                symbol,
                                generation,
                                poll_settings.clone(),
                                app_tx.clone(),
                                shutdown_rx.clone(),
                            ));
                        }
                        Some(KeyAction::RequestTradeQuote(pending)) => {
                            spawn_trade_quote(
                                Arc::clone(&client),
                                pending.symbol,
                                pending.kind,
                                pending.token,
                                app_tx.clone(),
                            );
                        }
                        Some(KeyAction::ScheduleChatReply(text)) => {
                            schedule_chat_reply(text, chat_delay, app_tx.clone());
                        }
                        None => {}
                    }
                }
            }

            while let Ok(evt) = app_rx.try_recv() {
                app_state.apply(evt);
            }

            if *shutdown_rx.borrow() {
                break;
            }
        }
        Ok(())
    }
    .await;

    if let Some(handle) = tracker.take() {
        handle.stop();
    }
    ratatui::restore();
    tracing::info!(
        balance = app_state.ledger.balance(),
        realized_pnl = app_state.ledger.realized_pnl(),
        trades = app_state.ledger.trade_count(),
        "Shutdown complete"
    );
    println!("Goodbye! Check {} for details.", LOG_FILE);
    result
}
