pub mod chart;
pub mod chat_view;
pub mod dashboard;
pub mod guide_view;
pub mod quiz_view;

use std::time::{Duration, Instant};

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::chatbot::{ChatSession, Chatbot};
use crate::config::{ChartStyle, Config};
use crate::content::LearningContent;
use crate::error::ValidationError;
use crate::event::{AppEvent, NoticeLevel, TradeKind, TradeOutcome};
use crate::guide::{Guide, GuideState};
use crate::ledger::{InvestReceipt, PaperLedger, SellReceipt};
use crate::model::news::NewsItem;
use crate::model::quote::Quote;
use crate::model::sample::Sample;
use crate::model::series::SeriesWindow;
use crate::model::ticker::Ticker;
use crate::quiz::{AnswerOutcome, QuizBank, QuizSession};
use crate::sequencer::{Generation, RequestSequencer};

use chart::PriceChart;
use chat_view::ChatView;
use dashboard::{
    InputBar, KeybindBar, LogPanel, NewsPanel, NoticeBar, StatusBar, TabBar, WalletPanel,
};
use guide_view::GuideView;
use quiz_view::QuizView;

const MAX_LOG_MESSAGES: usize = 200;
const MAX_NOTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Trade,
    Learn,
    Quiz,
    Chat,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Trade, Tab::Learn, Tab::Quiz, Tab::Chat];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Trade => "Trade",
            Tab::Learn => "Learn",
            Tab::Quiz => "Quiz",
            Tab::Chat => "Chat",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Trade => 0,
            Tab::Learn => 1,
            Tab::Quiz => 2,
            Tab::Chat => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Navigation,
    EditingTicker,
    EditingAmount,
    EditingChat,
}

impl InputMode {
    pub fn is_editing(self) -> bool {
        self != InputMode::Navigation
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub expires_at: Instant,
}

/// Trade waiting for its quote. Only one may be in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTrade {
    pub token: Generation,
    pub kind: TradeKind,
    pub symbol: String,
    pub amount: f64,
}

pub struct AppState {
    pub tab: Tab,
    pub input_mode: InputMode,
    pub ticker_input: String,
    pub amount_input: String,
    pub chat_input: String,

    pub tracked: Option<Ticker>,
    tracker_seq: RequestSequencer,
    pub series: SeriesWindow,
    pub news: Vec<NewsItem>,
    pub last_quote: Option<Quote>,
    pub poll_count: u64,
    pub last_poll_error: Option<String>,

    pub ledger: PaperLedger,
    trade_seq: RequestSequencer,
    pending_trade: Option<PendingTrade>,
    pub last_trade: Option<TradeOutcome>,
    pub currency_symbol: String,

    pub show_sma: bool,
    pub show_ema: bool,
    pub chart_style: ChartStyle,
    pub indicator_period: u32,
    pub poll_interval_secs: u64,

    notices: Vec<Notice>,
    notice_ttl: Duration,
    pub log_messages: Vec<String>,

    pub guide: Guide,
    pub guide_state: GuideState,
    pub quiz_bank: QuizBank,
    pub quiz: QuizSession,
    pub quiz_feedback: Option<AnswerOutcome>,
    pub chatbot: Chatbot,
    pub chat: ChatSession,
}

impl AppState {
    pub fn new(config: &Config, content: LearningContent) -> Self {
        let LearningContent {
            guide,
            quiz_bank,
            chatbot,
        } = content;
        let quiz = QuizSession::new(
            &quiz_bank,
            config.quiz.questions_per_round,
            &mut rand::thread_rng(),
        );
        Self {
            tab: Tab::Trade,
            input_mode: InputMode::Navigation,
            ticker_input: String::new(),
            amount_input: String::new(),
            chat_input: String::new(),
            tracked: None,
            tracker_seq: RequestSequencer::new(),
            series: SeriesWindow::new(config.ui.series_window),
            news: Vec::new(),
            last_quote: None,
            poll_count: 0,
            last_poll_error: None,
            ledger: PaperLedger::new(config.wallet.starting_balance),
            trade_seq: RequestSequencer::new(),
            pending_trade: None,
            last_trade: None,
            currency_symbol: config.wallet.currency_symbol.clone(),
            show_sma: config.ui.show_sma,
            show_ema: config.ui.show_ema,
            chart_style: config.ui.chart_style,
            indicator_period: config.finnhub.indicator_period,
            poll_interval_secs: config.poll.interval_secs,
            notices: Vec::new(),
            notice_ttl: Duration::from_millis(config.ui.notice_ttl_ms),
            log_messages: Vec::new(),
            guide_state: GuideState::new(&guide),
            guide,
            quiz_bank,
            quiz,
            quiz_feedback: None,
            chat: ChatSession::new(&chatbot),
            chatbot,
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        let tag = match level {
            NoticeLevel::Info => "",
            NoticeLevel::Success => "[OK] ",
            NoticeLevel::Error => "[ERR] ",
        };
        self.push_log(format!("{}{}", tag, text));
        self.notices.push(Notice {
            level,
            text,
            expires_at: Instant::now() + self.notice_ttl,
        });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    /// Surface a rejected action to the user.
    pub fn reject(&mut self, err: &ValidationError) {
        tracing::debug!(error = %err, "Action rejected");
        self.push_notice(NoticeLevel::Error, capitalize(&err.to_string()));
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn prune_notices(&mut self, now: Instant) {
        self.notices.retain(|n| n.expires_at > now);
    }

    pub fn current_generation(&self) -> Generation {
        self.tracker_seq.current()
    }

    pub fn pending_trade(&self) -> Option<&PendingTrade> {
        self.pending_trade.as_ref()
    }

    /// Latest known price of the tracked ticker.
    pub fn last_price(&self) -> Option<f64> {
        self.series
            .latest()
            .map(|s| s.price)
            .or_else(|| self.last_quote.as_ref().map(|q| q.price))
    }

    /// Price to mark the open position with, if it belongs to the tracked ticker.
    pub fn mark_price(&self) -> Option<f64> {
        let pos = self.ledger.position()?;
        let tracked = self.tracked.as_ref()?;
        if pos.symbol == tracked.as_str() {
            self.last_price()
        } else {
            None
        }
    }

    /// Switch tracking to `raw`. Everything collected for the previous ticker
    /// is dropped and its in-flight results, pending trade included, become stale.
    pub fn begin_tracking(&mut self, raw: &str) -> Result<(Ticker, Generation), ValidationError> {
        let ticker = Ticker::parse(raw)?;
        let generation = self.tracker_seq.advance();
        if let Some(cancelled) = self.pending_trade.take() {
            self.trade_seq.advance();
            tracing::info!(
                symbol = %cancelled.symbol,
                action = cancelled.kind.as_str(),
                "Pending trade cancelled by ticker switch"
            );
            self.push_notice(
                NoticeLevel::Info,
                format!(
                    "Pending {} for {} cancelled",
                    cancelled.kind.as_str(),
                    cancelled.symbol
                ),
            );
        }
        self.series.reset();
        self.news.clear();
        self.last_quote = None;
        self.last_poll_error = None;
        self.poll_count = 0;
        self.ticker_input = ticker.as_str().to_string();
        self.tracked = Some(ticker.clone());
        tracing::info!(symbol = %ticker, generation = generation.value(), "Tracking started");
        self.push_notice(NoticeLevel::Info, format!("Tracking {}", ticker));
        Ok((ticker, generation))
    }

    /// Returns false when the sample belongs to a superseded tracker.
    pub fn apply_sample(
        &mut self,
        generation: Generation,
        symbol: &str,
        sample: Sample,
        quote: Quote,
    ) -> bool {
        if !self.tracker_seq.is_current(generation) {
            tracing::debug!(symbol, generation = generation.value(), "Stale sample discarded");
            return false;
        }
        self.series.append(sample);
        self.last_quote = Some(quote);
        self.last_poll_error = None;
        self.poll_count += 1;
        true
    }

    fn parse_amount(&self) -> Result<f64, ValidationError> {
        let amount: f64 = self
            .amount_input
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidAmount)?;
        self.ledger.check_amount(amount)?;
        Ok(amount)
    }

    /// Validate an invest request and reserve the trade slot. The caller
    /// fetches a quote for the returned symbol and hands it to `complete_invest`.
    pub fn begin_invest(&mut self) -> Result<PendingTrade, ValidationError> {
        if self.pending_trade.is_some() {
            return Err(ValidationError::TradeInFlight);
        }
        let symbol = self
            .tracked
            .as_ref()
            .map(|t| t.as_str().to_string())
            .ok_or(ValidationError::NoTickerSelected)?;
        let amount = self.parse_amount()?;
        self.ledger.check_can_invest(amount)?;
        let pending = PendingTrade {
            token: self.trade_seq.advance(),
            kind: TradeKind::Invest,
            symbol,
            amount,
        };
        self.pending_trade = Some(pending.clone());
        Ok(pending)
    }

    pub fn begin_sell(&mut self) -> Result<PendingTrade, ValidationError> {
        if self.pending_trade.is_some() {
            return Err(ValidationError::TradeInFlight);
        }
        let pos = self.ledger.check_can_sell()?;
        let pending = PendingTrade {
            token: self.trade_seq.advance(),
            kind: TradeKind::Sell,
            symbol: pos.symbol.clone(),
            amount: pos.invested,
        };
        self.pending_trade = Some(pending.clone());
        Ok(pending)
    }

    fn take_pending(&mut self, token: Generation, kind: TradeKind) -> Option<PendingTrade> {
        let matches = self
            .pending_trade
            .as_ref()
            .is_some_and(|p| p.token == token && p.kind == kind);
        if matches && self.trade_seq.is_current(token) {
            self.pending_trade.take()
        } else {
            None
        }
    }

    /// `None` when the token no longer matches the pending trade.
    pub fn complete_invest(
        &mut self,
        token: Generation,
        quote: &Quote,
    ) -> Option<Result<InvestReceipt, ValidationError>> {
        let pending = self.take_pending(token, TradeKind::Invest)?;
        if !quote.is_tradable() {
            return Some(Err(ValidationError::InvalidQuote(quote.price)));
        }
        Some(self.ledger.invest(&pending.symbol, pending.amount, quote.price))
    }

    pub fn complete_sell(
        &mut self,
        token: Generation,
        quote: &Quote,
    ) -> Option<Result<SellReceipt, ValidationError>> {
        self.take_pending(token, TradeKind::Sell)?;
        if !quote.is_tradable() {
            return Some(Err(ValidationError::InvalidQuote(quote.price)));
        }
        Some(self.ledger.sell(quote.price))
    }

    fn report_invest(&mut self, result: Result<InvestReceipt, ValidationError>) {
        match result {
            Ok(receipt) => {
                self.amount_input.clear();
                self.push_notice(
                    NoticeLevel::Success,
                    format!(
                        "Invested {}{:.2} in {} at {:.2}",
                        self.currency_symbol, receipt.amount, receipt.symbol, receipt.entry_price
                    ),
                );
                self.last_trade = Some(TradeOutcome::Invested(receipt));
            }
            Err(e) => self.reject(&e),
        }
    }

    fn report_sell(&mut self, result: Result<SellReceipt, ValidationError>) {
        match result {
            Ok(receipt) => {
                let verb = if receipt.profit_loss >= 0.0 { "profit" } else { "loss" };
                self.push_notice(
                    NoticeLevel::Success,
                    format!(
                        "Sold {} at {:.2} with a {} of {}{:.2}",
                        receipt.symbol,
                        receipt.exit_price,
                        verb,
                        self.currency_symbol,
                        receipt.profit_loss.abs()
                    ),
                );
                self.last_trade = Some(TradeOutcome::Sold(receipt));
            }
            Err(e) => self.reject(&e),
        }
    }

    pub fn toggle_sma(&mut self) {
        self.show_sma = !self.show_sma;
    }

    pub fn toggle_ema(&mut self) {
        self.show_ema = !self.show_ema;
    }

    pub fn cycle_chart_style(&mut self) {
        self.chart_style = self.chart_style.next();
    }

    pub fn answer_quiz(&mut self, option_index: usize) {
        if let Some(outcome) = self.quiz.answer(option_index) {
            if outcome.correct {
                self.push_notice(NoticeLevel::Success, "Correct! Well done!");
            } else {
                self.push_notice(
                    NoticeLevel::Error,
                    format!("Incorrect. The correct answer is: {}", outcome.correct_answer),
                );
            }
            self.quiz_feedback = Some(outcome);
        }
    }

    pub fn next_quiz_question(&mut self) {
        if self.quiz.next() {
            self.quiz_feedback = None;
        }
    }

    pub fn restart_quiz(&mut self) {
        self.quiz.restart(&self.quiz_bank, &mut rand::thread_rng());
        self.quiz_feedback = None;
    }

    /// Record the chat input and return the reply to deliver after the typing delay.
    pub fn submit_chat(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.chat_input);
        self.chat.submit(&self.chatbot, &text)
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::SampleReady {
                generation,
                symbol,
                sample,
                quote,
            } => {
                self.apply_sample(generation, &symbol, sample, quote);
            }
            AppEvent::NewsReady {
                generation,
                symbol,
                items,
            } => {
                if self.tracker_seq.is_current(generation) {
                    self.news = items;
                } else {
                    tracing::debug!(symbol = %symbol, "Stale news discarded");
                }
            }
            AppEvent::PollFailed {
                generation,
                symbol,
                error,
            } => {
                if self.tracker_seq.is_current(generation) {
                    self.push_notice(
                        NoticeLevel::Error,
                        format!("Failed to fetch stock data for {}: {}", symbol, error),
                    );
                    self.last_poll_error = Some(error);
                }
            }
            AppEvent::TradeQuote { token, kind, quote } => match kind {
                TradeKind::Invest => {
                    if let Some(result) = self.complete_invest(token, &quote) {
                        self.report_invest(result);
                    }
                }
                TradeKind::Sell => {
                    if let Some(result) = self.complete_sell(token, &quote) {
                        self.report_sell(result);
                    }
                }
            },
            AppEvent::TradeFailed { token, kind, error } => {
                if self.take_pending(token, kind).is_some() {
                    self.push_notice(
                        NoticeLevel::Error,
                        format!("Failed to {}: {}", kind.as_str(), error),
                    );
                }
            }
            AppEvent::ChatReply { text } => {
                self.chat.receive_reply(text);
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // active tab
            Constraint::Length(1), // notices
            Constraint::Length(5), // system log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(TabBar { active: state.tab }, outer[0]);
    frame.render_widget(
        StatusBar {
            tracked: state.tracked.as_ref().map(|t| t.as_str()),
            last_price: state.last_price(),
            change_pct: state.last_quote.as_ref().and_then(|q| q.change_pct),
            poll_count: state.poll_count,
            poll_interval_secs: state.poll_interval_secs,
            trade_pending: state.pending_trade.is_some(),
        },
        outer[1],
    );

    match state.tab {
        Tab::Trade => render_trade(frame, state, outer[2]),
        Tab::Learn => frame.render_widget(
            GuideView::new(&state.guide, &state.guide_state),
            outer[2],
        ),
        Tab::Quiz => frame.render_widget(
            QuizView::new(&state.quiz, state.quiz_feedback.as_ref()),
            outer[2],
        ),
        Tab::Chat => frame.render_widget(
            ChatView::new(
                &state.chat,
                &state.chat_input,
                state.input_mode == InputMode::EditingChat,
            ),
            outer[2],
        ),
    }

    frame.render_widget(NoticeBar::new(&state.notices), outer[3]);
    frame.render_widget(LogPanel::new(&state.log_messages), outer[4]);
    frame.render_widget(
        KeybindBar {
            tab: state.tab,
            mode: state.input_mode,
        },
        outer[5],
    );
}

fn render_trade(frame: &mut Frame, state: &AppState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(columns[0]);

    frame.render_widget(
        InputBar {
            ticker: &state.ticker_input,
            amount: &state.amount_input,
            currency_symbol: &state.currency_symbol,
            mode: state.input_mode,
        },
        left[0],
    );

    let title = match &state.tracked {
        Some(t) => format!(" {} ({}) ", t, state.chart_style.label()),
        None => " No ticker tracked ".to_string(),
    };
    frame.render_widget(
        PriceChart::new(&state.series, &title)
            .show_sma(state.show_sma)
            .show_ema(state.show_ema)
            .style(state.chart_style)
            .period(state.indicator_period),
        left[1],
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(4)])
        .split(columns[1]);

    frame.render_widget(
        WalletPanel::new(&state.ledger, state.mark_price(), &state.currency_symbol),
        right[0],
    );
    frame.render_widget(NewsPanel::new(&state.news), right[1]);
}
