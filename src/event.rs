use crate::ledger::{InvestReceipt, SellReceipt};
use crate::model::news::NewsItem;
use crate::model::quote::Quote;
use crate::model::sample::Sample;
use crate::sequencer::Generation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Invest,
    Sell,
}

impl TradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invest => "invest",
            Self::Sell => "sell",
        }
    }
}

/// Messages from background tasks to the state owner. Results of async work
/// carry the generation they were started under.
#[derive(Debug, Clone)]
pub enum AppEvent {
    SampleReady {
        generation: Generation,
        symbol: String,
        sample: Sample,
        quote: Quote,
    },
    NewsReady {
        generation: Generation,
        symbol: String,
        items: Vec<NewsItem>,
    },
    PollFailed {
        generation: Generation,
        symbol: String,
        error: String,
    },
    TradeQuote {
        token: Generation,
        kind: TradeKind,
        quote: Quote,
    },
    TradeFailed {
        token: Generation,
        kind: TradeKind,
        error: String,
    },
    ChatReply {
        text: String,
    },
    LogMessage(String),
}

/// Outcome of applying a trade quote, kept for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeOutcome {
    Invested(InvestReceipt),
    Sold(SellReceipt),
}
