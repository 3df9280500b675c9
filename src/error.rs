use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("finnhub API error (status {status}): {msg}")]
    FinnhubApi { status: u16, msg: String },

    #[error("content error: {0}")]
    Content(String),
}

/// Rejections raised before any ledger or tracker state is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid ticker '{0}': expected 1-12 characters of A-Z, 0-9, '.', '-' or ':'")]
    InvalidTicker(String),

    #[error("please enter a stock ticker")]
    NoTickerSelected,

    #[error("please enter a valid investment amount")]
    InvalidAmount,

    #[error("no active investments to sell")]
    NoOpenPosition,

    #[error("a position in {symbol} is already open; sell it first")]
    PositionAlreadyOpen { symbol: String },

    #[error("quote price {0} cannot be traded")]
    InvalidQuote(f64),

    #[error("another trade is still being processed")]
    TradeInFlight,
}
