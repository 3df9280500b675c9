use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::mpsc;

use crate::event::{AppEvent, TradeKind};
use crate::market_data::MarketData;
use crate::model::quote::Quote;
use crate::sequencer::Generation;

/// Fresh quote for an invest/sell action. Unknown symbols are rejected here
/// so the ledger never sees a zero entry price.
pub async fn fetch_trade_quote<C: MarketData>(client: &C, symbol: &str) -> Result<Quote> {
    let quote = client.quote(symbol).await?;
    if !quote.is_tradable() {
        bail!("no quote data for {}", symbol);
    }
    Ok(quote)
}

/// Fetch the quote in the background and report back tagged with `token`.
pub fn spawn_trade_quote<C>(
    client: Arc<C>,
    symbol: String,
    kind: TradeKind,
    token: Generation,
    app_tx: mpsc::Sender<AppEvent>,
) where
    C: MarketData + 'static,
{
    tokio::spawn(async move {
        tracing::info!(symbol = %symbol, action = kind.as_str(), token = token.value(), "Trade quote requested");
        let event = match fetch_trade_quote(client.as_ref(), &symbol).await {
            Ok(quote) => AppEvent::TradeQuote { token, kind, quote },
            Err(e) => {
                tracing::error!(symbol = %symbol, action = kind.as_str(), error = %e, "Trade quote failed");
                AppEvent::TradeFailed {
                    token,
                    kind,
                    error: format!("{:#}", e),
                }
            }
        };
        if app_tx.send(event).await.is_err() {
            tracing::debug!("App channel closed before trade quote was delivered");
        }
    });
}
