use crate::error::ValidationError;

/// The single simulated investment held by the wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub symbol: String,
    /// Currency amount committed at entry.
    pub invested: f64,
    pub entry_price: f64,
    pub opened_at_ms: i64,
}

impl OpenPosition {
    /// Invested notional scaled by the fractional price move since entry.
    pub fn profit_loss_at(&self, price: f64) -> f64 {
        profit_loss(self.invested, self.entry_price, price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestReceipt {
    pub trade_id: String,
    pub symbol: String,
    pub amount: f64,
    pub entry_price: f64,
    pub balance_after: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellReceipt {
    pub trade_id: String,
    pub symbol: String,
    pub invested: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub profit_loss: f64,
    pub balance_after: f64,
}

pub fn profit_loss(invested: f64, entry_price: f64, exit_price: f64) -> f64 {
    (exit_price - entry_price) * (invested / entry_price)
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidQuote(price))
    }
}

/// Paper-trading wallet: one cash balance and at most one open position.
#[derive(Debug, Clone)]
pub struct PaperLedger {
    balance: f64,
    position: Option<OpenPosition>,
    realized_pnl: f64,
    trade_count: u32,
    winning_trades: u32,
    losing_trades: u32,
}

impl PaperLedger {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            balance: starting_balance,
            position: None,
            realized_pnl: 0.0,
            trade_count: 0,
            winning_trades: 0,
            losing_trades: 0,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn position(&self) -> Option<&OpenPosition> {
        self.position.as_ref()
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn trade_count(&self) -> u32 {
        self.trade_count
    }

    pub fn winning_trades(&self) -> u32 {
        self.winning_trades
    }

    pub fn losing_trades(&self) -> u32 {
        self.losing_trades
    }

    /// Amount checks that can run before a quote is fetched.
    pub fn check_amount(&self, amount: f64) -> Result<(), ValidationError> {
        if !amount.is_finite() || amount <= 0.0 || amount > self.balance {
            return Err(ValidationError::InvalidAmount);
        }
        Ok(())
    }

    pub fn check_can_invest(&self, amount: f64) -> Result<(), ValidationError> {
        if let Some(pos) = &self.position {
            return Err(ValidationError::PositionAlreadyOpen {
                symbol: pos.symbol.clone(),
            });
        }
        self.check_amount(amount)
    }

    pub fn check_can_sell(&self) -> Result<&OpenPosition, ValidationError> {
        self.position.as_ref().ok_or(ValidationError::NoOpenPosition)
    }

    pub fn invest(
        &mut self,
        symbol: &str,
        amount: f64,
        current_price: f64,
    ) -> Result<InvestReceipt, ValidationError> {
        if symbol.trim().is_empty() {
            return Err(ValidationError::NoTickerSelected);
        }
        self.check_can_invest(amount)?;
        validate_price(current_price)?;

        self.balance -= amount;
        self.position = Some(OpenPosition {
            symbol: symbol.to_string(),
            invested: amount,
            entry_price: current_price,
            opened_at_ms: chrono::Utc::now().timestamp_millis(),
        });
        let receipt = InvestReceipt {
            trade_id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.to_string(),
            amount,
            entry_price: current_price,
            balance_after: self.balance,
        };
        tracing::info!(
            trade_id = %receipt.trade_id,
            symbol,
            amount,
            entry_price = current_price,
            balance = self.balance,
            "Paper position opened"
        );
        Ok(receipt)
    }

    pub fn sell(&mut self, current_price: f64) -> Result<SellReceipt, ValidationError> {
        self.check_can_sell()?;
        validate_price(current_price)?;
        let Some(pos) = self.position.take() else {
            return Err(ValidationError::NoOpenPosition);
        };

        let pnl = pos.profit_loss_at(current_price);
        self.balance += pos.invested + pnl;
        self.realized_pnl += pnl;
        self.trade_count += 1;
        if pnl > 0.0 {
            self.winning_trades += 1;
        } else if pnl < 0.0 {
            self.losing_trades += 1;
        }

        let receipt = SellReceipt {
            trade_id: uuid::Uuid::new_v4().to_string(),
            symbol: pos.symbol,
            invested: pos.invested,
            entry_price: pos.entry_price,
            exit_price: current_price,
            profit_loss: pnl,
            balance_after: self.balance,
        };
        tracing::info!(
            trade_id = %receipt.trade_id,
            symbol = %receipt.symbol,
            exit_price = current_price,
            profit_loss = pnl,
            balance = self.balance,
            "Paper position closed"
        );
        Ok(receipt)
    }

    pub fn unrealized_pnl(&self, price: f64) -> Option<f64> {
        let pos = self.position.as_ref()?;
        if !price.is_finite() || price <= 0.0 {
            return None;
        }
        Some(pos.profit_loss_at(price))
    }

    /// Cash plus the marked-to-market value of the open position.
    pub fn equity(&self, price: Option<f64>) -> f64 {
        match &self.position {
            Some(pos) => {
                let pnl = price.and_then(|p| self.unrealized_pnl(p)).unwrap_or(0.0);
                self.balance + pos.invested + pnl
            }
            None => self.balance,
        }
    }

    pub fn win_rate_pct(&self) -> Option<f64> {
        if self.trade_count == 0 {
            return None;
        }
        Some(self.winning_trades as f64 * 100.0 / self.trade_count as f64)
    }
}
