use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::{InputMode, Notice, Tab};
use crate::event::NoticeLevel;
use crate::ledger::PaperLedger;
use crate::model::news::NewsItem;

fn pnl_color(val: f64) -> Color {
    if val > 0.0 {
        Color::Green
    } else if val < 0.0 {
        Color::Red
    } else {
        Color::White
    }
}

pub struct TabBar {
    pub active: Tab,
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            " ticker-desk ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )];
        for (i, tab) in Tab::ALL.iter().enumerate() {
            let style = if *tab == self.active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(" ", Style::default()));
            spans.push(Span::styled(format!(" F{} {} ", i + 1, tab.title()), style));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

pub struct StatusBar<'a> {
    pub tracked: Option<&'a str>,
    pub last_price: Option<f64>,
    pub change_pct: Option<f64>,
    pub poll_count: u64,
    pub poll_interval_secs: u64,
    pub trade_pending: bool,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![match self.tracked {
            Some(symbol) => Span::styled(
                format!(" {} ", symbol),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(" IDLE ", Style::default().fg(Color::DarkGray)),
        }];

        if let Some(price) = self.last_price {
            spans.push(sep());
            spans.push(Span::styled(
                format!("{:.2}", price),
                Style::default().fg(Color::White),
            ));
            if let Some(pct) = self.change_pct {
                spans.push(Span::styled(
                    format!(" ({:+.2}%)", pct),
                    Style::default().fg(pnl_color(pct)),
                ));
            }
        }

        spans.push(sep());
        spans.push(Span::styled(
            format!("polls: {} every {}s", self.poll_count, self.poll_interval_secs),
            Style::default().fg(Color::DarkGray),
        ));

        if self.trade_pending {
            spans.push(sep());
            spans.push(Span::styled(
                "TRADE PENDING",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

pub struct InputBar<'a> {
    pub ticker: &'a str,
    pub amount: &'a str,
    pub currency_symbol: &'a str,
    pub mode: InputMode,
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let field = |label: &'static str, value: String, active: bool| {
            let value_style = if active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let cursor = if active { "_" } else { "" };
            vec![
                Span::styled(label, Style::default().fg(Color::DarkGray)),
                Span::styled(format!(" {}{} ", value, cursor), value_style),
            ]
        };

        let ticker = if self.ticker.is_empty() && self.mode != InputMode::EditingTicker {
            "e.g. AAPL".to_string()
        } else {
            self.ticker.to_string()
        };
        let mut spans = field("[t] Ticker:", ticker, self.mode == InputMode::EditingTicker);
        spans.push(Span::raw("   "));
        spans.extend(field(
            "[a] Amount:",
            format!("{}{}", self.currency_symbol, self.amount),
            self.mode == InputMode::EditingAmount,
        ));

        let block = Block::default()
            .title(" Stock ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}

pub struct WalletPanel<'a> {
    ledger: &'a PaperLedger,
    mark_price: Option<f64>,
    currency_symbol: &'a str,
}

impl<'a> WalletPanel<'a> {
    pub fn new(ledger: &'a PaperLedger, mark_price: Option<f64>, currency_symbol: &'a str) -> Self {
        Self {
            ledger,
            mark_price,
            currency_symbol,
        }
    }
}

impl Widget for WalletPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cur = self.currency_symbol;
        let label = |s: &'static str| Span::styled(s, Style::default().fg(Color::DarkGray));
        let value = |s: String| Span::styled(s, Style::default().fg(Color::White));

        let mut lines = vec![Line::from(vec![
            label("Balance:  "),
            Span::styled(
                format!("{}{:.2}", cur, self.ledger.balance()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ])];

        match self.ledger.position() {
            Some(pos) => {
                lines.push(Line::from(vec![
                    label("Position: "),
                    Span::styled(pos.symbol.clone(), Style::default().fg(Color::Cyan)),
                ]));
                lines.push(Line::from(vec![
                    label("Invested: "),
                    value(format!("{}{:.2}", cur, pos.invested)),
                ]));
                lines.push(Line::from(vec![
                    label("Entry:    "),
                    value(format!("{:.2}", pos.entry_price)),
                ]));
                let unrealized = self.mark_price.map(|p| pos.profit_loss_at(p));
                lines.push(Line::from(vec![
                    label("UnrPL:    "),
                    match unrealized {
                        Some(pnl) => Span::styled(
                            format!("{}{:+.2}", cur, pnl),
                            Style::default().fg(pnl_color(pnl)),
                        ),
                        None => value("---".to_string()),
                    },
                ]));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "No active investments",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        let realized = self.ledger.realized_pnl();
        lines.push(Line::from(vec![
            label("RlzPL:    "),
            Span::styled(
                format!("{}{:+.2}", cur, realized),
                Style::default().fg(pnl_color(realized)),
            ),
        ]));
        let win_rate = self
            .ledger
            .win_rate_pct()
            .map(|w| format!("{:.0}%", w))
            .unwrap_or_else(|| "---".to_string());
        lines.push(Line::from(vec![
            label("Trades:   "),
            value(format!(
                "{} (W {} / L {}, {})",
                self.ledger.trade_count(),
                self.ledger.winning_trades(),
                self.ledger.losing_trades(),
                win_rate
            )),
        ]));

        let block = Block::default()
            .title(" Paper Wallet ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct NewsPanel<'a> {
    items: &'a [NewsItem],
}

impl<'a> NewsPanel<'a> {
    pub fn new(items: &'a [NewsItem]) -> Self {
        Self { items }
    }
}

impl Widget for NewsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = Vec::new();
        if self.items.is_empty() {
            lines.push(Line::from(Span::styled(
                "No recent news",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for item in self.items {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", item.date_label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    item.headline.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                item.summary_or_placeholder().to_string(),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                item.url.clone(),
                Style::default().fg(Color::Blue),
            )));
        }

        let block = Block::default()
            .title(" Latest News ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

pub struct NoticeBar<'a> {
    notices: &'a [Notice],
}

impl<'a> NoticeBar<'a> {
    pub fn new(notices: &'a [Notice]) -> Self {
        Self { notices }
    }
}

impl Widget for NoticeBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(notice) = self.notices.last() else {
            return;
        };
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        let line = Line::from(Span::styled(
            format!(" {} ", notice.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let visible = block.inner(area).height as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|m| {
                let color = if m.starts_with("[ERR]") {
                    Color::Red
                } else if m.starts_with("[WARN]") {
                    Color::Yellow
                } else if m.starts_with("[OK]") {
                    Color::Green
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(m.clone(), Style::default().fg(color)))
            })
            .collect();
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar {
    pub tab: Tab,
    pub mode: InputMode,
}

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let keys: &[(&str, &str)] = if self.mode.is_editing() {
            &[("[Enter]", " submit  "), ("[Esc]", " cancel  ")]
        } else {
            match self.tab {
                Tab::Trade => &[
                    ("[T]", "icker  "),
                    ("[Enter]", " track  "),
                    ("[A]", "mount  "),
                    ("[B]", "uy  "),
                    ("[S]", "ell  "),
                    ("[M]", " SMA  "),
                    ("[E]", "MA  "),
                    ("[C]", "hart  "),
                    ("[Q]", "uit  "),
                ],
                Tab::Learn => &[
                    ("[←/→]", " section  "),
                    ("[↑/↓]", " FAQ  "),
                    ("[Enter]", " expand  "),
                    ("[PgUp/PgDn]", " scroll  "),
                    ("[Q]", "uit  "),
                ],
                Tab::Quiz => &[
                    ("[1-4]", " answer  "),
                    ("[↑/↓]", " select  "),
                    ("[Enter]", " confirm  "),
                    ("[N]", "ext  "),
                    ("[R]", "estart  "),
                    ("[Q]", "uit  "),
                ],
                Tab::Chat => &[("[I]", "/Enter type  "), ("[Q]", "uit  ")],
            }
        };

        let mut spans = vec![Span::raw(" ")];
        for (key, desc) in keys {
            spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(*desc, Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled("[Tab]", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(" next tab", Style::default().fg(Color::DarkGray)));
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
