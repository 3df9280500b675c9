use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::chatbot::{ChatSession, Sender};

pub struct ChatView<'a> {
    session: &'a ChatSession,
    input: &'a str,
    editing: bool,
}

impl<'a> ChatView<'a> {
    pub fn new(session: &'a ChatSession, input: &'a str, editing: bool) -> Self {
        Self {
            session,
            input,
            editing,
        }
    }
}

impl Widget for ChatView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let mut lines: Vec<Line> = Vec::new();
        for msg in self.session.messages() {
            let (who, color) = match msg.sender {
                Sender::User => ("You", Color::Cyan),
                Sender::Bot => ("Assistant", Color::Green),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}: ", who),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(msg.text.clone()),
            ]));
        }
        if self.session.is_typing() {
            lines.push(Line::from(Span::styled(
                "Assistant is typing...",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let history = Block::default()
            .title(" Stock Market Assistant ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = history.inner(chunks[0]).height as usize;
        // Keep the newest messages in view; long ones may wrap past this estimate.
        let scroll = lines.len().saturating_sub(inner_height) as u16;
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((scroll, 0))
            .block(history)
            .render(chunks[0], buf);

        let (text, style) = if self.editing {
            (
                format!("{}_", self.input),
                Style::default().fg(Color::White),
            )
        } else if self.input.is_empty() {
            (
                "Press [I] to ask about stocks...".to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (self.input.to_string(), Style::default().fg(Color::Gray))
        };
        let input_block = Block::default()
            .title(" Message ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.editing {
                Color::Yellow
            } else {
                Color::DarkGray
            }));
        Paragraph::new(Span::styled(text, style))
            .block(input_block)
            .render(chunks[1], buf);
    }
}
