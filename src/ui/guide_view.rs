use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::guide::{Guide, GuideState};

pub struct GuideView<'a> {
    guide: &'a Guide,
    state: &'a GuideState,
}

impl<'a> GuideView<'a> {
    pub fn new(guide: &'a Guide, state: &'a GuideState) -> Self {
        Self { guide, state }
    }

    fn section_lines(&self) -> Vec<Line<'a>> {
        let guide: &'a Guide = self.guide;
        let mut lines = Vec::new();
        let mut tabs = vec![];
        for (i, tab) in guide.tabs.iter().enumerate() {
            let style = if i == self.state.tab() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            tabs.push(Span::styled(format!(" {} ", tab.title), style));
            tabs.push(Span::raw(" "));
        }
        lines.push(Line::from(tabs));
        lines.push(Line::default());

        let Some(tab) = guide.tab(self.state.tab()) else {
            return lines;
        };
        for section in &tab.sections {
            lines.push(Line::from(Span::styled(
                section.title.as_str(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            if let Some(body) = &section.body {
                lines.push(Line::from(Span::raw(body.as_str())));
            }
            for (n, item) in section.items.iter().enumerate() {
                let bullet = if section.numbered {
                    format!(" {}. ", n + 1)
                } else {
                    " • ".to_string()
                };
                let mut spans = vec![Span::styled(bullet, Style::default().fg(Color::DarkGray))];
                if let Some(term) = &item.term {
                    spans.push(Span::styled(
                        format!("{}: ", term),
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                }
                spans.push(Span::raw(item.text.as_str()));
                lines.push(Line::from(spans));
            }
            lines.push(Line::default());
        }
        lines
    }

    fn faq_lines(&self) -> Vec<Line<'a>> {
        let guide: &'a Guide = self.guide;
        let mut lines = Vec::new();
        for (i, faq) in guide.faqs.iter().enumerate() {
            let open = self.state.is_open(i);
            let marker = if open { "▾ " } else { "▸ " };
            let style = if i == self.state.faq_selected() {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(faq.question.as_str(), style),
            ]));
            if open {
                lines.push(Line::from(Span::styled(
                    format!("  {}", faq.answer),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
        lines
    }
}

impl Widget for GuideView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        let guide_block = Block::default()
            .title(format!(" {} ", self.guide.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        Paragraph::new(self.section_lines())
            .wrap(Wrap { trim: false })
            .scroll((self.state.scroll(), 0))
            .block(guide_block)
            .render(chunks[0], buf);

        let faq_block = Block::default()
            .title(" Frequently Asked Questions ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        Paragraph::new(self.faq_lines())
            .wrap(Wrap { trim: true })
            .block(faq_block)
            .render(chunks[1], buf);
    }
}
