use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::quiz::{AnswerOutcome, QuizSession};

pub struct QuizView<'a> {
    session: &'a QuizSession,
    feedback: Option<&'a AnswerOutcome>,
}

impl<'a> QuizView<'a> {
    pub fn new(session: &'a QuizSession, feedback: Option<&'a AnswerOutcome>) -> Self {
        Self { session, feedback }
    }
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Stock Market Quiz ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let total = self.session.total();
        let mut lines = Vec::new();

        match self.session.current() {
            None => {
                lines.push(Line::from(Span::styled(
                    "Quiz Completed!",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::default());
                lines.push(Line::from(format!(
                    "Your score: {} out of {}",
                    self.session.score(),
                    total
                )));
                lines.push(Line::from(self.session.verdict()));
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "Press [R] to try again",
                    Style::default().fg(Color::Yellow),
                )));
            }
            Some(question) => {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("Question {} of {}", self.session.position() + 1, total),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("   Score: {}", self.session.score()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    question.question.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::default());

                let selected = self.session.selected();
                for (i, option) in question.options.iter().enumerate() {
                    let is_correct = *option == question.correct;
                    let style = match selected {
                        Some(_) if is_correct => Style::default().fg(Color::Green),
                        Some(s) if s == i => Style::default().fg(Color::Red),
                        Some(_) => Style::default().fg(Color::DarkGray),
                        None if i == self.session.highlighted() => Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow),
                        None => Style::default().fg(Color::White),
                    };
                    lines.push(Line::from(Span::styled(
                        format!(" {}. {} ", i + 1, option),
                        style,
                    )));
                }

                if let Some(outcome) = self.feedback {
                    lines.push(Line::default());
                    let (text, color) = if outcome.correct {
                        ("Correct!".to_string(), Color::Green)
                    } else {
                        (
                            format!("Incorrect. The answer is: {}", outcome.correct_answer),
                            Color::Red,
                        )
                    };
                    lines.push(Line::from(Span::styled(
                        text,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(Span::styled(
                        question.explanation.clone(),
                        Style::default().fg(Color::Gray),
                    )));
                    let next = if self.session.position() + 1 < total {
                        "Press [N] for the next question"
                    } else {
                        "Press [N] to see your results"
                    };
                    lines.push(Line::from(Span::styled(
                        next,
                        Style::default().fg(Color::Yellow),
                    )));
                }
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
