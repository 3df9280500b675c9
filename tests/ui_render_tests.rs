use ratatui::backend::TestBackend;
use ratatui::Terminal;

use ticker_desk::config::Config;
use ticker_desk::content::LearningContent;
use ticker_desk::event::AppEvent;
use ticker_desk::model::news::NewsItem;
use ticker_desk::model::quote::Quote;
use ticker_desk::model::sample::Sample;
use ticker_desk::ui::{self, AppState, Tab};

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn state() -> AppState {
    let config = Config::from_toml_str(include_str!("../config/default.toml")).unwrap();
    AppState::new(&config, LearningContent::load().unwrap())
}

fn draw(state: &AppState) -> String {
    let backend = TestBackend::new(120, 40);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal
        .draw(|frame| ui::render(frame, state))
        .expect("render should succeed");
    buffer_text(&terminal)
}

fn quote(price: f64) -> Quote {
    Quote {
        symbol: "AAPL".to_string(),
        price,
        change: Some(1.25),
        change_pct: Some(0.67),
        high: None,
        low: None,
        open: None,
        prev_close: None,
        timestamp_s: 1_700_000_000,
    }
}

#[test]
fn trade_tab_renders_idle_dashboard() {
    let text = draw(&state());
    assert!(text.contains(" ticker-desk "));
    assert!(text.contains("F1 Trade"));
    assert!(text.contains("IDLE"));
    assert!(text.contains("No ticker tracked"));
    assert!(text.contains("Waiting for data"));
    assert!(text.contains("Paper Wallet"));
    assert!(text.contains("100000.00"));
    assert!(text.contains("No active investments"));
    assert!(text.contains("Latest News"));
    assert!(text.contains("No recent news"));
    assert!(text.contains("System Log"));
}

#[test]
fn trade_tab_renders_tracked_ticker_and_news() {
    let mut s = state();
    s.begin_tracking("aapl").unwrap();
    for (i, price) in [187.0, 187.4, 186.9].into_iter().enumerate() {
        s.apply(AppEvent::SampleReady {
            generation: s.current_generation(),
            symbol: "AAPL".to_string(),
            sample: Sample::new(format!("09:30:{:02}", i * 10), price, Some(187.0), None),
            quote: quote(price),
        });
    }
    s.apply(AppEvent::NewsReady {
        generation: s.current_generation(),
        symbol: "AAPL".to_string(),
        items: vec![NewsItem {
            headline: "Apple unveils new chips".to_string(),
            summary: String::new(),
            url: "https://example.com/apple".to_string(),
            source: "wire".to_string(),
            published_at: None,
        }],
    });

    let text = draw(&s);
    assert!(text.contains("AAPL"));
    assert!(text.contains("186.90"));
    assert!(!text.contains("Waiting for data"));
    assert!(text.contains("SMA(5)"));
    assert!(text.contains("Apple unveils new chips"));
    assert!(text.contains("No summary available."));
}

#[test]
fn learn_tab_renders_guide_and_faq() {
    let mut s = state();
    s.tab = Tab::Learn;
    let text = draw(&s);
    assert!(text.contains("Stock Basics"));
    assert!(text.contains("What Are Stocks?"));
    assert!(text.contains("Frequently Asked Questions"));
}

#[test]
fn quiz_tab_renders_first_question_then_summary() {
    let mut s = state();
    s.tab = Tab::Quiz;
    let text = draw(&s);
    assert!(text.contains("Stock Market Quiz"));
    assert!(text.contains("Question 1 of 5"));

    for _ in 0..s.quiz.total() {
        s.answer_quiz(0);
        s.next_quiz_question();
    }
    let text = draw(&s);
    assert!(text.contains("Quiz Completed!"));
    assert!(text.contains("out of 5"));
}

#[test]
fn chat_tab_renders_greeting_and_typing_indicator() {
    let mut s = state();
    s.tab = Tab::Chat;
    let text = draw(&s);
    assert!(text.contains("Stock Market Assistant"));
    assert!(text.contains("Assistant: Hi! I'm your Stock Market Assistant"));

    s.chat_input = "thanks".to_string();
    s.submit_chat().unwrap();
    let text = draw(&s);
    assert!(text.contains("You: thanks"));
    assert!(text.contains("Assistant is typing..."));
}
