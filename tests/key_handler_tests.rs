use crossterm::event::KeyCode;

use ticker_desk::config::{ChartStyle, Config};
use ticker_desk::content::LearningContent;
use ticker_desk::event::TradeKind;
use ticker_desk::ui::{AppState, InputMode, Tab};
use ticker_desk::ui_handlers::{handle_key, KeyAction};

fn state() -> AppState {
    let config = Config::from_toml_str(include_str!("../config/default.toml")).unwrap();
    AppState::new(&config, LearningContent::load().unwrap())
}

fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        assert_eq!(handle_key(&KeyCode::Char(c), state), None);
    }
}

#[test]
fn typing_a_ticker_and_submitting_starts_a_tracker() {
    let mut s = state();
    assert_eq!(handle_key(&KeyCode::Char('t'), &mut s), None);
    assert_eq!(s.input_mode, InputMode::EditingTicker);

    // 'q' is text while editing, and invalid characters are dropped.
    type_text(&mut s, "q us!");
    assert_eq!(s.ticker_input, "QUS");
    handle_key(&KeyCode::Backspace, &mut s);
    handle_key(&KeyCode::Backspace, &mut s);
    handle_key(&KeyCode::Backspace, &mut s);
    type_text(&mut s, "aapl");

    let action = handle_key(&KeyCode::Enter, &mut s);
    assert_eq!(s.input_mode, InputMode::Navigation);
    match action {
        Some(KeyAction::StartTracker { symbol, generation }) => {
            assert_eq!(symbol, "AAPL");
            assert_eq!(generation, s.current_generation());
        }
        other => panic!("expected tracker start, got {:?}", other),
    }
}

#[test]
fn empty_ticker_submission_only_notifies() {
    let mut s = state();
    assert_eq!(handle_key(&KeyCode::Enter, &mut s), None);
    assert!(s.tracked.is_none());
    assert!(s
        .notices()
        .last()
        .unwrap()
        .text
        .contains("Please enter a stock ticker"));
}

#[test]
fn escape_cancels_editing() {
    let mut s = state();
    handle_key(&KeyCode::Char('a'), &mut s);
    assert_eq!(s.input_mode, InputMode::EditingAmount);
    handle_key(&KeyCode::Esc, &mut s);
    assert_eq!(s.input_mode, InputMode::Navigation);
}

#[test]
fn amount_field_accepts_one_decimal_point() {
    let mut s = state();
    handle_key(&KeyCode::Char('a'), &mut s);
    type_text(&mut s, "12x.5.0");
    assert_eq!(s.amount_input, "12.50");
    handle_key(&KeyCode::Enter, &mut s);
    assert_eq!(s.input_mode, InputMode::Navigation);
}

#[test]
fn invest_key_requests_a_trade_quote() {
    let mut s = state();
    s.ticker_input = "msft".to_string();
    handle_key(&KeyCode::Enter, &mut s);
    s.amount_input = "250".to_string();

    match handle_key(&KeyCode::Char('b'), &mut s) {
        Some(KeyAction::RequestTradeQuote(pending)) => {
            assert_eq!(pending.kind, TradeKind::Invest);
            assert_eq!(pending.symbol, "MSFT");
            assert_eq!(pending.amount, 250.0);
        }
        other => panic!("expected a trade quote request, got {:?}", other),
    }
    // A second press while the quote is in flight is rejected.
    assert_eq!(handle_key(&KeyCode::Char('b'), &mut s), None);
    assert!(s
        .notices()
        .last()
        .unwrap()
        .text
        .contains("still being processed"));
}

#[test]
fn sell_key_without_position_notifies() {
    let mut s = state();
    assert_eq!(handle_key(&KeyCode::Char('s'), &mut s), None);
    assert!(s
        .notices()
        .last()
        .unwrap()
        .text
        .contains("No active investments to sell"));
}

#[test]
fn chart_keys_toggle_overlays_and_style() {
    let mut s = state();
    handle_key(&KeyCode::Char('m'), &mut s);
    handle_key(&KeyCode::Char('e'), &mut s);
    handle_key(&KeyCode::Char('c'), &mut s);
    assert!(!s.show_sma);
    assert!(s.show_ema);
    assert_eq!(s.chart_style, ChartStyle::Bar);
}

#[test]
fn tab_keys_switch_views_and_q_quits() {
    let mut s = state();
    handle_key(&KeyCode::Tab, &mut s);
    assert_eq!(s.tab, Tab::Learn);
    handle_key(&KeyCode::BackTab, &mut s);
    handle_key(&KeyCode::BackTab, &mut s);
    assert_eq!(s.tab, Tab::Chat);
    handle_key(&KeyCode::F(3), &mut s);
    assert_eq!(s.tab, Tab::Quiz);
    assert_eq!(handle_key(&KeyCode::Char('q'), &mut s), Some(KeyAction::Quit));
}

#[test]
fn chat_submission_schedules_reply_and_keeps_typing() {
    let mut s = state();
    handle_key(&KeyCode::F(4), &mut s);
    handle_key(&KeyCode::Char('i'), &mut s);
    assert_eq!(s.input_mode, InputMode::EditingChat);

    type_text(&mut s, "Tell me about ETF");
    match handle_key(&KeyCode::Enter, &mut s) {
        Some(KeyAction::ScheduleChatReply(reply)) => {
            assert!(reply.starts_with("An Exchange-Traded Fund"))
        }
        other => panic!("expected a scheduled reply, got {:?}", other),
    }
    assert_eq!(s.input_mode, InputMode::EditingChat);
    assert!(s.chat_input.is_empty());

    // Blank messages are ignored.
    assert_eq!(handle_key(&KeyCode::Enter, &mut s), None);
}

#[test]
fn quiz_keys_answer_and_advance() {
    let mut s = state();
    handle_key(&KeyCode::F(3), &mut s);
    let total = s.quiz.total();
    assert_eq!(total, 5);

    for _ in 0..total {
        handle_key(&KeyCode::Char('1'), &mut s);
        assert!(s.quiz.is_answered());
        assert!(s.quiz_feedback.is_some());
        handle_key(&KeyCode::Enter, &mut s);
    }
    assert!(s.quiz.is_complete());

    handle_key(&KeyCode::Char('r'), &mut s);
    assert!(!s.quiz.is_complete());
    assert_eq!(s.quiz.score(), 0);
    assert!(s.quiz_feedback.is_none());
}

#[test]
fn guide_keys_move_between_sections_and_faqs() {
    let mut s = state();
    handle_key(&KeyCode::F(2), &mut s);
    handle_key(&KeyCode::Right, &mut s);
    assert_eq!(s.guide_state.tab(), 1);
    handle_key(&KeyCode::Down, &mut s);
    handle_key(&KeyCode::Enter, &mut s);
    assert!(s.guide_state.is_open(1));
    assert!(!s.guide_state.is_open(0));
}
