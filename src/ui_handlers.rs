//! Key dispatch. Handlers mutate `AppState` directly and return the
//! background work the main loop has to start, if any.

use crossterm::event::KeyCode;

use crate::input::{
    parse_chat_command, parse_edit_command, parse_global_command, parse_guide_command,
    parse_quiz_command, parse_trade_command, ChatCommand, EditCommand, GlobalCommand,
    GuideCommand, QuizCommand, TradeCommand,
};
use crate::sequencer::Generation;
use crate::ui::{AppState, InputMode, PendingTrade, Tab};

const MAX_TICKER_INPUT: usize = 12;
const MAX_AMOUNT_INPUT: usize = 16;
const MAX_CHAT_INPUT: usize = 280;

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Quit,
    StartTracker {
        symbol: String,
        generation: Generation,
    },
    RequestTradeQuote(PendingTrade),
    ScheduleChatReply(String),
}

pub fn handle_key(key_code: &KeyCode, state: &mut AppState) -> Option<KeyAction> {
    if state.input_mode.is_editing() {
        let cmd = parse_edit_command(key_code)?;
        return handle_edit_command(cmd, state);
    }

    if let Some(cmd) = parse_global_command(key_code) {
        match cmd {
            GlobalCommand::Quit => return Some(KeyAction::Quit),
            GlobalCommand::SelectTab(tab) => state.tab = tab,
            GlobalCommand::NextTab => state.tab = state.tab.next(),
            GlobalCommand::PrevTab => state.tab = state.tab.prev(),
        }
        return None;
    }

    match state.tab {
        Tab::Trade => handle_trade_command(parse_trade_command(key_code)?, state),
        Tab::Learn => {
            handle_guide_command(parse_guide_command(key_code)?, state);
            None
        }
        Tab::Quiz => {
            handle_quiz_command(parse_quiz_command(key_code)?, state);
            None
        }
        Tab::Chat => match parse_chat_command(key_code)? {
            ChatCommand::StartTyping => {
                state.input_mode = InputMode::EditingChat;
                None
            }
        },
    }
}

fn start_tracking(state: &mut AppState) -> Option<KeyAction> {
    let raw = state.ticker_input.clone();
    match state.begin_tracking(&raw) {
        Ok((ticker, generation)) => Some(KeyAction::StartTracker {
            symbol: ticker.as_str().to_string(),
            generation,
        }),
        Err(e) => {
            state.reject(&e);
            None
        }
    }
}

fn handle_trade_command(cmd: TradeCommand, state: &mut AppState) -> Option<KeyAction> {
    match cmd {
        TradeCommand::EditTicker => state.input_mode = InputMode::EditingTicker,
        TradeCommand::EditAmount => state.input_mode = InputMode::EditingAmount,
        TradeCommand::StartTracking => return start_tracking(state),
        TradeCommand::Invest => match state.begin_invest() {
            Ok(pending) => {
                state.push_log(format!(
                    "Investing {:.2} in {}: fetching quote",
                    pending.amount, pending.symbol
                ));
                return Some(KeyAction::RequestTradeQuote(pending));
            }
            Err(e) => state.reject(&e),
        },
        TradeCommand::Sell => match state.begin_sell() {
            Ok(pending) => {
                state.push_log(format!("Selling {}: fetching quote", pending.symbol));
                return Some(KeyAction::RequestTradeQuote(pending));
            }
            Err(e) => state.reject(&e),
        },
        TradeCommand::ToggleSma => state.toggle_sma(),
        TradeCommand::ToggleEma => state.toggle_ema(),
        TradeCommand::CycleChartStyle => state.cycle_chart_style(),
    }
    None
}

fn accepts_char(mode: InputMode, current: &str, c: char) -> bool {
    match mode {
        InputMode::EditingTicker => {
            current.len() < MAX_TICKER_INPUT
                && (c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'))
        }
        InputMode::EditingAmount => {
            current.len() < MAX_AMOUNT_INPUT
                && (c.is_ascii_digit() || (c == '.' && !current.contains('.')))
        }
        InputMode::EditingChat => current.chars().count() < MAX_CHAT_INPUT && !c.is_control(),
        InputMode::Navigation => false,
    }
}

fn handle_edit_command(cmd: EditCommand, state: &mut AppState) -> Option<KeyAction> {
    let mode = state.input_mode;
    let field = match mode {
        InputMode::EditingTicker => &mut state.ticker_input,
        InputMode::EditingAmount => &mut state.amount_input,
        InputMode::EditingChat => &mut state.chat_input,
        InputMode::Navigation => return None,
    };
    match cmd {
        EditCommand::Insert(c) => {
            if accepts_char(mode, field, c) {
                if mode == InputMode::EditingTicker {
                    field.push(c.to_ascii_uppercase());
                } else {
                    field.push(c);
                }
            }
            None
        }
        EditCommand::Backspace => {
            field.pop();
            None
        }
        EditCommand::Cancel => {
            state.input_mode = InputMode::Navigation;
            None
        }
        EditCommand::Submit => match mode {
            InputMode::EditingTicker => {
                state.input_mode = InputMode::Navigation;
                start_tracking(state)
            }
            InputMode::EditingChat => state.submit_chat().map(KeyAction::ScheduleChatReply),
            _ => {
                state.input_mode = InputMode::Navigation;
                None
            }
        },
    }
}

fn handle_guide_command(cmd: GuideCommand, state: &mut AppState) {
    let guide = &mut state.guide_state;
    match cmd {
        GuideCommand::NextTab => guide.next_tab(),
        GuideCommand::PrevTab => guide.prev_tab(),
        GuideCommand::FaqNext => guide.select_faq_next(),
        GuideCommand::FaqPrev => guide.select_faq_prev(),
        GuideCommand::ToggleFaq => guide.toggle_selected_faq(),
        GuideCommand::ScrollUp => guide.scroll_up(),
        GuideCommand::ScrollDown => guide.scroll_down(),
    }
}

fn handle_quiz_command(cmd: QuizCommand, state: &mut AppState) {
    match cmd {
        QuizCommand::HighlightNext => state.quiz.highlight_next(),
        QuizCommand::HighlightPrev => state.quiz.highlight_prev(),
        QuizCommand::Choose(i) => state.answer_quiz(i),
        QuizCommand::Confirm => {
            if state.quiz.is_answered() {
                state.next_quiz_question();
            } else {
                let highlighted = state.quiz.highlighted();
                state.answer_quiz(highlighted);
            }
        }
        QuizCommand::Next => state.next_quiz_question(),
        QuizCommand::Restart => state.restart_quiz(),
    }
}
