use crossterm::event::KeyCode;

use crate::ui::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalCommand {
    SelectTab(Tab),
    NextTab,
    PrevTab,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeCommand {
    EditTicker,
    StartTracking,
    EditAmount,
    Invest,
    Sell,
    ToggleSma,
    ToggleEma,
    CycleChartStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideCommand {
    NextTab,
    PrevTab,
    FaqNext,
    FaqPrev,
    ToggleFaq,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCommand {
    HighlightNext,
    HighlightPrev,
    Choose(usize),
    Confirm,
    Next,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    StartTyping,
}

/// Keys that apply on every tab while no text field is being edited.
pub fn parse_global_command(key_code: &KeyCode) -> Option<GlobalCommand> {
    match key_code {
        KeyCode::F(1) => Some(GlobalCommand::SelectTab(Tab::Trade)),
        KeyCode::F(2) => Some(GlobalCommand::SelectTab(Tab::Learn)),
        KeyCode::F(3) => Some(GlobalCommand::SelectTab(Tab::Quiz)),
        KeyCode::F(4) => Some(GlobalCommand::SelectTab(Tab::Chat)),
        KeyCode::Tab => Some(GlobalCommand::NextTab),
        KeyCode::BackTab => Some(GlobalCommand::PrevTab),
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'q') => Some(GlobalCommand::Quit),
        _ => None,
    }
}

pub fn parse_trade_command(key_code: &KeyCode) -> Option<TradeCommand> {
    match key_code {
        KeyCode::Enter => Some(TradeCommand::StartTracking),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            't' => Some(TradeCommand::EditTicker),
            'a' => Some(TradeCommand::EditAmount),
            'b' => Some(TradeCommand::Invest),
            's' => Some(TradeCommand::Sell),
            'm' => Some(TradeCommand::ToggleSma),
            'e' => Some(TradeCommand::ToggleEma),
            'c' => Some(TradeCommand::CycleChartStyle),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_edit_command(key_code: &KeyCode) -> Option<EditCommand> {
    match key_code {
        KeyCode::Enter => Some(EditCommand::Submit),
        KeyCode::Esc => Some(EditCommand::Cancel),
        KeyCode::Backspace => Some(EditCommand::Backspace),
        KeyCode::Char(c) => Some(EditCommand::Insert(*c)),
        _ => None,
    }
}

pub fn parse_guide_command(key_code: &KeyCode) -> Option<GuideCommand> {
    match key_code {
        KeyCode::Right => Some(GuideCommand::NextTab),
        KeyCode::Left => Some(GuideCommand::PrevTab),
        KeyCode::Down => Some(GuideCommand::FaqNext),
        KeyCode::Up => Some(GuideCommand::FaqPrev),
        KeyCode::Enter => Some(GuideCommand::ToggleFaq),
        KeyCode::PageUp => Some(GuideCommand::ScrollUp),
        KeyCode::PageDown => Some(GuideCommand::ScrollDown),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'l' => Some(GuideCommand::NextTab),
            'h' => Some(GuideCommand::PrevTab),
            'j' => Some(GuideCommand::FaqNext),
            'k' => Some(GuideCommand::FaqPrev),
            ' ' => Some(GuideCommand::ToggleFaq),
            'u' => Some(GuideCommand::ScrollUp),
            'd' => Some(GuideCommand::ScrollDown),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_quiz_command(key_code: &KeyCode) -> Option<QuizCommand> {
    match key_code {
        KeyCode::Down => Some(QuizCommand::HighlightNext),
        KeyCode::Up => Some(QuizCommand::HighlightPrev),
        KeyCode::Enter => Some(QuizCommand::Confirm),
        KeyCode::Char(c @ '1'..='9') => Some(QuizCommand::Choose(*c as usize - '1' as usize)),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'j' => Some(QuizCommand::HighlightNext),
            'k' => Some(QuizCommand::HighlightPrev),
            'n' => Some(QuizCommand::Next),
            'r' => Some(QuizCommand::Restart),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_chat_command(key_code: &KeyCode) -> Option<ChatCommand> {
    match key_code {
        KeyCode::Enter => Some(ChatCommand::StartTyping),
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'i') => Some(ChatCommand::StartTyping),
        _ => None,
    }
}
