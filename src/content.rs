//! Built-in learning content, embedded at compile time and parsed on start-up.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::chatbot::Chatbot;
use crate::guide::Guide;
use crate::quiz::QuizBank;

const QUIZ_TOML: &str = include_str!("../content/quiz.toml");
const GUIDE_TOML: &str = include_str!("../content/guide.toml");
const CHATBOT_TOML: &str = include_str!("../content/chatbot.toml");

fn parse<T: DeserializeOwned>(name: &str, src: &str) -> Result<T> {
    toml::from_str(src).with_context(|| format!("failed to parse built-in {} content", name))
}

/// Everything the Learn, Quiz and Chat tabs need.
#[derive(Debug, Clone)]
pub struct LearningContent {
    pub guide: Guide,
    pub quiz_bank: QuizBank,
    pub chatbot: Chatbot,
}

impl LearningContent {
    pub fn load() -> Result<Self> {
        Ok(Self {
            guide: load_guide()?,
            quiz_bank: load_quiz_bank()?,
            chatbot: load_chatbot()?,
        })
    }
}

pub fn load_quiz_bank() -> Result<QuizBank> {
    let bank: QuizBank = parse("quiz", QUIZ_TOML)?;
    bank.validate().context("built-in quiz content is inconsistent")?;
    Ok(bank)
}

pub fn load_guide() -> Result<Guide> {
    parse("guide", GUIDE_TOML)
}

pub fn load_chatbot() -> Result<Chatbot> {
    let bot: Chatbot = parse("chatbot", CHATBOT_TOML)?;
    bot.validate().context("built-in chatbot content is inconsistent")?;
    Ok(bot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_content_parses() {
        let bank = load_quiz_bank().unwrap();
        assert_eq!(bank.len(), 30);

        let guide = load_guide().unwrap();
        assert_eq!(guide.tabs.len(), 3);
        assert_eq!(guide.faqs.len(), 5);

        let bot = load_chatbot().unwrap();
        assert_eq!(bot.rules.len(), 14);
    }
}
