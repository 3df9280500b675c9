use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRule {
    pub keywords: Vec<String>,
    pub reply: String,
}

impl ChatRule {
    fn matches(&self, query_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| query_lower.contains(k.to_lowercase().as_str()))
    }
}

/// Keyword-matched canned answers. Rules are tried in order.
#[derive(Debug, Clone, Deserialize)]
pub struct Chatbot {
    pub greeting: String,
    pub fallback: String,
    pub rules: Vec<ChatRule>,
}

impl Chatbot {
    pub fn validate(&self) -> Result<(), AppError> {
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(AppError::Content(format!("chat rule {} has no keywords", i)));
            }
            if rule.reply.trim().is_empty() {
                return Err(AppError::Content(format!("chat rule {} has an empty reply", i)));
            }
        }
        Ok(())
    }

    pub fn reply_for(&self, query: &str) -> &str {
        let q = query.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&q))
            .map(|r| r.reply.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: usize,
}

impl ChatSession {
    pub fn new(bot: &Chatbot) -> Self {
        Self {
            messages: vec![ChatMessage {
                sender: Sender::Bot,
                text: bot.greeting.clone(),
            }],
            pending: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Record the user's message and return the reply to deliver later.
    /// Blank input is ignored.
    pub fn submit(&mut self, bot: &Chatbot, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: text.to_string(),
        });
        self.pending += 1;
        Some(bot.reply_for(text).to_string())
    }

    pub fn receive_reply(&mut self, text: String) {
        self.pending = self.pending.saturating_sub(1);
        self.messages.push(ChatMessage {
            sender: Sender::Bot,
            text,
        });
    }

    pub fn is_typing(&self) -> bool {
        self.pending > 0
    }
}
