use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o == &self.correct)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizBank {
    pub questions: Vec<QuizQuestion>,
}

impl QuizBank {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.questions.is_empty() {
            return Err(AppError::Content("quiz bank is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for q in &self.questions {
            if !seen.insert(q.id) {
                return Err(AppError::Content(format!("duplicate quiz id {}", q.id)));
            }
            if q.options.len() < 2 {
                return Err(AppError::Content(format!(
                    "quiz question {} needs at least two options",
                    q.id
                )));
            }
            if q.correct_index().is_none() {
                return Err(AppError::Content(format!(
                    "quiz question {}: correct answer '{}' is not one of its options",
                    q.id, q.correct
                )));
            }
        }
        Ok(())
    }

    /// `count` distinct questions in random order (fewer if the bank is smaller).
    pub fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<QuizQuestion> {
        let mut picked: Vec<QuizQuestion> = self
            .questions
            .choose_multiple(rng, count.min(self.questions.len()))
            .cloned()
            .collect();
        picked.shuffle(rng);
        picked
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    index: usize,
    highlighted: usize,
    selected: Option<usize>,
    score: usize,
    completed: bool,
}

impl QuizSession {
    pub fn new<R: Rng + ?Sized>(bank: &QuizBank, count: usize, rng: &mut R) -> Self {
        Self::from_questions(bank.draw(count, rng))
    }

    pub fn from_questions(questions: Vec<QuizQuestion>) -> Self {
        let completed = questions.is_empty();
        Self {
            questions,
            index: 0,
            highlighted: 0,
            selected: None,
            score: 0,
            completed,
        }
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, bank: &QuizBank, rng: &mut R) {
        let count = self.questions.len().max(1);
        *self = Self::new(bank, count, rng);
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        if self.completed {
            return None;
        }
        self.questions.get(self.index)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlight_next(&mut self) {
        if let Some(q) = self.current() {
            let n = q.options.len();
            if n > 0 && self.selected.is_none() {
                self.highlighted = (self.highlighted + 1) % n;
            }
        }
    }

    pub fn highlight_prev(&mut self) {
        if let Some(q) = self.current() {
            let n = q.options.len();
            if n > 0 && self.selected.is_none() {
                self.highlighted = (self.highlighted + n - 1) % n;
            }
        }
    }

    /// Lock in an answer for the current question. Only the first answer counts.
    pub fn answer(&mut self, option_index: usize) -> Option<AnswerOutcome> {
        if self.selected.is_some() {
            return None;
        }
        let question = self.current()?;
        if option_index >= question.options.len() {
            return None;
        }
        let correct = question.options[option_index] == question.correct;
        let correct_answer = question.correct.clone();
        self.selected = Some(option_index);
        self.highlighted = option_index;
        if correct {
            self.score += 1;
        }
        Some(AnswerOutcome {
            correct,
            correct_answer,
        })
    }

    /// Move past an answered question; completes the round after the last one.
    pub fn next(&mut self) -> bool {
        if self.completed || self.selected.is_none() {
            return false;
        }
        self.selected = None;
        self.highlighted = 0;
        if self.index + 1 < self.questions.len() {
            self.index += 1;
        } else {
            self.completed = true;
        }
        true
    }

    pub fn verdict(&self) -> &'static str {
        let total = self.questions.len();
        if self.score == total {
            "Perfect score! You really know your stocks!"
        } else if self.score * 2 >= total {
            "Great job! You've got a solid understanding of the stock market."
        } else {
            "Keep learning! The stock market has many concepts to master."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32) -> QuizQuestion {
        QuizQuestion {
            id,
            question: format!("Q{}", id),
            options: vec!["right".to_string(), "wrong".to_string()],
            correct: "right".to_string(),
            explanation: "because".to_string(),
        }
    }

    #[test]
    fn validate_rejects_unknown_correct_answer() {
        let mut q = question(1);
        q.correct = "missing".to_string();
        let bank = QuizBank { questions: vec![q] };
        assert!(matches!(bank.validate(), Err(AppError::Content(_))));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let bank = QuizBank {
            questions: vec![question(1), question(1)],
        };
        assert!(bank.validate().is_err());
    }

    #[test]
    fn verdict_thresholds() {
        let mut s = QuizSession::from_questions(vec![question(1), question(2)]);
        s.answer(1);
        s.next();
        s.answer(1);
        s.next();
        assert_eq!(s.score(), 0);
        assert!(s.verdict().starts_with("Keep learning"));

        let mut s = QuizSession::from_questions(vec![question(1), question(2)]);
        s.answer(0);
        s.next();
        s.answer(1);
        s.next();
        assert!(s.verdict().starts_with("Great job"));
    }
}
