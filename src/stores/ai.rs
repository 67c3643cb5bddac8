use revox_protocol::common::AiQuestion;

use super::StateCell;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiState {
    /// Newest first
    pub questions: Vec<AiQuestion>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// AI question history
#[derive(Debug, Default)]
pub struct AiStore {
    state: StateCell<AiState>,
}

impl AiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AiState {
        self.state.snapshot()
    }

    pub fn questions(&self) -> Vec<AiQuestion> {
        self.state.read(|s| s.questions.clone())
    }

    pub fn set_questions(&self, questions: Vec<AiQuestion>) {
        self.state.update(|s| {
            s.questions = questions;
            s.error = None;
        });
    }

    /// Prepend an answered question, dropping any older copy with the same id
    pub fn add_question(&self, question: AiQuestion) {
        self.state.update(|s| {
            s.questions.retain(|q| q.id != question.id);
            s.questions.insert(0, question);
            s.error = None;
        });
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.update(|s| s.is_loading = loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.update(|s| s.error = error);
    }

    pub fn clear(&self) {
        self.state.update(|s| *s = AiState::default());
    }
}
