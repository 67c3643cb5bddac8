//! Asking the AI and reading past answers
//!
//! The latest answer lives in a single slot. A valid submission puts a
//! placeholder there at once; the server's answer replaces it wholesale, and
//! a failure clears it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use revox_protocol::api::AiQuestionCreateRequest;
use revox_protocol::common::AiQuestion;

use super::{App, OperationKind, Outcome};
use crate::client::ApiClient;
use crate::error::Result;
use crate::query::QueryKey;
use crate::services::AiService;
use crate::validation;

/// What the AI page shows as the latest answer
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AiAnswerSlot {
    #[default]
    Idle,
    /// Submitted; holds the client-side placeholder
    Pending(AiQuestion),
    Resolved(AiQuestion),
    /// The last submission failed; nothing is shown
    Failed(String),
}

impl AiAnswerSlot {
    pub fn latest_answer(&self) -> Option<&AiQuestion> {
        match self {
            AiAnswerSlot::Pending(question) | AiAnswerSlot::Resolved(question) => Some(question),
            AiAnswerSlot::Idle | AiAnswerSlot::Failed(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AiAnswerSlot::Pending(_))
    }
}

/// The AI question form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AskQuestion {
    #[validate(range(min = 1, message = "Select a bike"))]
    pub bike_id: i64,
    #[validate(range(min = 1, message = "Select a category"))]
    pub category_id: i64,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Questions must be between 10 and 1000 characters"
    ))]
    pub question: String,
}

impl<C: ApiClient> App<C> {
    /// Ask a question about one bike in one category
    ///
    /// A second call while one is pending is skipped without a request.
    pub async fn ask_question(&self, form: &AskQuestion) -> Outcome<AiQuestion> {
        let kind = OperationKind::AskQuestion;
        let errors = validation::check(form);
        if !errors.is_empty() {
            return Outcome::Invalid(errors);
        }
        let user_id = match self.require_user(kind) {
            Ok(user) => user.id,
            Err(e) => return Outcome::Failed(e),
        };

        let Some(_guard) = self.mutations.begin(kind) else {
            tracing::debug!("A question is already pending, skipping");
            return Outcome::Skipped;
        };

        let placeholder = AiQuestion::placeholder(
            user_id,
            form.bike_id,
            form.category_id,
            form.question.as_str(),
            Utc::now(),
        );
        self.ai_slot
            .update(|slot| *slot = AiAnswerSlot::Pending(placeholder));

        let request = AiQuestionCreateRequest {
            question: form.question.clone(),
        };
        let result = AiService::new(&self.client)
            .ask(user_id, form.bike_id, form.category_id, &request)
            .await;

        match result {
            Ok(answered) => {
                self.ai_slot
                    .update(|slot| *slot = AiAnswerSlot::Resolved(answered.clone()));
                self.ai.add_question(answered.clone());
                self.queries.invalidate(&QueryKey::ai_questions(user_id));
                self.announce(kind);
                Outcome::Applied(answered)
            }
            Err(error) => {
                let message = error.user_message(kind.failure_message());
                self.ai_slot
                    .update(|slot| *slot = AiAnswerSlot::Failed(message));
                self.report(kind, &error);
                Outcome::Failed(error)
            }
        }
    }

    /// Every past question, newest first
    pub async fn load_history(&self) -> Result<Vec<AiQuestion>> {
        let kind = OperationKind::LoadHistory;
        let user_id = self.require_user(kind)?.id;
        let client = &self.client;

        self.ai.set_loading(true);
        let result = self
            .read(kind, QueryKey::ai_questions(user_id), move || async move {
                let mut questions = AiService::new(client).history(user_id).await?;
                questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Ok(questions)
            })
            .await;
        self.ai.set_loading(false);

        match result {
            Ok(questions) => {
                self.ai.set_questions(questions.clone());
                Ok(questions)
            }
            Err(e) => {
                self.ai.set_error(Some(e.user_message(kind.failure_message())));
                Err(e)
            }
        }
    }
}
