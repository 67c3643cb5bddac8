//! Operation kinds and what an operation can end in

use crate::error::{Result, RevoxError};
use crate::validation::FieldError;

/// Every user-triggered operation, reads included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    GoogleLogin,
    GuestLogin,
    UpdateProfile,
    DeleteAccount,
    LoadBikes,
    LoadBike,
    CreateBike,
    UpdateBike,
    DeleteBike,
    LoadCategories,
    LoadTasks,
    LoadLatestTasks,
    CreateTask,
    UpdateTask,
    DeleteTask,
    LoadHistory,
    AskQuestion,
}

impl OperationKind {
    /// Notification shown when the operation succeeds; reads stay quiet
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            OperationKind::GoogleLogin => Some("Signed in"),
            OperationKind::GuestLogin => Some("Signed in as guest"),
            OperationKind::UpdateProfile => Some("Profile updated"),
            OperationKind::DeleteAccount => Some("Account deleted"),
            OperationKind::CreateBike => Some("Bike registered"),
            OperationKind::UpdateBike => Some("Bike updated"),
            OperationKind::DeleteBike => Some("Bike deleted"),
            OperationKind::CreateTask => Some("Maintenance task created"),
            OperationKind::UpdateTask => Some("Maintenance task updated"),
            OperationKind::DeleteTask => Some("Maintenance task deleted"),
            OperationKind::AskQuestion => Some("Question sent to the AI"),
            OperationKind::LoadBikes
            | OperationKind::LoadBike
            | OperationKind::LoadCategories
            | OperationKind::LoadTasks
            | OperationKind::LoadLatestTasks
            | OperationKind::LoadHistory => None,
        }
    }

    /// Fallback text when neither the server nor the status says more
    pub fn failure_message(&self) -> &'static str {
        match self {
            OperationKind::GoogleLogin => "Sign-in failed",
            OperationKind::GuestLogin => "Guest sign-in failed",
            OperationKind::UpdateProfile => "Failed to update profile",
            OperationKind::DeleteAccount => "Failed to delete account",
            OperationKind::LoadBikes => "Failed to load bikes",
            OperationKind::LoadBike => "Failed to load bike",
            OperationKind::CreateBike => "Failed to register bike",
            OperationKind::UpdateBike => "Failed to update bike",
            OperationKind::DeleteBike => "Failed to delete bike",
            OperationKind::LoadCategories => "Failed to load categories",
            OperationKind::LoadTasks | OperationKind::LoadLatestTasks => {
                "Failed to load maintenance tasks"
            }
            OperationKind::CreateTask => "Failed to create maintenance task",
            OperationKind::UpdateTask => "Failed to update maintenance task",
            OperationKind::DeleteTask => "Failed to delete maintenance task",
            OperationKind::LoadHistory => "Failed to load AI history",
            OperationKind::AskQuestion => "Failed to ask the AI",
        }
    }

    pub fn is_read(&self) -> bool {
        self.success_message().is_none()
    }
}

/// How a mutating operation ended
#[derive(Debug)]
pub enum Outcome<T> {
    /// The server accepted it and local state now reflects the response
    Applied(T),
    /// The same kind was already in flight; nothing was sent
    Skipped,
    /// Input failed validation; nothing was sent
    Invalid(Vec<FieldError>),
    /// The call failed; local state is unchanged
    Failed(RevoxError),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Applied(value) => Outcome::Applied(f(value)),
            Outcome::Skipped => Outcome::Skipped,
            Outcome::Invalid(errors) => Outcome::Invalid(errors),
            Outcome::Failed(error) => Outcome::Failed(error),
        }
    }

    /// Collapse into a `Result` for callers that only care about success
    pub fn into_result(self) -> Result<T> {
        match self {
            Outcome::Applied(value) => Ok(value),
            Outcome::Skipped => Err(RevoxError::unexpected_state(
                "The same operation is already in progress",
            )),
            Outcome::Invalid(errors) => Err(RevoxError::validation(errors)),
            Outcome::Failed(error) => Err(error),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Applied(value),
            Err(RevoxError::Validation { errors, .. }) => Outcome::Invalid(errors),
            Err(error) => Outcome::Failed(error),
        }
    }
}
