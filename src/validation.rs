//! Declarative form validation helpers
//!
//! Request types carry `validator` derives; this module flattens the
//! resulting `ValidationErrors` into a stable, ordered list for display.

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::error::{Result, RevoxError};

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten validator output, ordered by field name
///
/// Only the first failed rule per field is kept, matching how forms show a
/// single message under each input.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut flattened: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    flattened.sort_by(|a, b| a.field.cmp(&b.field));
    flattened
}

/// Run the declarative rules of `value`
pub fn validate<T: Validate>(value: &T) -> Result<()> {
    value.validate().map_err(RevoxError::from)
}

/// Run the rules and return the field errors, empty when valid
pub fn check<T: Validate>(value: &T) -> Vec<FieldError> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_errors(&errors),
    }
}
