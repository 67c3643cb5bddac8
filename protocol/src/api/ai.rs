use serde::{Deserialize, Serialize};
use validator::Validate;

/// Minimum question length in characters
pub const MIN_QUESTION_LEN: u64 = 10;
/// Maximum question length in characters
pub const MAX_QUESTION_LEN: u64 = 1000;

/// AI question body (`POST /ai/user/{u}/bike/{b}/category/{c}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AiQuestionCreateRequest {
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Questions must be between 10 and 1000 characters"
    ))]
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_length_counts_characters() {
        let ok = AiQuestionCreateRequest {
            question: "チェーンの調整方法は？".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = AiQuestionCreateRequest {
            question: "Oil?".to_string(),
        };
        assert!(short.validate().is_err());

        let long = AiQuestionCreateRequest {
            question: "a".repeat(MAX_QUESTION_LEN as usize + 1),
        };
        assert!(long.validate().is_err());
    }
}
