//! Unified error handling for the REVOX client
//!
//! This module provides the error system shared by the library and the CLI:
//! - Stable error codes for debugging and support
//! - HTTP failures classified by status
//! - The message precedence used for user-facing notifications
//! - Automatic conversions from common error types

use std::fmt;
use thiserror::Error;

use crate::validation::FieldError;

/// Unified Result type for all REVOX operations
pub type Result<T> = std::result::Result<T, RevoxError>;

/// Shown for 401 responses
pub const UNAUTHORIZED_MESSAGE: &str = "Your session has expired. Please sign in again.";
/// Shown for 403 responses
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";
/// Shown for 404 responses
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
/// Shown for 5xx responses
pub const SERVER_ERROR_MESSAGE: &str = "A server error occurred. Please try again later.";
/// Shown when the request timed out
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";

/// Error codes for REVOX operations
///
/// Each error has a unique code in the format `RXXX` where:
/// - R1XX: Session and authentication errors
/// - R2XX: Network and API errors
/// - R3XX: File and I/O errors
/// - R4XX: Configuration errors
/// - R5XX: Validation and input errors
/// - R8XX: UI and interaction errors
/// - R9XX: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Session (R1XX)
    /// R101: Authentication failed
    AuthenticationFailed,
    /// R102: Session expired
    SessionExpired,
    /// R103: No session
    SessionNotFound,
    /// R104: Token could not be decoded
    InvalidToken,

    // Network (R2XX)
    /// R201: HTTP request failed
    HttpError,
    /// R202: Connection timeout
    ConnectionTimeout,
    /// R203: Connection refused
    ConnectionRefused,
    /// R204: Server answered 401
    Unauthorized,
    /// R205: Server answered 403
    Forbidden,
    /// R206: Server answered 404
    NotFound,
    /// R207: Server answered 5xx
    ServerError,
    /// R208: Any other non-success status
    ApiError,
    /// R209: Response body could not be decoded
    InvalidResponse,

    // File/IO (R3XX)
    /// R301: File not found
    FileNotFound,
    /// R302: File read error
    FileReadError,
    /// R303: File write error
    FileWriteError,

    // Configuration (R4XX)
    /// R401: Configuration error
    ConfigError,
    /// R402: Invalid endpoint URL
    InvalidEndpoint,

    // Validation (R5XX)
    /// R501: Invalid input
    InvalidInput,
    /// R502: Validation failed
    ValidationFailed,

    // UI (R8XX)
    /// R801: Dialog error
    DialogError,
    /// R802: User cancelled
    UserCancelled,

    // Internal (R9XX)
    /// R901: Internal error
    InternalError,
    /// R902: Serialization error
    SerializationError,
    /// R903: Unexpected state
    UnexpectedState,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::AuthenticationFailed => 101,
            ErrorCode::SessionExpired => 102,
            ErrorCode::SessionNotFound => 103,
            ErrorCode::InvalidToken => 104,

            ErrorCode::HttpError => 201,
            ErrorCode::ConnectionTimeout => 202,
            ErrorCode::ConnectionRefused => 203,
            ErrorCode::Unauthorized => 204,
            ErrorCode::Forbidden => 205,
            ErrorCode::NotFound => 206,
            ErrorCode::ServerError => 207,
            ErrorCode::ApiError => 208,
            ErrorCode::InvalidResponse => 209,

            ErrorCode::FileNotFound => 301,
            ErrorCode::FileReadError => 302,
            ErrorCode::FileWriteError => 303,

            ErrorCode::ConfigError => 401,
            ErrorCode::InvalidEndpoint => 402,

            ErrorCode::InvalidInput => 501,
            ErrorCode::ValidationFailed => 502,

            ErrorCode::DialogError => 801,
            ErrorCode::UserCancelled => 802,

            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
            ErrorCode::UnexpectedState => 903,
        }
    }

    /// Get the string code (e.g., "R101")
    pub fn as_str(&self) -> String {
        format!("R{}", self.code())
    }

    /// Code for a non-success HTTP status
    pub fn for_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            500..=599 => ErrorCode::ServerError,
            _ => ErrorCode::ApiError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.code())
    }
}

/// Main error type for all REVOX operations
#[derive(Error, Debug)]
pub enum RevoxError {
    // ==================== Session Errors (R1XX) ====================
    /// Authentication failed
    #[error("[{code}] Authentication failed: {message}")]
    Authentication {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Missing, expired or unreadable persisted session
    #[error("[{code}] Session error: {message}")]
    Session { code: ErrorCode, message: String },

    // ==================== Network Errors (R2XX) ====================
    /// Transport-level failure
    #[error("[{code}] Network error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Non-success HTTP status, with the server's `message` when it sent one
    #[error("[{code}] HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Http {
        code: ErrorCode,
        status: u16,
        message: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("[{code}] Invalid response: {message}")]
    InvalidResponse { code: ErrorCode, message: String },

    // ==================== File/IO Errors (R3XX) ====================
    /// File or IO error
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ==================== Configuration Errors (R4XX) ====================
    /// Configuration error
    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    // ==================== Validation Errors (R5XX) ====================
    /// Form validation failed; the request never reached the network
    #[error("[{code}] Validation error: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        errors: Vec<FieldError>,
    },

    /// Invalid input error
    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    // ==================== UI Errors (R8XX) ====================
    /// UI/Dialog error
    #[error("[{code}] UI error: {message}")]
    Ui { code: ErrorCode, message: String },

    // ==================== Internal Errors (R9XX) ====================
    /// Internal/Unexpected error
    #[error("[{code}] Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    /// JSON serialization error
    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Timeout error
    #[error("[R202] Operation timed out")]
    Timeout,
}

// ==================== Constructor Methods ====================

impl RevoxError {
    // --- Session ---

    /// Create authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            code: ErrorCode::AuthenticationFailed,
            message: message.into(),
            source: None,
        }
    }

    /// Create "not signed in" error
    pub fn session_not_found() -> Self {
        Self::Session {
            code: ErrorCode::SessionNotFound,
            message: "Not signed in. Run `revox login` or `revox guest` first.".to_string(),
        }
    }

    /// Create invalid token error
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::Session {
            code: ErrorCode::InvalidToken,
            message: message.into(),
        }
    }

    // --- Network ---

    /// Create network error from message
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            code: ErrorCode::HttpError,
            message: message.into(),
            source: None,
        }
    }

    /// Create network error from reqwest error
    pub fn network_from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }

        let code = if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else {
            ErrorCode::HttpError
        };

        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create HTTP status error, classified by status
    pub fn http(status: u16, message: Option<String>) -> Self {
        Self::Http {
            code: ErrorCode::for_status(status),
            status,
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Create invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            code: ErrorCode::InvalidResponse,
            message: message.into(),
        }
    }

    // --- File/IO ---

    /// Create IO error with context
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            code: ErrorCode::FileReadError,
            context: context.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create IO error from std::io::Error
    pub fn io_from_error(context: impl Into<String>, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileWriteError,
            _ => ErrorCode::FileReadError,
        };

        Self::Io {
            code,
            context: context.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    // --- Configuration ---

    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration error with source
    pub fn config_from_error(err: config::ConfigError) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create invalid endpoint error
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::InvalidEndpoint,
            message: message.into(),
            source: None,
        }
    }

    // --- Validation ---

    /// Create validation error from per-field errors
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let message = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message,
            errors,
        }
    }

    /// Create invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    // --- UI ---

    /// Create UI error
    pub fn ui(message: impl Into<String>) -> Self {
        Self::Ui {
            code: ErrorCode::DialogError,
            message: message.into(),
        }
    }

    // --- Internal ---

    /// Create internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    /// Create unexpected state error
    pub fn unexpected_state(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::UnexpectedState,
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: message.into(),
            source: None,
        }
    }

    // --- Utility Methods ---

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Authentication { code, .. } => *code,
            Self::Session { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Http { code, .. } => *code,
            Self::InvalidResponse { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            Self::Ui { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
            Self::Timeout => ErrorCode::ConnectionTimeout,
        }
    }

    /// HTTP status, for errors that came from a server response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message sent by the server in the error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Check if the server rejected the bearer credential
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Check if a read may be retried after this error
    ///
    /// Client errors are final except request timeout (408) and rate
    /// limiting (429).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout => true,
            Self::Http { status, .. } => !(400..500).contains(status) || matches!(status, 408 | 429),
            _ => false,
        }
    }

    /// Text for a one-line failure notification
    ///
    /// The server's message wins; otherwise a fixed message for the status
    /// category; otherwise the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }

        match self {
            Self::Http { status: 401, .. } => UNAUTHORIZED_MESSAGE.to_string(),
            Self::Http { status: 403, .. } => FORBIDDEN_MESSAGE.to_string(),
            Self::Http { status: 404, .. } => NOT_FOUND_MESSAGE.to_string(),
            Self::Http { status: 500..=599, .. } => SERVER_ERROR_MESSAGE.to_string(),
            Self::Timeout => TIMEOUT_MESSAGE.to_string(),
            Self::Validation { message, .. } | Self::InvalidInput { message, .. } => {
                message.clone()
            }
            Self::Session { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

// ==================== From Implementations ====================

impl From<std::io::Error> for RevoxError {
    fn from(err: std::io::Error) -> Self {
        Self::io_from_error("IO operation", err)
    }
}

impl From<reqwest::Error> for RevoxError {
    fn from(err: reqwest::Error) -> Self {
        Self::network_from_reqwest(err)
    }
}

impl From<serde_json::Error> for RevoxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for RevoxError {
    fn from(err: config::ConfigError) -> Self {
        Self::config_from_error(err)
    }
}

impl From<dialoguer::Error> for RevoxError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Ui {
            code: ErrorCode::DialogError,
            message: format!("Dialog error: {}", err),
        }
    }
}

impl From<validator::ValidationErrors> for RevoxError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation(crate::validation::field_errors(&errors))
    }
}

// Manual Clone implementation that drops non-cloneable sources
impl Clone for RevoxError {
    fn clone(&self) -> Self {
        match self {
            Self::Authentication { code, message, .. } => Self::Authentication {
                code: *code,
                message: message.clone(),
                source: None,
            },
            Self::Session { code, message } => Self::Session {
                code: *code,
                message: message.clone(),
            },
            Self::Network { code, message, .. } => Self::Network {
                code: *code,
                message: message.clone(),
                source: None,
            },
            Self::Http {
                code,
                status,
                message,
            } => Self::Http {
                code: *code,
                status: *status,
                message: message.clone(),
            },
            Self::InvalidResponse { code, message } => Self::InvalidResponse {
                code: *code,
                message: message.clone(),
            },
            Self::Io {
                code,
                context,
                message,
                ..
            } => Self::Io {
                code: *code,
                context: context.clone(),
                message: message.clone(),
                source: None,
            },
            Self::Config { code, message, .. } => Self::Config {
                code: *code,
                message: message.clone(),
                source: None,
            },
            Self::Validation {
                code,
                message,
                errors,
            } => Self::Validation {
                code: *code,
                message: message.clone(),
                errors: errors.clone(),
            },
            Self::InvalidInput { code, message } => Self::InvalidInput {
                code: *code,
                message: message.clone(),
            },
            Self::Ui { code, message } => Self::Ui {
                code: *code,
                message: message.clone(),
            },
            Self::Internal { code, message } => Self::Internal {
                code: *code,
                message: message.clone(),
            },
            Self::Serialization { code, message, .. } => Self::Serialization {
                code: *code,
                message: message.clone(),
                source: None,
            },
            Self::Timeout => Self::Timeout,
        }
    }
}
