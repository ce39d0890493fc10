//! Error types for the aiclone client
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - A mapping onto the session's error taxonomy (validation, fetch,
//!   submit, generation) which decides how a failure is surfaced
//! - User-friendly suggestions and exit codes for the CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Transport errors (3xx)
    TransportFailed = 300,
    ServiceStatus = 301,

    // Response shape errors (4xx)
    ResponseMalformed = 400,

    // Local validation errors (5xx)
    MissingField = 500,
    ActionUnavailable = 501,
    OperationInFlight = 502,

    // Service operation errors (6xx)
    SubmitFailed = 601,
    GenerationFailed = 602,
    NotFound = 603,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            500..=599 => 50,
            600..=699 => 60,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a remote operation went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The request never produced a response (DNS, refused, reset, timeout)
    Transport(String),
    /// The service answered with a non-success status
    Status { code: u16, detail: String },
    /// The response body did not match the expected schema
    Malformed(String),
}

impl FailureCause {
    /// HTTP status, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FailureCause::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Status the service meant to send. Some handlers rewrap their own
    /// 4xx into a 500 whose detail reads `"<context>: 404: <detail>"`.
    pub fn effective_status(&self) -> Option<u16> {
        match self {
            FailureCause::Status { code: 500, detail } => wrapped_status(detail).or(Some(500)),
            other => other.status(),
        }
    }
}

fn wrapped_status(detail: &str) -> Option<u16> {
    detail
        .split(": ")
        .skip(1)
        .filter_map(|part| part.trim().parse::<u16>().ok())
        .find(|code| (400..500).contains(code))
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Transport(msg) => write!(f, "transport error: {}", msg),
            FailureCause::Status { code, detail } if detail.is_empty() => {
                write!(f, "service returned {}", code)
            }
            FailureCause::Status { code, detail } => {
                write!(f, "service returned {}: {}", code, detail)
            }
            FailureCause::Malformed(msg) => write!(f, "unexpected response shape: {}", msg),
        }
    }
}

/// The session-level taxonomy every error falls into.
///
/// The view controller decides how to surface a failure from this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local input problem; shown inline, nothing changes
    Validation,
    /// Read failure; logged, cached data kept
    Fetch,
    /// Persona submission failed; blocking notice
    Submit,
    /// Conversation generation failed; blocking notice
    Generation,
    /// Anything outside the session workflow (config, io, internal)
    Other,
}

/// Main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Local Validation
    // ─────────────────────────────────────────────────────────────

    /// A required persona field was left empty
    #[error("Please fill in {field}")]
    Validation { field: &'static str },

    /// The requested action is not available in the current session state
    #[error("Cannot {action}: {reason}")]
    ActionUnavailable { action: &'static str, reason: String },

    /// The same operation is already running
    #[error("{operation} is already in progress")]
    InFlight { operation: String },

    // ─────────────────────────────────────────────────────────────
    // Service Operations
    // ─────────────────────────────────────────────────────────────

    /// Reading from the service failed
    #[error("Failed to {operation}: {cause}")]
    Fetch { operation: &'static str, cause: FailureCause },

    /// Submitting a persona failed
    #[error("Error creating personality: {cause}")]
    Submit { cause: FailureCause },

    /// Requesting a conversation failed
    #[error("Error generating conversation: {cause}")]
    Generation { cause: FailureCause },

    /// The service has no record with this id
    #[error("{resource} not found")]
    NotFound { resource: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::Validation { .. } => ErrorCode::MissingField,
            Error::ActionUnavailable { .. } => ErrorCode::ActionUnavailable,
            Error::InFlight { .. } => ErrorCode::OperationInFlight,

            Error::Fetch { cause, .. } => match cause {
                FailureCause::Transport(_) => ErrorCode::TransportFailed,
                FailureCause::Status { .. } => ErrorCode::ServiceStatus,
                FailureCause::Malformed(_) => ErrorCode::ResponseMalformed,
            },
            Error::Submit { .. } => ErrorCode::SubmitFailed,
            Error::Generation { .. } => ErrorCode::GenerationFailed,
            Error::NotFound { .. } => ErrorCode::NotFound,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Map onto the session taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } | Error::ActionUnavailable { .. } | Error::InFlight { .. } => {
                ErrorKind::Validation
            }
            Error::Fetch { .. } | Error::NotFound { .. } => ErrorKind::Fetch,
            Error::Submit { .. } => ErrorKind::Submit,
            Error::Generation { .. } => ErrorKind::Generation,
            _ => ErrorKind::Other,
        }
    }

    /// The remote failure behind this error, if any
    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            Error::Fetch { cause, .. } | Error::Submit { cause } | Error::Generation { cause } => {
                Some(cause)
            }
            _ => None,
        }
    }

    /// Whether re-triggering the same action by hand may succeed.
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self.cause() {
            Some(FailureCause::Transport(_)) => true,
            Some(cause @ FailureCause::Status { .. }) => {
                cause.effective_status().map_or(false, |code| code >= 500)
            }
            _ => matches!(self, Error::InFlight { .. }),
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'aiclone config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'aiclone config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::Validation { .. } => Some(
                "Both name and username are required before a clone can be created."
            ),
            Error::Submit { cause } if cause.effective_status() == Some(400) => Some(
                "The service rejected the persona. Try a different username."
            ),
            Error::Fetch { cause: FailureCause::Transport(_), .. }
            | Error::Submit { cause: FailureCause::Transport(_) }
            | Error::Generation { cause: FailureCause::Transport(_) } => Some(
                "Check that the service is running and AICLONE_BACKEND_URL points at it."
            ),
            Error::Submit { .. } | Error::Generation { .. } => Some(
                "Please try again."
            ),
            Error::NotFound { .. } => Some(
                "Run 'aiclone users list' to see the ids known to the service."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            self.code().as_str(),
            self
        );

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a missing-field validation error
    pub fn missing_field(field: &'static str) -> Self {
        Error::Validation { field }
    }

    /// Create a fetch error
    pub fn fetch(operation: &'static str, cause: FailureCause) -> Self {
        Error::Fetch { operation, cause }
    }

    /// Create an action-unavailable error
    pub fn unavailable(action: &'static str, reason: impl Into<String>) -> Self {
        Error::ActionUnavailable {
            action,
            reason: reason.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
