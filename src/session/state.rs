//! Session state and user-facing notices.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, ErrorKind};
use crate::form::PersonalityForm;
use crate::model::{Conversation, User};

use super::{OperationKind, View};

/// How prominently a notice is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    /// Shown inline; the user fixes input and carries on
    Inline,
    /// Must be acknowledged before continuing
    Blocking,
}

/// The most recent message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// Notice for a failed action, or `None` when the failure is only logged.
    pub fn for_error(error: &Error) -> Option<Self> {
        let severity = match error.kind() {
            ErrorKind::Validation => Severity::Inline,
            ErrorKind::Submit | ErrorKind::Generation | ErrorKind::Other => Severity::Blocking,
            ErrorKind::Fetch => return None,
        };
        Some(Self {
            severity,
            message: error.to_string(),
        })
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Success => "ok",
            Severity::Inline => "!",
            Severity::Blocking => "error",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

/// Owned snapshot of everything a session holds
///
/// Lists are shared with the controller's cache; taking a snapshot never
/// copies them.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_view: View,
    pub current_user: Option<User>,
    pub users: Arc<Vec<User>>,
    pub conversations: Arc<Vec<Conversation>>,
    pub form: PersonalityForm,
    pub in_flight: Vec<OperationKind>,
    pub notice: Option<Notice>,
}

impl SessionState {
    pub fn is_in_flight(&self, kind: OperationKind) -> bool {
        self.in_flight.contains(&kind)
    }

    /// Whether the current user may start a conversation with `user_id`
    pub fn can_converse_with(&self, user_id: &str) -> bool {
        self.current_user
            .as_ref()
            .map(|me| me.user_id != user_id)
            .unwrap_or(false)
    }
}
