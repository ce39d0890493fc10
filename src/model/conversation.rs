//! Server-produced conversations.
//!
//! The client only asks for conversations and reads them back; it never
//! edits a message.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Topic used when a conversation is requested without one.
pub const DEFAULT_TOPIC: &str = "general chat";

/// The two sides of a conversation as the service labels them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub user1: String,
    pub user2: String,
}

/// One line of a generated dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Persona display name.
    pub speaker: String,
    pub message: String,
    pub timestamp: Timestamp,
}

/// A stored conversation as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user1_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user2_id: Option<String>,

    pub participants: Participants,

    pub topic: String,

    pub created_at: Timestamp,

    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Whether `user_id` took part, by id when the service reported ids.
    pub fn involves(&self, user_id: &str) -> bool {
        self.user1_id.as_deref() == Some(user_id) || self.user2_id.as_deref() == Some(user_id)
    }

    /// First message, used for previews.
    pub fn opening_line(&self) -> Option<&Message> {
        self.messages.first()
    }
}

/// Body of `POST /api/conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRequest {
    pub user1_id: String,
    pub user2_id: String,
    pub topic: String,
}

impl ConversationRequest {
    /// Build a request, falling back to [`DEFAULT_TOPIC`] for a blank topic.
    pub fn new(user1_id: impl Into<String>, user2_id: impl Into<String>, topic: Option<&str>) -> Self {
        let topic = topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOPIC);
        Self {
            user1_id: user1_id.into(),
            user2_id: user2_id.into(),
            topic: topic.to_string(),
        }
    }
}

/// Immediate answer to a generation request.
///
/// Callers re-list conversations instead of rendering this directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedConversation {
    pub conversation_id: String,
    pub participants: Participants,
    #[serde(default)]
    pub messages: Vec<Message>,
}
