//! View models for the four screens.

use crate::config::DisplaySettings;
use crate::form::PersonalityForm;
use crate::model::{CommunicationStyle, Conversation, ListField, User};
use crate::session::{OperationKind, SessionState};

/// Cut `text` to at most `max_chars` characters, marking the cut with "...".
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", text[..end].trim_end()),
        None => text.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Home
// ─────────────────────────────────────────────────────────────────

/// One conversation on the home screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPreview {
    pub user1: String,
    pub user2: String,
    pub topic: String,
    /// Start of the opening line; `None` for an empty conversation
    pub opening: Option<String>,
}

impl ConversationPreview {
    fn new(conversation: &Conversation, preview_chars: usize) -> Self {
        Self {
            user1: conversation.participants.user1.clone(),
            user2: conversation.participants.user2.clone(),
            topic: conversation.topic.clone(),
            opening: conversation
                .opening_line()
                .map(|m| preview(&m.message, preview_chars)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    /// Display name of the session's clone, once created
    pub signed_in_as: Option<String>,
    /// First conversations as listed by the service
    pub recent: Vec<ConversationPreview>,
    pub total_conversations: usize,
}

impl HomeView {
    pub fn build(state: &SessionState, display: &DisplaySettings) -> Self {
        Self {
            signed_in_as: state.current_user.as_ref().map(|u| u.display_name().to_string()),
            recent: state
                .conversations
                .iter()
                .take(display.recent_conversations)
                .map(|c| ConversationPreview::new(c, display.preview_chars))
                .collect(),
            total_conversations: state.conversations.len(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Create
// ─────────────────────────────────────────────────────────────────

/// One tag list on the create screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSection {
    pub field: ListField,
    pub entries: Vec<String>,
    pub pending: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateView {
    pub name: String,
    pub username: String,
    /// Style that will be submitted, default applied
    pub communication_style: CommunicationStyle,
    pub style_chosen: bool,
    pub lists: Vec<ListSection>,
    pub speaking_quirks: String,
    pub background: String,
    pub submitting: bool,
}

impl CreateView {
    pub fn build(state: &SessionState) -> Self {
        let form: &PersonalityForm = &state.form;
        Self {
            name: form.name.clone(),
            username: form.username.clone(),
            communication_style: form.communication_style.clone().unwrap_or_default(),
            style_chosen: form.communication_style.is_some(),
            lists: ListField::all()
                .iter()
                .map(|&field| ListSection {
                    field,
                    entries: form.list(field).to_vec(),
                    pending: form.pending(field).to_string(),
                })
                .collect(),
            speaking_quirks: form.speaking_quirks.clone(),
            background: form.background.clone(),
            submitting: state.is_in_flight(OperationKind::SubmitPersona),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Explore
// ─────────────────────────────────────────────────────────────────

/// One directory entry on the explore screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub user_id: String,
    pub name: String,
    pub username: String,
    pub communication_style: String,
    /// Leading interests
    pub interests: Vec<String>,
    /// Interests not shown
    pub more_interests: usize,
    /// Whether "start conversation" is offered for this user
    pub can_converse: bool,
}

impl UserCard {
    fn new(user: &User, state: &SessionState, interest_preview: usize) -> Self {
        let interests = &user.personality.interests;
        let shown = interests.len().min(interest_preview);
        Self {
            user_id: user.user_id.clone(),
            name: user.personality.name.clone(),
            username: user.username.clone(),
            communication_style: user.personality.communication_style.as_str().to_string(),
            interests: interests[..shown].to_vec(),
            more_interests: interests.len() - shown,
            can_converse: state.can_converse_with(&user.user_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreView {
    pub cards: Vec<UserCard>,
    pub generating: bool,
}

impl ExploreView {
    pub fn build(state: &SessionState, display: &DisplaySettings) -> Self {
        Self {
            cards: state
                .users
                .iter()
                .map(|u| UserCard::new(u, state, display.interest_preview))
                .collect(),
            generating: state.is_in_flight(OperationKind::GenerateConversation),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Conversations
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub speaker: String,
    pub time: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub user1: String,
    pub user2: String,
    pub topic: String,
    pub date: String,
    pub lines: Vec<TranscriptLine>,
}

impl From<&Conversation> for Transcript {
    fn from(conversation: &Conversation) -> Self {
        Self {
            user1: conversation.participants.user1.clone(),
            user2: conversation.participants.user2.clone(),
            topic: conversation.topic.clone(),
            date: conversation.created_at.date_label(),
            lines: conversation
                .messages
                .iter()
                .map(|m| TranscriptLine {
                    speaker: m.speaker.clone(),
                    time: m.timestamp.time_label(),
                    message: m.message.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationsView {
    pub transcripts: Vec<Transcript>,
}

impl ConversationsView {
    pub fn build(state: &SessionState) -> Self {
        Self::from_conversations(&state.conversations)
    }

    pub fn from_conversations(conversations: &[Conversation]) -> Self {
        Self {
            transcripts: conversations.iter().map(Transcript::from).collect(),
        }
    }
}
