//! Personality form builder.
//!
//! Holds a persona while it is being put together, including one pending
//! input per tag list (the text typed but not yet added).

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{
    generate_user_id, CommunicationStyle, ListField, Persona, Timestamp, User,
    DEFAULT_BACKGROUND, DEFAULT_SPEAKING_QUIRKS,
};

// ─────────────────────────────────────────────────────────────────
// Edit Outcomes
// ─────────────────────────────────────────────────────────────────

/// Why a list edit did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The input was empty or whitespace only
    EmptyInput,
    /// The index did not name an entry
    IndexOutOfRange,
}

/// Result of a tag-list edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEdit {
    /// Entry appended at this index
    Added { index: usize },
    /// Entry removed; carries the removed value
    Removed(String),
    /// Nothing changed
    Skipped(SkipReason),
}

impl ListEdit {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ListEdit::Skipped(_))
    }
}

// ─────────────────────────────────────────────────────────────────
// Form
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PendingInputs {
    interests: String,
    personality_traits: String,
    favorite_topics: String,
}

/// In-progress persona plus the username it will be registered under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalityForm {
    pub name: String,
    pub username: String,
    /// `None` until picked; falls back to casual and friendly on build.
    pub communication_style: Option<CommunicationStyle>,
    pub speaking_quirks: String,
    pub background: String,
    interests: Vec<String>,
    personality_traits: Vec<String>,
    favorite_topics: Vec<String>,
    pending: PendingInputs,
}

impl PersonalityForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed entries of a list field.
    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::Interests => &self.interests,
            ListField::PersonalityTraits => &self.personality_traits,
            ListField::FavoriteTopics => &self.favorite_topics,
        }
    }

    fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::Interests => &mut self.interests,
            ListField::PersonalityTraits => &mut self.personality_traits,
            ListField::FavoriteTopics => &mut self.favorite_topics,
        }
    }

    /// Text typed into a list's input but not yet added.
    pub fn pending(&self, field: ListField) -> &str {
        match field {
            ListField::Interests => &self.pending.interests,
            ListField::PersonalityTraits => &self.pending.personality_traits,
            ListField::FavoriteTopics => &self.pending.favorite_topics,
        }
    }

    fn pending_mut(&mut self, field: ListField) -> &mut String {
        match field {
            ListField::Interests => &mut self.pending.interests,
            ListField::PersonalityTraits => &mut self.pending.personality_traits,
            ListField::FavoriteTopics => &mut self.pending.favorite_topics,
        }
    }

    pub fn set_pending(&mut self, field: ListField, text: impl Into<String>) {
        *self.pending_mut(field) = text.into();
    }

    /// Append a trimmed entry to a list field.
    ///
    /// Blank input is skipped and leaves the pending text as it was. On
    /// success the field's pending input is cleared.
    pub fn add_list_item(&mut self, field: ListField, raw: &str) -> ListEdit {
        let value = raw.trim();
        if value.is_empty() {
            return ListEdit::Skipped(SkipReason::EmptyInput);
        }

        let list = self.list_mut(field);
        list.push(value.to_string());
        let index = list.len() - 1;
        self.pending_mut(field).clear();
        ListEdit::Added { index }
    }

    /// Add whatever is in the field's pending input.
    pub fn commit_pending(&mut self, field: ListField) -> ListEdit {
        let raw = self.pending(field).to_string();
        self.add_list_item(field, &raw)
    }

    /// Remove the entry at `index`, keeping the order of the rest.
    pub fn remove_list_item(&mut self, field: ListField, index: usize) -> ListEdit {
        let list = self.list_mut(field);
        if index >= list.len() {
            return ListEdit::Skipped(SkipReason::IndexOutOfRange);
        }
        ListEdit::Removed(list.remove(index))
    }

    /// Build the user record stamped with the current time.
    pub fn build(&self) -> Result<User> {
        self.build_at(Utc::now())
    }

    /// Build the user record as of `at`.
    ///
    /// Fails if name or username is blank. The form itself is never
    /// touched, so a failed build can be corrected and retried.
    pub fn build_at(&self, at: DateTime<Utc>) -> Result<User> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::missing_field("name"));
        }
        let username = self.username.trim();
        if username.is_empty() {
            return Err(Error::missing_field("username"));
        }

        let personality = Persona {
            name: name.to_string(),
            communication_style: self.communication_style.clone().unwrap_or_default(),
            interests: self.interests.clone(),
            personality_traits: self.personality_traits.clone(),
            favorite_topics: self.favorite_topics.clone(),
            speaking_quirks: or_default(&self.speaking_quirks, DEFAULT_SPEAKING_QUIRKS),
            background: or_default(&self.background, DEFAULT_BACKGROUND),
        };

        Ok(User {
            user_id: generate_user_id(at),
            username: username.to_string(),
            personality,
            created_at: Timestamp::from_datetime(at),
        })
    }

    /// Back to an empty form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::TimeZone;

    fn filled() -> PersonalityForm {
        let mut form = PersonalityForm::new();
        form.name = "Ada".into();
        form.username = "ada".into();
        form
    }

    #[test]
    fn test_add_trims_and_appends() {
        let mut form = PersonalityForm::new();
        for (i, raw) in ["hiking", "  chess  ", "\tjazz\n"].iter().enumerate() {
            let before = form.list(ListField::Interests).len();
            assert_eq!(form.add_list_item(ListField::Interests, raw), ListEdit::Added { index: i });
            assert_eq!(form.list(ListField::Interests).len(), before + 1);
            assert_eq!(form.list(ListField::Interests)[i], raw.trim());
        }
    }

    #[test]
    fn test_blank_input_is_skipped() {
        let mut form = PersonalityForm::new();
        form.set_pending(ListField::PersonalityTraits, "   ");
        assert_eq!(
            form.add_list_item(ListField::PersonalityTraits, ""),
            ListEdit::Skipped(SkipReason::EmptyInput)
        );
        assert_eq!(
            form.commit_pending(ListField::PersonalityTraits),
            ListEdit::Skipped(SkipReason::EmptyInput)
        );
        assert!(form.list(ListField::PersonalityTraits).is_empty());
        assert_eq!(form.pending(ListField::PersonalityTraits), "   ");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut form = PersonalityForm::new();
        form.add_list_item(ListField::FavoriteTopics, "AI");
        form.add_list_item(ListField::FavoriteTopics, "AI");
        assert_eq!(form.list(ListField::FavoriteTopics), ["AI", "AI"]);
    }

    #[test]
    fn test_commit_pending_clears_only_its_field() {
        let mut form = PersonalityForm::new();
        form.set_pending(ListField::Interests, "sailing");
        form.set_pending(ListField::FavoriteTopics, "weather");
        assert!(!form.commit_pending(ListField::Interests).is_skipped());
        assert_eq!(form.pending(ListField::Interests), "");
        assert_eq!(form.pending(ListField::FavoriteTopics), "weather");
    }

    #[test]
    fn test_add_then_remove_scenario() {
        let mut form = PersonalityForm::new();
        form.add_list_item(ListField::Interests, "hiking");
        form.add_list_item(ListField::Interests, "chess");
        assert_eq!(
            form.remove_list_item(ListField::Interests, 0),
            ListEdit::Removed("hiking".into())
        );
        assert_eq!(form.list(ListField::Interests), ["chess"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut form = PersonalityForm::new();
        for item in ["a", "b", "c", "d"] {
            form.add_list_item(ListField::PersonalityTraits, item);
        }
        form.remove_list_item(ListField::PersonalityTraits, 2);
        assert_eq!(form.list(ListField::PersonalityTraits), ["a", "b", "d"]);
    }

    #[test]
    fn test_remove_out_of_range_is_skipped() {
        let mut form = PersonalityForm::new();
        form.add_list_item(ListField::Interests, "x");
        assert_eq!(
            form.remove_list_item(ListField::Interests, 1),
            ListEdit::Skipped(SkipReason::IndexOutOfRange)
        );
        assert_eq!(form.list(ListField::Interests), ["x"]);
    }

    #[test]
    fn test_build_requires_name_and_username() {
        let cases = [("", "ada"), ("Ada", ""), ("", ""), ("  ", "ada")];
        for (name, username) in cases {
            let mut form = PersonalityForm::new();
            form.name = name.into();
            form.username = username.into();
            form.add_list_item(ListField::Interests, "math");
            let snapshot = form.clone();

            let err = form.build().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(form, snapshot);
        }
    }

    #[test]
    fn test_build_applies_defaults() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let user = filled().build_at(at).unwrap();

        assert_eq!(user.user_id, format!("user_{}", at.timestamp_millis()));
        assert_eq!(user.created_at.as_str(), "2024-05-01T10:00:00.000Z");
        assert_eq!(user.personality.communication_style.as_str(), "casual and friendly");
        assert_eq!(user.personality.speaking_quirks, "none");
        assert_eq!(user.personality.background, "general background");
    }

    #[test]
    fn test_build_keeps_set_values() {
        let mut form = filled();
        form.communication_style = Some(CommunicationStyle::WittyAndSarcastic);
        form.speaking_quirks = "says 'indeed' a lot".into();
        form.background = "mathematician".into();
        form.add_list_item(ListField::FavoriteTopics, "engines");

        let user = form.build().unwrap();
        assert_eq!(user.personality.communication_style, CommunicationStyle::WittyAndSarcastic);
        assert_eq!(user.personality.speaking_quirks, "says 'indeed' a lot");
        assert_eq!(user.personality.background, "mathematician");
        assert_eq!(user.personality.favorite_topics, vec!["engines"]);
    }

    #[test]
    fn test_reset() {
        let mut form = filled();
        form.add_list_item(ListField::Interests, "x");
        form.set_pending(ListField::FavoriteTopics, "y");
        form.reset();
        assert_eq!(form, PersonalityForm::default());
    }
}
