//! Directory entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Persona, Timestamp};

/// A registered clone: a persona plus its identity.
///
/// Built once by the personality form and read-only afterwards; the client
/// never edits an existing user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Client-generated at creation, never changed.
    pub user_id: String,

    /// Unique by convention only; the client does not check it.
    pub username: String,

    pub personality: Persona,

    pub created_at: Timestamp,
}

impl User {
    /// Display name of the persona behind this user.
    pub fn display_name(&self) -> &str {
        &self.personality.name
    }
}

/// Time-based user id in the service's `user_<unix-millis>` form.
pub fn generate_user_id(at: DateTime<Utc>) -> String {
    format!("user_{}", at.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_user_id() {
        let at = Utc.timestamp_millis_opt(1_714_557_000_123).unwrap();
        assert_eq!(generate_user_id(at), "user_1714557000123");
    }

    #[test]
    fn test_deserialize_service_record() {
        let json = r#"{
            "user_id": "user_1",
            "username": "ada",
            "personality": {
                "name": "Ada",
                "communication_style": "thoughtful and analytical",
                "interests": ["math", "engines"],
                "personality_traits": [],
                "favorite_topics": ["computation"],
                "speaking_quirks": "none",
                "background": "general background"
            },
            "created_at": "2024-05-01T10:00:00.000Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.display_name(), "Ada");
        assert_eq!(user.personality.interests, vec!["math", "engines"]);
    }
}
