//! Persona ("personality") records.
//!
//! A persona is the structured description a clone is generated from. The
//! service stores it as plain JSON strings, so every field here round-trips
//! to exactly the wire value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Quirks value used when the form leaves the field blank.
pub const DEFAULT_SPEAKING_QUIRKS: &str = "none";

/// Background value used when the form leaves the field blank.
pub const DEFAULT_BACKGROUND: &str = "general background";

// ─────────────────────────────────────────────────────────────────
// Communication Style
// ─────────────────────────────────────────────────────────────────

/// How a persona usually talks.
///
/// The form offers a fixed set of styles. Records coming back from the
/// service may carry any string, which is kept verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommunicationStyle {
    CasualAndFriendly,
    ProfessionalAndFormal,
    WittyAndSarcastic,
    EnthusiasticAndEnergetic,
    ThoughtfulAndAnalytical,
    WarmAndEmpathetic,
    Custom(String),
}

impl CommunicationStyle {
    /// The wire value stored by the service.
    pub fn as_str(&self) -> &str {
        match self {
            CommunicationStyle::CasualAndFriendly => "casual and friendly",
            CommunicationStyle::ProfessionalAndFormal => "professional and formal",
            CommunicationStyle::WittyAndSarcastic => "witty and sarcastic",
            CommunicationStyle::EnthusiasticAndEnergetic => "enthusiastic and energetic",
            CommunicationStyle::ThoughtfulAndAnalytical => "thoughtful and analytical",
            CommunicationStyle::WarmAndEmpathetic => "warm and empathetic",
            CommunicationStyle::Custom(value) => value,
        }
    }

    /// Label shown in the style picker.
    pub fn display_name(&self) -> &str {
        match self {
            CommunicationStyle::CasualAndFriendly => "Casual & Friendly",
            CommunicationStyle::ProfessionalAndFormal => "Professional & Formal",
            CommunicationStyle::WittyAndSarcastic => "Witty & Sarcastic",
            CommunicationStyle::EnthusiasticAndEnergetic => "Enthusiastic & Energetic",
            CommunicationStyle::ThoughtfulAndAnalytical => "Thoughtful & Analytical",
            CommunicationStyle::WarmAndEmpathetic => "Warm & Empathetic",
            CommunicationStyle::Custom(value) => value,
        }
    }

    /// The styles offered by the form, in picker order.
    pub fn all() -> [CommunicationStyle; 6] {
        [
            CommunicationStyle::CasualAndFriendly,
            CommunicationStyle::ProfessionalAndFormal,
            CommunicationStyle::WittyAndSarcastic,
            CommunicationStyle::EnthusiasticAndEnergetic,
            CommunicationStyle::ThoughtfulAndAnalytical,
            CommunicationStyle::WarmAndEmpathetic,
        ]
    }

    /// Whether this is one of the picker styles.
    pub fn is_known(&self) -> bool {
        !matches!(self, CommunicationStyle::Custom(_))
    }
}

impl Default for CommunicationStyle {
    fn default() -> Self {
        CommunicationStyle::CasualAndFriendly
    }
}

impl From<String> for CommunicationStyle {
    fn from(value: String) -> Self {
        CommunicationStyle::all()
            .into_iter()
            .find(|style| style.as_str() == value)
            .unwrap_or(CommunicationStyle::Custom(value))
    }
}

impl From<CommunicationStyle> for String {
    fn from(style: CommunicationStyle) -> Self {
        match style {
            CommunicationStyle::Custom(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CommunicationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for CommunicationStyle {
    type Err = String;

    /// Accepts the wire value or a short slug (`casual`, `witty`, ...).
    ///
    /// Only the picker styles parse; free-form values are rejected so a
    /// typo on the command line does not silently become a custom style.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let style = match normalized.as_str() {
            "casual" | "casual and friendly" => CommunicationStyle::CasualAndFriendly,
            "professional" | "professional and formal" => CommunicationStyle::ProfessionalAndFormal,
            "witty" | "witty and sarcastic" => CommunicationStyle::WittyAndSarcastic,
            "enthusiastic" | "enthusiastic and energetic" => {
                CommunicationStyle::EnthusiasticAndEnergetic
            }
            "thoughtful" | "thoughtful and analytical" => CommunicationStyle::ThoughtfulAndAnalytical,
            "warm" | "warm and empathetic" => CommunicationStyle::WarmAndEmpathetic,
            _ => {
                return Err(format!(
                    "Unknown communication style '{}'. Valid: casual, professional, witty, enthusiastic, thoughtful, warm",
                    s
                ))
            }
        };
        Ok(style)
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// A complete persona as stored by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name of the clone.
    pub name: String,

    pub communication_style: CommunicationStyle,

    pub interests: Vec<String>,

    pub personality_traits: Vec<String>,

    pub favorite_topics: Vec<String>,

    pub speaking_quirks: String,

    pub background: String,
}

impl Persona {
    /// Entries of one list field.
    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::Interests => &self.interests,
            ListField::PersonalityTraits => &self.personality_traits,
            ListField::FavoriteTopics => &self.favorite_topics,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// List Fields
// ─────────────────────────────────────────────────────────────────

/// The three tag-list fields of a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    Interests,
    PersonalityTraits,
    FavoriteTopics,
}

impl ListField {
    /// Field name on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            ListField::Interests => "interests",
            ListField::PersonalityTraits => "personality_traits",
            ListField::FavoriteTopics => "favorite_topics",
        }
    }

    /// Heading shown in the form.
    pub fn label(&self) -> &'static str {
        match self {
            ListField::Interests => "Interests",
            ListField::PersonalityTraits => "Personality Traits",
            ListField::FavoriteTopics => "Favorite Topics",
        }
    }

    pub fn all() -> &'static [ListField] {
        &[
            ListField::Interests,
            ListField::PersonalityTraits,
            ListField::FavoriteTopics,
        ]
    }
}

impl fmt::Display for ListField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ListField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interests" | "interest" => Ok(ListField::Interests),
            "personality_traits" | "traits" | "trait" => Ok(ListField::PersonalityTraits),
            "favorite_topics" | "topics" | "topic" => Ok(ListField::FavoriteTopics),
            _ => Err(format!(
                "Unknown list field '{}'. Valid: interests, traits, topics",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_wire_round_trip_keeps_custom_value() {
        let style: CommunicationStyle = serde_json::from_str("\"dry and deadpan\"").unwrap();
        assert_eq!(style, CommunicationStyle::Custom("dry and deadpan".into()));
        assert_eq!(serde_json::to_string(&style).unwrap(), "\"dry and deadpan\"");
    }

    #[test]
    fn test_style_known_value_deserializes_to_variant() {
        let style: CommunicationStyle = serde_json::from_str("\"witty and sarcastic\"").unwrap();
        assert_eq!(style, CommunicationStyle::WittyAndSarcastic);
        assert!(style.is_known());
    }

    #[test]
    fn test_style_from_str_slugs() {
        assert_eq!("warm".parse::<CommunicationStyle>().unwrap(), CommunicationStyle::WarmAndEmpathetic);
        assert_eq!(
            "Professional and Formal".parse::<CommunicationStyle>().unwrap(),
            CommunicationStyle::ProfessionalAndFormal
        );
        assert!("grumpy".parse::<CommunicationStyle>().is_err());
    }

    #[test]
    fn test_default_style() {
        assert_eq!(CommunicationStyle::default().as_str(), "casual and friendly");
    }

    #[test]
    fn test_list_field_parse() {
        assert_eq!("traits".parse::<ListField>().unwrap(), ListField::PersonalityTraits);
        assert_eq!("favorite_topics".parse::<ListField>().unwrap(), ListField::FavoriteTopics);
        assert!("hobbies".parse::<ListField>().is_err());
    }

    #[test]
    fn test_persona_rejects_missing_fields() {
        let json = r#"{ "name": "Ada", "communication_style": "casual and friendly" }"#;
        assert!(serde_json::from_str::<Persona>(json).is_err());
    }
}
