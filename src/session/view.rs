//! The screens a session can show.

use std::fmt;
use std::str::FromStr;

/// Active screen. Every view is reachable from every other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Home,
    Create,
    Explore,
    Conversations,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Create => "create",
            View::Explore => "explore",
            View::Conversations => "conversations",
        }
    }

    /// Screen heading
    pub fn title(&self) -> &'static str {
        match self {
            View::Home => "AI Clone Me",
            View::Create => "Create Your AI Clone",
            View::Explore => "Explore AI Clones",
            View::Conversations => "Clone Conversations",
        }
    }

    pub fn all() -> &'static [View] {
        &[View::Home, View::Create, View::Explore, View::Conversations]
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(View::Home),
            "create" => Ok(View::Create),
            "explore" | "users" => Ok(View::Explore),
            "conversations" | "convos" => Ok(View::Conversations),
            _ => Err(format!(
                "Unknown view '{}'. Valid: home, create, explore, conversations",
                s
            )),
        }
    }
}
