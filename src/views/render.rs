//! Plain-text rendering of the view models.

use std::fmt::{self, Display, Write as _};

use crate::config::DisplaySettings;
use crate::model::CommunicationStyle;
use crate::session::{SessionState, View};

use super::{ConversationsView, CreateView, ExploreView, HomeView};

/// Render the active view of `state`, followed by its notice if any.
pub fn render(state: &SessionState, display: &DisplaySettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", state.current_view.title());
    let body: Box<dyn Display> = match state.current_view {
        View::Home => Box::new(HomeView::build(state, display)),
        View::Create => Box::new(CreateView::build(state)),
        View::Explore => Box::new(ExploreView::build(state, display)),
        View::Conversations => Box::new(ConversationsView::build(state)),
    };
    let _ = write!(out, "{}", body);
    if let Some(ref notice) = state.notice {
        let _ = writeln!(out, "\n{}", notice);
    }
    out
}

impl Display for HomeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.signed_in_as {
            Some(ref name) => writeln!(f, "Signed in as {}", name)?,
            None => writeln!(f, "Create an AI version of yourself and watch it meet other clones.")?,
        }

        if self.recent.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Latest Clone Conversations")?;
        for conv in &self.recent {
            writeln!(f, "  {} x {}  [{}]", conv.user1, conv.user2, conv.topic)?;
            if let Some(ref opening) = conv.opening {
                writeln!(f, "    \"{}\"", opening)?;
            }
        }
        if self.total_conversations > self.recent.len() {
            writeln!(
                f,
                "  ({} more, see 'go conversations')",
                self.total_conversations - self.recent.len()
            )?;
        }
        Ok(())
    }
}

impl Display for CreateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name:      {}", self.name)?;
        writeln!(f, "Username:  {}", self.username)?;
        write!(f, "Style:     {}", self.communication_style.display_name())?;
        if !self.style_chosen {
            write!(f, " (default)")?;
        }
        writeln!(f)?;

        for section in &self.lists {
            write!(f, "{}:", section.field.label())?;
            if section.entries.is_empty() {
                write!(f, " -")?;
            }
            writeln!(f)?;
            for (i, entry) in section.entries.iter().enumerate() {
                writeln!(f, "  {}. {}", i, entry)?;
            }
            if !section.pending.is_empty() {
                writeln!(f, "  + {} (not added)", section.pending)?;
            }
        }

        writeln!(f, "Quirks:    {}", self.speaking_quirks)?;
        writeln!(f, "Background: {}", self.background)?;
        writeln!(
            f,
            "Styles:    {}",
            CommunicationStyle::all()
                .iter()
                .map(|s| s.display_name())
                .collect::<Vec<_>>()
                .join(" | ")
        )?;
        if self.submitting {
            writeln!(f, "Creating your AI clone...")?;
        }
        Ok(())
    }
}

impl Display for ExploreView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cards.is_empty() {
            return writeln!(f, "No Clones Yet. Be the first to create an AI clone!");
        }

        for card in &self.cards {
            writeln!(f, "{} (@{})  id: {}", card.name, card.username, card.user_id)?;
            writeln!(f, "  Style: {}", card.communication_style)?;
            if !card.interests.is_empty() {
                write!(f, "  Interests: {}", card.interests.join(", "))?;
                if card.more_interests > 0 {
                    write!(f, " +{} more", card.more_interests)?;
                }
                writeln!(f)?;
            }
            if card.can_converse {
                writeln!(f, "  > talk {}", card.user_id)?;
            }
        }
        if self.generating {
            writeln!(f, "Generating a conversation...")?;
        }
        Ok(())
    }
}

impl Display for ConversationsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transcripts.is_empty() {
            return writeln!(f, "No Conversations Yet. Create some AI clones and start conversations!");
        }

        for (i, transcript) in self.transcripts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(
                f,
                "{} x {}  [{}]  {}",
                transcript.user1, transcript.user2, transcript.topic, transcript.date
            )?;
            for line in &transcript.lines {
                writeln!(f, "  {} {}: {}", line.time, line.speaker, line.message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::PersonalityForm;
    use crate::model::ListField;
    use crate::session::{Notice, OperationKind};
    use std::sync::Arc;

    fn empty_state(view: View) -> SessionState {
        SessionState {
            current_view: view,
            current_user: None,
            users: Arc::new(vec![]),
            conversations: Arc::new(vec![]),
            form: PersonalityForm::new(),
            in_flight: vec![],
            notice: None,
        }
    }

    #[test]
    fn test_empty_views() {
        let display = DisplaySettings::default();
        assert!(render(&empty_state(View::Explore), &display).contains("No Clones Yet"));
        assert!(render(&empty_state(View::Conversations), &display).contains("No Conversations Yet"));
        assert!(render(&empty_state(View::Home), &display).starts_with("== AI Clone Me =="));
    }

    #[test]
    fn test_create_view_lists_and_pending() {
        let mut state = empty_state(View::Create);
        state.form.add_list_item(ListField::Interests, "hiking");
        state.form.set_pending(ListField::FavoriteTopics, "jazz");
        state.in_flight = vec![OperationKind::SubmitPersona];

        let text = render(&state, &DisplaySettings::default());
        assert!(text.contains("  0. hiking"));
        assert!(text.contains("+ jazz (not added)"));
        assert!(text.contains("Casual & Friendly (default)"));
        assert!(text.contains("Creating your AI clone..."));
    }

    #[test]
    fn test_notice_is_appended() {
        let mut state = empty_state(View::Home);
        state.notice = Some(Notice::success("Conversation generated successfully!"));
        let text = render(&state, &DisplaySettings::default());
        assert!(text.trim_end().ends_with("[ok] Conversation generated successfully!"));
    }
}
