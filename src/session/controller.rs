//! View controller
//!
//! Owns the session: which view is active, who the current user is, the
//! in-progress personality form, and the cached directory and conversation
//! lists. All commands take `&self`, so a command can be issued while
//! another one is still waiting on the service; per-operation guards keep
//! the same command from overlapping with itself.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::form::PersonalityForm;
use crate::model::{Conversation, ConversationRequest, GeneratedConversation, User};
use crate::service::{ConversationClient, DirectoryClient};

use super::{InFlight, InFlightGuard, Listing, Notice, OperationKind, SessionState, View};

/// Mutable, non-list part of the session
#[derive(Debug, Default)]
struct Session {
    view: View,
    current_user: Option<User>,
    form: PersonalityForm,
    notice: Option<Notice>,
}

/// Drives one interactive session against the service
pub struct ViewController {
    directory: Arc<dyn DirectoryClient>,
    conversation_client: Arc<dyn ConversationClient>,
    session: Mutex<Session>,
    users: Listing<User>,
    conversations: Listing<Conversation>,
    in_flight: InFlight,
}

impl ViewController {
    /// Create a controller on the home view with empty lists.
    pub fn new(directory: Arc<dyn DirectoryClient>, conversation_client: Arc<dyn ConversationClient>) -> Self {
        Self {
            directory,
            conversation_client,
            session: Mutex::new(Session::default()),
            users: Listing::new(),
            conversations: Listing::new(),
            in_flight: InFlight::new(),
        }
    }

    /// Controller whose two clients are the same service object.
    pub fn with_service<S>(service: Arc<S>) -> Self
    where
        S: DirectoryClient + ConversationClient + 'static,
    {
        let directory: Arc<dyn DirectoryClient> = service.clone();
        let conversation_client: Arc<dyn ConversationClient> = service;
        Self::new(directory, conversation_client)
    }

    // ─────────────────────────────────────────────────────────────
    // Navigation and state
    // ─────────────────────────────────────────────────────────────

    pub fn navigate(&self, view: View) {
        let mut session = self.session.lock();
        if session.view != view {
            debug!(from = %session.view, to = %view, "Navigate");
        }
        session.view = view;
    }

    pub fn current_view(&self) -> View {
        self.session.lock().view
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.lock().current_user.clone()
    }

    /// Cached directory, in service order
    pub fn users(&self) -> Arc<Vec<User>> {
        self.users.get()
    }

    /// Cached conversations, in service order
    pub fn conversations(&self) -> Arc<Vec<Conversation>> {
        self.conversations.get()
    }

    pub fn is_in_flight(&self, kind: OperationKind) -> bool {
        self.in_flight.is_active(kind)
    }

    pub fn notice(&self) -> Option<Notice> {
        self.session.lock().notice.clone()
    }

    /// Acknowledge and clear the current notice.
    pub fn dismiss_notice(&self) -> Option<Notice> {
        self.session.lock().notice.take()
    }

    /// Owned snapshot of the whole session.
    pub fn state(&self) -> SessionState {
        let users = self.users();
        let conversations = self.conversations();
        let in_flight = self.in_flight.active();
        let session = self.session.lock();
        SessionState {
            current_view: session.view,
            current_user: session.current_user.clone(),
            users,
            conversations,
            form: session.form.clone(),
            in_flight,
            notice: session.notice.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Form
    // ─────────────────────────────────────────────────────────────

    /// Edit the in-progress form.
    pub fn edit_form<R>(&self, edit: impl FnOnce(&mut PersonalityForm) -> R) -> R {
        edit(&mut self.session.lock().form)
    }

    pub fn form(&self) -> PersonalityForm {
        self.session.lock().form.clone()
    }

    // ─────────────────────────────────────────────────────────────
    // Data fetch
    // ─────────────────────────────────────────────────────────────

    /// Load both lists at once. Failures are logged; lists stay as they were.
    pub async fn initialize(&self) {
        let (users, conversations) = tokio::join!(self.refresh_users(), self.refresh_conversations());
        info!(
            users_loaded = users.is_ok(),
            conversations_loaded = conversations.is_ok(),
            "Session initialized"
        );
    }

    /// Re-fetch the directory and replace the cached list wholesale.
    ///
    /// On failure the previous list is kept and the error returned for
    /// callers that care; nothing is shown to the user. When two refreshes
    /// overlap, the one started last decides the list.
    pub async fn refresh_users(&self) -> Result<usize> {
        let ticket = self.users.ticket();
        match self.directory.list_users().await {
            Ok(users) => {
                let count = users.len();
                if self.users.store(ticket, users) {
                    debug!(count, "Directory refreshed");
                } else {
                    debug!(ticket, "Dropping stale directory listing");
                }
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e.format_for_log(), "Keeping cached directory");
                Err(e)
            }
        }
    }

    /// Re-fetch conversations and replace the cached list wholesale.
    pub async fn refresh_conversations(&self) -> Result<usize> {
        let ticket = self.conversations.ticket();
        match self.conversation_client.list_conversations().await {
            Ok(conversations) => {
                let count = conversations.len();
                if self.conversations.store(ticket, conversations) {
                    debug!(count, "Conversations refreshed");
                } else {
                    debug!(ticket, "Dropping stale conversation listing");
                }
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e.format_for_log(), "Keeping cached conversations");
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────

    /// Build the form into a user and register it.
    ///
    /// On success the new user becomes the current user, the directory is
    /// refreshed, the explore view opens, and the form is cleared unless it
    /// was edited while the request was out. On failure the session is left
    /// as it was and a notice explains why.
    pub async fn submit_persona(&self) -> Result<User> {
        let _guard = self.acquire(OperationKind::SubmitPersona)?;

        let (submitted, user) = {
            let session = self.session.lock();
            (session.form.clone(), session.form.build())
        };
        let user = user.map_err(|e| self.report(e))?;

        info!(user_id = %user.user_id, username = %user.username, "Submitting persona");
        self.directory
            .create_user(&user)
            .await
            .map_err(|e| self.report(e))?;

        {
            let mut session = self.session.lock();
            session.current_user = Some(user.clone());
        }
        let _ = self.refresh_users().await;
        {
            let mut session = self.session.lock();
            session.view = View::Explore;
            // Keep edits made while the request was out.
            if session.form == submitted {
                session.form.reset();
            }
            session.notice = Some(Notice::success(format!(
                "{} is ready. Pick someone to talk to.",
                user.display_name()
            )));
        }

        Ok(user)
    }

    /// Ask the service for a conversation between the current user and
    /// `target_user_id`, then refresh the conversation list.
    ///
    /// A blank or missing topic becomes "general chat".
    pub async fn generate_conversation(
        &self,
        target_user_id: &str,
        topic: Option<&str>,
    ) -> Result<GeneratedConversation> {
        let me = self.current_user().ok_or_else(|| {
            self.report(Error::unavailable(
                "start a conversation",
                "create your AI clone first",
            ))
        })?;
        if me.user_id == target_user_id {
            return Err(self.report(Error::unavailable(
                "start a conversation",
                "a clone cannot talk to itself",
            )));
        }

        let _guard = self.acquire(OperationKind::GenerateConversation)?;

        let request = ConversationRequest::new(me.user_id.as_str(), target_user_id, topic);
        info!(
            user1_id = %request.user1_id,
            user2_id = %request.user2_id,
            topic = %request.topic,
            "Requesting conversation"
        );
        let generated = self
            .conversation_client
            .request_conversation(&request)
            .await
            .map_err(|e| self.report(e))?;

        let _ = self.refresh_conversations().await;
        self.session.lock().notice = Some(Notice::success("Conversation generated successfully!"));

        Ok(generated)
    }

    // ─────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────

    fn acquire(&self, kind: OperationKind) -> Result<InFlightGuard> {
        self.in_flight.try_acquire(kind).ok_or_else(|| {
            self.report(Error::InFlight {
                operation: kind.label().to_string(),
            })
        })
    }

    /// Log a command failure and post its notice.
    fn report(&self, error: Error) -> Error {
        match error.kind() {
            crate::error::ErrorKind::Validation => debug!(error = %error, "Action refused"),
            _ => error!(error = %error.format_for_log(), "Action failed"),
        }
        if let Some(notice) = Notice::for_error(&error) {
            self.session.lock().notice = Some(notice);
        }
        error
    }
}
