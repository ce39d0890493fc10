//! Client trait definitions
//!
//! The view controller talks to the service only through these two traits,
//! so the HTTP client and the in-memory service are interchangeable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Conversation, ConversationRequest, GeneratedConversation, User};

/// Liveness report from `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Read and register personas in the remote directory.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Full directory in service order.
    ///
    /// Transport failures and unexpected shapes are `Error::Fetch`.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// One user by id; `Error::NotFound` when the service has no such user.
    async fn get_user(&self, user_id: &str) -> Result<User>;

    /// Register a fully built user.
    ///
    /// No idempotency key is sent: submitting the same persona twice may
    /// register it twice. Failures are `Error::Submit`, and the caller must
    /// not assume the user exists afterwards.
    async fn create_user(&self, user: &User) -> Result<()>;
}

/// Read stored conversations and ask for new ones.
#[async_trait]
pub trait ConversationClient: Send + Sync {
    /// All conversations, in whatever order the service returns them.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Conversations one user took part in.
    async fn list_user_conversations(&self, user_id: &str) -> Result<Vec<Conversation>>;

    /// Generate a conversation and wait for the service to finish.
    ///
    /// The answer is informational; callers re-list to observe the stored
    /// entry. Failures are `Error::Generation`.
    async fn request_conversation(&self, request: &ConversationRequest) -> Result<GeneratedConversation>;
}
