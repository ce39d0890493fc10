//! In-memory directory and conversation service
//!
//! Behaves like the remote service closely enough to drive the view
//! controller in tests and in `aiclone shell --demo`: usernames are joined
//! into conversation listings, generation produces eight alternating lines,
//! and any operation can be told to fail.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, FailureCause, Result};
use crate::model::{
    CommunicationStyle, Conversation, ConversationRequest, GeneratedConversation, Message,
    Participants, Persona, Timestamp, User,
};

use super::{ConversationClient, DirectoryClient, ServiceHealth};

/// Lines generated per conversation
const GENERATED_MESSAGES: usize = 8;

/// Participant label for a user id the directory no longer knows
const UNKNOWN_PARTICIPANT: &str = "Unknown";

// ─────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────

/// Configuration for in-memory service behavior
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    /// Simulated latency per call
    pub latency: Option<Duration>,

    /// Reject a second user with an existing username (400)
    pub enforce_unique_usernames: bool,
}

/// Service operations, for failure injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOp {
    ListUsers,
    GetUser,
    CreateUser,
    ListConversations,
    ListUserConversations,
    RequestConversation,
    Health,
}

/// A conversation as the service stores it, before usernames are joined in
#[derive(Debug, Clone)]
struct StoredConversation {
    conversation_id: String,
    user1_id: String,
    user2_id: String,
    topic: String,
    messages: Vec<Message>,
    created_at: Timestamp,
}

#[derive(Debug, Default)]
struct Store {
    users: Vec<User>,
    conversations: Vec<StoredConversation>,
}

// ─────────────────────────────────────────────────────────────────
// Memory Service
// ─────────────────────────────────────────────────────────────────

/// In-memory implementation of both client traits
pub struct MemoryService {
    config: MemoryConfig,
    store: RwLock<Store>,
    failing: RwLock<HashSet<ServiceOp>>,
    call_counts: RwLock<HashMap<ServiceOp, u32>>,
}

impl MemoryService {
    /// Create an empty service with default configuration
    pub fn new() -> Self {
        Self::with_config(MemoryConfig::default())
    }

    /// Create an empty service with custom configuration
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            config,
            store: RwLock::new(Store::default()),
            failing: RwLock::new(HashSet::new()),
            call_counts: RwLock::new(HashMap::new()),
        }
    }

    /// A service pre-populated with three personas and one conversation
    pub fn with_demo_data() -> Self {
        let service = Self::new();
        {
            let mut store = service.store.write();
            store.users = demo_users();
            let ada = store.users[0].clone();
            let grace = store.users[1].clone();
            store.conversations.push(StoredConversation {
                conversation_id: uuid::Uuid::new_v4().to_string(),
                user1_id: ada.user_id.clone(),
                user2_id: grace.user_id.clone(),
                topic: "compilers".to_string(),
                messages: scripted_messages(&ada, &grace, "compilers"),
                created_at: Timestamp::from("2024-05-01T10:00:00.000000"),
            });
        }
        service
    }

    /// Insert users directly, bypassing `create_user`
    pub fn seed_users(&self, users: impl IntoIterator<Item = User>) {
        self.store.write().users.extend(users);
    }

    /// Make every later call to `op` fail with a transport error
    pub fn fail(&self, op: ServiceOp) {
        self.failing.write().insert(op);
    }

    /// Undo [`fail`](Self::fail)
    pub fn recover(&self, op: ServiceOp) {
        self.failing.write().remove(&op);
    }

    /// Number of times `op` was called, failed calls included
    pub fn call_count(&self, op: ServiceOp) -> u32 {
        self.call_counts.read().get(&op).copied().unwrap_or(0)
    }

    /// Reset all call counts
    pub fn reset_counts(&self) {
        self.call_counts.write().clear();
    }

    /// Number of stored users
    pub fn user_count(&self) -> usize {
        self.store.read().users.len()
    }

    /// Liveness, shaped like `GET /api/health`
    pub async fn health(&self) -> Result<ServiceHealth> {
        self.enter(ServiceOp::Health)
            .await
            .map_err(|cause| Error::fetch("check service health", cause))?;
        Ok(ServiceHealth {
            status: "healthy".to_string(),
            message: "In-memory service is running".to_string(),
        })
    }

    /// Count the call, wait out the configured latency, apply injected failure.
    async fn enter(&self, op: ServiceOp) -> std::result::Result<(), FailureCause> {
        *self.call_counts.write().entry(op).or_insert(0) += 1;

        if let Some(latency) = self.config.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.read().contains(&op) {
            debug!(?op, "Injected failure");
            return Err(FailureCause::Transport("connection refused (simulated)".to_string()));
        }
        Ok(())
    }

    fn listing(store: &Store, stored: &StoredConversation) -> Conversation {
        let username = |id: &str| {
            store
                .users
                .iter()
                .find(|u| u.user_id == id)
                .map(|u| u.username.clone())
                .unwrap_or_else(|| UNKNOWN_PARTICIPANT.to_string())
        };
        Conversation {
            conversation_id: Some(stored.conversation_id.clone()),
            user1_id: Some(stored.user1_id.clone()),
            user2_id: Some(stored.user2_id.clone()),
            participants: Participants {
                user1: username(&stored.user1_id),
                user2: username(&stored.user2_id),
            },
            topic: stored.topic.clone(),
            created_at: stored.created_at.clone(),
            messages: stored.messages.clone(),
        }
    }
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryClient for MemoryService {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.enter(ServiceOp::ListUsers)
            .await
            .map_err(|cause| Error::fetch("fetch users", cause))?;
        Ok(self.store.read().users.clone())
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        self.enter(ServiceOp::GetUser)
            .await
            .map_err(|cause| Error::fetch("fetch user", cause))?;
        self.store
            .read()
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound { resource: format!("User '{}'", user_id) })
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.enter(ServiceOp::CreateUser)
            .await
            .map_err(|cause| Error::Submit { cause })?;

        let mut store = self.store.write();
        if self.config.enforce_unique_usernames
            && store.users.iter().any(|u| u.username == user.username)
        {
            return Err(Error::Submit {
                cause: FailureCause::Status {
                    code: 400,
                    detail: "Username already exists".to_string(),
                },
            });
        }
        store.users.push(user.clone());
        debug!(user_id = %user.user_id, "Stored user");
        Ok(())
    }
}

#[async_trait]
impl ConversationClient for MemoryService {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.enter(ServiceOp::ListConversations)
            .await
            .map_err(|cause| Error::fetch("fetch conversations", cause))?;
        let store = self.store.read();
        Ok(store
            .conversations
            .iter()
            .map(|stored| Self::listing(&store, stored))
            .collect())
    }

    async fn list_user_conversations(&self, user_id: &str) -> Result<Vec<Conversation>> {
        self.enter(ServiceOp::ListUserConversations)
            .await
            .map_err(|cause| Error::fetch("fetch user conversations", cause))?;
        let store = self.store.read();
        Ok(store
            .conversations
            .iter()
            .filter(|stored| stored.user1_id == user_id || stored.user2_id == user_id)
            .map(|stored| Self::listing(&store, stored))
            .collect())
    }

    async fn request_conversation(&self, request: &ConversationRequest) -> Result<GeneratedConversation> {
        self.enter(ServiceOp::RequestConversation)
            .await
            .map_err(|cause| Error::Generation { cause })?;

        let mut store = self.store.write();
        let find = |id: &str| store.users.iter().find(|u| u.user_id == id).cloned();
        let (user1, user2) = match (find(&request.user1_id), find(&request.user2_id)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(Error::Generation {
                    cause: FailureCause::Status {
                        code: 404,
                        detail: "One or both users not found".to_string(),
                    },
                })
            }
        };

        let stored = StoredConversation {
            conversation_id: uuid::Uuid::new_v4().to_string(),
            user1_id: user1.user_id.clone(),
            user2_id: user2.user_id.clone(),
            topic: request.topic.clone(),
            messages: scripted_messages(&user1, &user2, &request.topic),
            created_at: service_now(),
        };
        let generated = GeneratedConversation {
            conversation_id: stored.conversation_id.clone(),
            participants: Participants {
                user1: user1.username.clone(),
                user2: user2.username.clone(),
            },
            messages: stored.messages.clone(),
        };
        store.conversations.push(stored);

        Ok(generated)
    }
}

// ─────────────────────────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────────────────────────

/// Naive local-style timestamp, the way the service writes them
fn service_now() -> Timestamp {
    Timestamp::from(Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string().as_str())
}

/// Deterministic dialogue alternating between the two personas, `user1` first
fn scripted_messages(user1: &User, user2: &User, topic: &str) -> Vec<Message> {
    (0..GENERATED_MESSAGES)
        .map(|turn| {
            let (speaker, other) = if turn % 2 == 0 { (user1, user2) } else { (user2, user1) };
            let interest = speaker
                .personality
                .interests
                .get(turn / 2 % speaker.personality.interests.len().max(1))
                .map(String::as_str)
                .unwrap_or("life");
            let message = if turn == 0 {
                format!("So, {}. Where do we even start?", topic)
            } else {
                format!(
                    "{}, that reminds me of {}. It all ties back to {} somehow.",
                    other.personality.name, interest, topic
                )
            };
            Message {
                speaker: speaker.personality.name.clone(),
                message,
                timestamp: service_now(),
            }
        })
        .collect()
}

fn demo_user(id: &str, username: &str, name: &str, style: CommunicationStyle, interests: &[&str]) -> User {
    User {
        user_id: id.to_string(),
        username: username.to_string(),
        personality: Persona {
            name: name.to_string(),
            communication_style: style,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            personality_traits: vec!["curious".to_string()],
            favorite_topics: vec!["technology".to_string()],
            speaking_quirks: "none".to_string(),
            background: "general background".to_string(),
        },
        created_at: Timestamp::from("2024-05-01T09:00:00.000Z"),
    }
}

fn demo_users() -> Vec<User> {
    vec![
        demo_user(
            "user_1714554000000",
            "ada",
            "Ada",
            CommunicationStyle::ThoughtfulAndAnalytical,
            &["mathematics", "engines", "poetry", "music"],
        ),
        demo_user(
            "user_1714554000001",
            "grace",
            "Grace",
            CommunicationStyle::WittyAndSarcastic,
            &["compilers", "navy"],
        ),
        demo_user(
            "user_1714554000002",
            "linus",
            "Linus",
            CommunicationStyle::CasualAndFriendly,
            &["kernels"],
        ),
    ]
}
