//! HTTP client for the directory and conversation service
//!
//! Implements both client traits over the service's JSON API. Every
//! response is decoded into an explicit schema; anything else is reported
//! as a malformed response instead of being patched up.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::config::ServiceSettings;
use crate::error::{Error, FailureCause, Result};
use crate::model::{Conversation, ConversationRequest, GeneratedConversation, User};
use crate::version;

use super::{ConversationClient, DirectoryClient, ServiceHealth};

// ─────────────────────────────────────────────────────────────────
// Response envelopes
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct ConversationsEnvelope {
    conversations: Vec<Conversation>,
}

#[derive(Debug, Deserialize)]
struct CreateUserResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

// ─────────────────────────────────────────────────────────────────
// HTTP Service Client
// ─────────────────────────────────────────────────────────────────

/// reqwest-backed client for one service origin
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    base_url: Url,
    client: Client,
}

impl HttpServiceClient {
    /// Create a client for the configured origin.
    ///
    /// Without `request_timeout_secs` the transport's own default applies.
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let mut base_url = Url::parse(&settings.url)
            .map_err(|e| Error::config_field_invalid("service.url", e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(version::build_info().user_agent());
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(base_url = %base_url, "Service client created");

        Ok(Self { base_url, client })
    }

    /// Origin this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `api/...` against the origin, appending an escaped id segment.
    fn endpoint(&self, path: &str, id: Option<&str>) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| Error::Internal(format!("Invalid endpoint '{}': {}", path, e)))?;
        if let Some(id) = id {
            url.path_segments_mut()
                .map_err(|_| Error::Internal(format!("Cannot append '{}' to endpoint '{}'", id, path)))?
                .push(id);
        }
        Ok(url)
    }

    /// GET and decode, reporting failures as a cause only.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, FailureCause> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FailureCause::Transport(e.to_string()))?;
        decode(response).await
    }

    /// POST a JSON body and return the raw success body.
    async fn post_raw<B>(&self, url: Url, body: &B) -> std::result::Result<String, FailureCause>
    where
        B: serde::Serialize + ?Sized,
    {
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| FailureCause::Transport(e.to_string()))?;
        checked_body(response).await
    }

    /// POST a JSON body and decode the answer.
    async fn post_json<B, T>(&self, url: Url, body: &B) -> std::result::Result<T, FailureCause>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.post_raw(url, body).await?;
        serde_json::from_str(&body).map_err(|e| FailureCause::Malformed(e.to_string()))
    }

    /// `GET /api/health`
    pub async fn health(&self) -> Result<ServiceHealth> {
        let url = self.endpoint("api/health", None)?;
        self.get_json(url)
            .await
            .map_err(|cause| Error::fetch("check service health", cause))
    }
}

/// Check the status, then decode the body as `T`.
async fn decode<T: DeserializeOwned>(response: Response) -> std::result::Result<T, FailureCause> {
    let body = checked_body(response).await?;
    serde_json::from_str(&body).map_err(|e| FailureCause::Malformed(e.to_string()))
}

/// Read the body, turning a non-success status into a cause.
async fn checked_body(response: Response) -> std::result::Result<String, FailureCause> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| FailureCause::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(FailureCause::Status {
            code: status.as_u16(),
            detail: error_detail(&body),
        });
    }
    Ok(body)
}

/// Pull `detail` out of an error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { detail: serde_json::Value::String(text) }) => text,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().chars().take(200).collect(),
    }
}

#[async_trait]
impl DirectoryClient for HttpServiceClient {
    async fn list_users(&self) -> Result<Vec<User>> {
        let url = self.endpoint("api/users", None)?;
        let envelope: UsersEnvelope = self
            .get_json(url)
            .await
            .map_err(|cause| Error::fetch("fetch users", cause))?;
        Ok(envelope.users)
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        let url = self.endpoint("api/users", Some(user_id))?;
        match self.get_json(url).await {
            Ok(user) => Ok(user),
            Err(cause) if cause.effective_status() == Some(StatusCode::NOT_FOUND.as_u16()) => {
                Err(Error::NotFound { resource: format!("User '{}'", user_id) })
            }
            Err(cause) => Err(Error::fetch("fetch user", cause)),
        }
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let url = self.endpoint("api/users", None)?;
        let body = self
            .post_raw(url, user)
            .await
            .map_err(|cause| Error::Submit { cause })?;

        // Any 2xx registers the user; the body is only informational.
        match serde_json::from_str::<CreateUserResponse>(&body) {
            Ok(response) => info!(
                user_id = %response.user_id.as_deref().unwrap_or(&user.user_id),
                message = %response.message.as_deref().unwrap_or("created"),
                "User registered"
            ),
            Err(_) => info!(user_id = %user.user_id, "User registered"),
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationClient for HttpServiceClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let url = self.endpoint("api/conversations", None)?;
        let envelope: ConversationsEnvelope = self
            .get_json(url)
            .await
            .map_err(|cause| Error::fetch("fetch conversations", cause))?;
        Ok(envelope.conversations)
    }

    async fn list_user_conversations(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let url = self.endpoint("api/conversations", Some(user_id))?;
        let envelope: ConversationsEnvelope = self
            .get_json(url)
            .await
            .map_err(|cause| Error::fetch("fetch user conversations", cause))?;
        Ok(envelope.conversations)
    }

    async fn request_conversation(&self, request: &ConversationRequest) -> Result<GeneratedConversation> {
        let url = self.endpoint("api/conversations", None)?;
        let generated: GeneratedConversation = self
            .post_json(url, request)
            .await
            .map_err(|cause| Error::Generation { cause })?;

        info!(
            conversation_id = %generated.conversation_id,
            messages = generated.messages.len(),
            topic = %request.topic,
            "Conversation generated"
        );
        Ok(generated)
    }
}
