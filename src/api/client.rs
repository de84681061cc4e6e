//! VK API method client
//!
//! Every method is a form POST to `<base_url>/<method>` carrying the access
//! token and API version. Responses come wrapped in either
//! `{"response": ...}` or `{"error": {"error_code": .., "error_msg": ..}}`.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http::{FormBody, HttpClient};
use crate::pagination::HistoryFetcher;
use crate::types::{HistoryPage, HistoryRequest, JsonValue, PeerId};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

/// `users.get` accepts at most this many ids per call
pub const USERS_PER_CALL: usize = 1000;

/// `groups.getById` accepts at most this many ids per call
pub const GROUPS_PER_CALL: usize = 500;

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Option<JsonValue>,
    error: Option<ApiErrorBody>,
    #[serde(default)]
    execute_errors: Vec<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_code: i64,
    #[serde(default)]
    error_msg: String,
    #[serde(default)]
    method: Option<String>,
}

/// One page of `messages.getConversations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationsPage {
    /// Total number of conversations
    pub count: u64,
    /// Conversations on this page
    #[serde(default)]
    pub items: Vec<ConversationItem>,
}

/// Entry of `messages.getConversations`
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationItem {
    /// Conversation info
    pub conversation: JsonValue,
}

impl ConversationItem {
    /// Peer id of the conversation, if present
    pub fn peer_id(&self) -> Option<PeerId> {
        self.conversation["peer"]["id"].as_i64()
    }
}

/// VK API client
#[derive(Debug)]
pub struct VkApi {
    http: HttpClient,
    token: String,
    version: String,
}

impl VkApi {
    /// Create a client from config
    pub fn new(config: &ApiConfig, token: impl Into<String>) -> Result<Self> {
        let http = HttpClient::with_config(config.http_config())?;
        Ok(Self::with_client(http, token, &config.version))
    }

    /// Create a client over an existing HTTP client
    pub fn with_client(
        http: HttpClient,
        token: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token: token.into(),
            version: version.into(),
        }
    }

    /// API version sent with every call
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Call a method and return its unwrapped `response`.
    ///
    /// Flood-control style API errors are retried with the transport's
    /// backoff; any other API error is returned.
    pub async fn call(&self, method: &str, params: &[(&str, String)]) -> Result<JsonValue> {
        let max_retries = self.http.config().max_retries;
        let mut attempt = 0;

        loop {
            match self.call_once(method, params).await {
                Err(err @ Error::Api { .. }) if err.is_retryable() && attempt < max_retries => {
                    let delay = self.http.calculate_backoff(attempt);
                    warn!(
                        "{} failed with {}, attempt {}/{}, retrying in {:?}",
                        method,
                        err,
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn call_once(&self, method: &str, params: &[(&str, String)]) -> Result<JsonValue> {
        let mut body = FormBody::new()
            .field("access_token", self.token.as_str())
            .field("v", self.version.as_str());
        for (key, value) in params {
            body = body.field(*key, value.as_str());
        }

        debug!(method, "Calling VK API");
        let envelope: Envelope = self.http.post_form_json(method, &body).await?;

        for err in &envelope.execute_errors {
            warn!(
                "{} reported an inner error in {}: {} {}",
                method,
                err.method.as_deref().unwrap_or("unknown method"),
                err.error_code,
                err.error_msg
            );
        }

        if let Some(err) = envelope.error {
            return Err(Error::api(err.error_code, err.error_msg));
        }

        envelope
            .response
            .ok_or_else(|| Error::decode(method, "neither response nor error in body"))
    }

    /// Call a method and deserialize its `response`
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self.call(method, params).await?;
        serde_json::from_value(response).map_err(|e| Error::decode(method, e.to_string()))
    }

    /// `messages.getHistory`
    pub async fn get_history(&self, request: HistoryRequest) -> Result<HistoryPage> {
        self.call_as(
            "messages.getHistory",
            &[
                ("offset", request.offset.to_string()),
                ("count", request.count.to_string()),
                ("peer_id", request.peer_id.to_string()),
            ],
        )
        .await
    }

    /// Run a VKScript program server-side
    pub async fn execute(&self, code: &str) -> Result<JsonValue> {
        self.call("execute", &[("code", code.to_string())]).await
    }

    /// `messages.getConversations`
    pub async fn get_conversations(&self, offset: u64, count: u32) -> Result<ConversationsPage> {
        self.call_as(
            "messages.getConversations",
            &[("offset", offset.to_string()), ("count", count.to_string())],
        )
        .await
    }

    /// Conversation info of one peer
    pub async fn get_conversation(&self, peer_id: PeerId) -> Result<JsonValue> {
        let method = "messages.getConversationsById";
        let mut response = self
            .call(method, &[("peer_ids", peer_id.to_string())])
            .await?;

        match response
            .get_mut("items")
            .and_then(|items| items.get_mut(0))
        {
            Some(item) => Ok(item.take()),
            None => Err(Error::decode(
                method,
                format!("no conversation returned for peer {peer_id}"),
            )),
        }
    }

    /// The account the token belongs to
    pub async fn current_user(&self) -> Result<JsonValue> {
        let mut users: Vec<JsonValue> = self.call_as("users.get", &[]).await?;
        if users.is_empty() {
            return Err(Error::decode("users.get", "token owner not returned"));
        }
        Ok(users.swap_remove(0))
    }

    /// `users.get`, split into calls of at most [`USERS_PER_CALL`] ids
    pub async fn get_users(&self, user_ids: &[i64]) -> Result<Vec<JsonValue>> {
        let mut users = Vec::with_capacity(user_ids.len());
        for chunk in user_ids.chunks(USERS_PER_CALL) {
            let page: Vec<JsonValue> = self
                .call_as("users.get", &[("user_ids", join_ids(chunk))])
                .await?;
            users.extend(page);
        }
        Ok(users)
    }

    /// `groups.getById`, split into calls of at most [`GROUPS_PER_CALL`] ids
    pub async fn get_groups(&self, group_ids: &[i64]) -> Result<Vec<JsonValue>> {
        let mut groups = Vec::with_capacity(group_ids.len());
        for chunk in group_ids.chunks(GROUPS_PER_CALL) {
            let page: Vec<JsonValue> = self
                .call_as("groups.getById", &[("group_ids", join_ids(chunk))])
                .await?;
            groups.extend(page);
        }
        Ok(groups)
    }
}

#[async_trait]
impl HistoryFetcher for VkApi {
    async fn get_history(&self, request: HistoryRequest) -> Result<HistoryPage> {
        VkApi::get_history(self, request).await
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
