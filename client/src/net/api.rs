//! REST API wrappers for the backend chat service.
//!
//! ERROR HANDLING
//! ==============
//! Every failure (transport error, non-success HTTP status, envelope code
//! other than success, undecodable body) comes back to the caller as an
//! [`ApiError`]. Nothing is retried at this layer.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{
    ApiEnvelope, CODE_SUCCESS, ChatRoom, CreateChatroomRequest, LoginRequest, LoginResponse, MessageQuery,
    RoomMessage, User,
};
use crate::config::ClientConfig;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request rejected with code {code}: {message}")]
    Rejected { code: i64, message: String },
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

fn chatroom_endpoint(room_id: &str) -> String {
    format!("/chatrooms/{}", urlencoding::encode(room_id))
}

fn messages_endpoint(room_id: &str, query: MessageQuery) -> String {
    format!("{}/messages{}", chatroom_endpoint(room_id), query.to_query_string())
}

/// Thin typed client over the backend's REST surface.
///
/// Holds the bearer token returned by [`ApiClient::login`] and attaches it to
/// every later request until [`ApiClient::logout`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client for `config.api_base_url` with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { http, base_url: config.api_base_url.clone(), token: None })
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// `POST /login`. Stores the returned token on success.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn login(&mut self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(credentials)?;
        let response: LoginResponse = self.request(Method::POST, "/login", Some(body)).await?;
        tracing::info!(user_id = response.user.id, username = %response.user.username, "logged in");
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// `GET /profile`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.request(Method::GET, "/profile", None).await
    }

    /// `POST /logout`. Clears the stored token once the service accepts it.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        let _: Value = self.request(Method::POST, "/logout", None).await?;
        self.token = None;
        Ok(())
    }

    /// `GET /chatrooms`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn list_chatrooms(&self) -> Result<Vec<ChatRoom>, ApiError> {
        let rooms: Option<Vec<ChatRoom>> = self.request(Method::GET, "/chatrooms", None).await?;
        Ok(rooms.unwrap_or_default())
    }

    /// `POST /chatrooms`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn create_chatroom(&self, room: &CreateChatroomRequest) -> Result<ChatRoom, ApiError> {
        let body = serde_json::to_value(room)?;
        self.request(Method::POST, "/chatrooms", Some(body)).await
    }

    /// `GET /chatrooms/{id}`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn chatroom(&self, room_id: &str) -> Result<ChatRoom, ApiError> {
        self.request(Method::GET, &chatroom_endpoint(room_id), None).await
    }

    /// `GET /chatrooms/{id}/messages?limit=&offset=`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn messages(&self, room_id: &str, query: MessageQuery) -> Result<Vec<RoomMessage>, ApiError> {
        let path = messages_endpoint(room_id, query);
        let messages: Option<Vec<RoomMessage>> = self.request(Method::GET, &path, None).await?;
        Ok(messages.unwrap_or_default())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "api request");

        let request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let request = if let Some(json) = body { request.json(&json) } else { request };

        let response = request.send().await.inspect_err(|error| {
            tracing::warn!(%method, %url, %error, "api request failed");
        })?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "api request returned error status");
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }

        unwrap_envelope(&text)
    }
}

/// Decode a response body, unwrapping the backend envelope when present.
fn unwrap_envelope<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let value = if text.trim().is_empty() { Value::Null } else { serde_json::from_str::<Value>(text)? };

    if !is_envelope(&value) {
        return Ok(serde_json::from_value(value)?);
    }

    let envelope: ApiEnvelope<Value> = serde_json::from_value(value)?;
    if envelope.code != CODE_SUCCESS {
        return Err(ApiError::Rejected { code: envelope.code, message: envelope.messages });
    }
    Ok(serde_json::from_value(envelope.data.unwrap_or(Value::Null))?)
}

fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.get("code").is_some_and(Value::is_i64) && map.contains_key("data"))
}
