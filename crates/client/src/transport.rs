//! Authenticated HTTP transport
//!
//! [`ApiClient`] attaches the session's bearer token to every request and
//! implements the retry protocol: a 401 triggers one coalesced token
//! refresh and a single resend of the original request. A 401 on the resend
//! surfaces as an authentication error, never a second refresh.

use std::sync::Arc;

use helpdesk_domain::{HelpdeskError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::session::SessionManager;

/// Map a non-success response to the matching error, consuming the body for
/// diagnostics. Shared by the auth endpoints and the authenticated client.
pub(crate) async fn response_error(response: reqwest::Response) -> HelpdeskError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();

    // 403 stays a plain transport error: the session is fine, the caller's
    // role just does not cover the operation.
    match status {
        StatusCode::UNAUTHORIZED => HelpdeskError::Authentication(if body.is_empty() {
            format!("request rejected with status {status}")
        } else {
            body
        }),
        StatusCode::TOO_MANY_REQUESTS => HelpdeskError::RateLimited {
            retry_after_secs: retry_after,
            message: if body.is_empty() { "rate limit exceeded".to_string() } else { body },
        },
        _ => HelpdeskError::Transport { status: status.as_u16(), body },
    }
}

/// One part of a multipart upload, described as plain data so callers do not
/// have to touch the HTTP library.
#[derive(Debug, Clone)]
pub struct MultipartPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Authenticated client for the helpdesk API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl ApiClient {
    /// Build the client against the configured base URL.
    ///
    /// # Errors
    /// Returns [`HelpdeskError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| HelpdeskError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string(), session })
    }

    /// The session backing this client.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self.execute(|http| Ok(http.get(&url))).await?;
        Self::decode(response).await
    }

    /// GET a binary resource (attachment downloads).
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url(path);
        let response = self.execute(|http| Ok(http.get(&url))).await?;
        let bytes =
            response.bytes().await.map_err(|err| HelpdeskError::Network(err.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.execute(|http| Ok(http.post(&url).json(body))).await?;
        Self::decode(response).await
    }

    /// POST a JSON body, ignoring whatever the server answers with.
    pub async fn post_discard<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        self.execute(|http| Ok(http.post(&url).json(body))).await?;
        Ok(())
    }

    /// POST with an empty body and decode the JSON response.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self.execute(|http| Ok(http.post(&url))).await?;
        Self::decode(response).await
    }

    /// POST a multipart form and decode the JSON response. The form is
    /// rebuilt from `parts` if the request has to be resent after a refresh.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: &[MultipartPart],
    ) -> Result<T> {
        let url = self.url(path);
        let response = self
            .execute(|http| {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    let mut piece = reqwest::multipart::Part::bytes(part.bytes.clone())
                        .mime_str(&part.content_type)
                        .map_err(|err| {
                            HelpdeskError::Config(format!(
                                "invalid content type {:?}: {err}",
                                part.content_type
                            ))
                        })?;
                    if let Some(file_name) = &part.file_name {
                        piece = piece.file_name(file_name.clone());
                    }
                    form = form.part(part.name.clone(), piece);
                }
                Ok(http.post(&url).multipart(form))
            })
            .await?;
        Self::decode(response).await
    }

    /// Send a request with the current bearer token, refreshing and resending
    /// once if the server answers 401.
    async fn execute<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> Result<reqwest::RequestBuilder>,
    {
        let seen_epoch = self.session.epoch();
        let token = self.session.access_token().await?;
        let response = build(&self.http)?
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|err| HelpdeskError::Network(err.to_string()))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check(response).await;
        }

        debug!("request unauthorized, refreshing token and retrying once");
        self.session.refresh_after_unauthorized(seen_epoch).await?;

        let token = self.session.access_token().await?;
        let retried = build(&self.http)?
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|err| HelpdeskError::Network(err.to_string()))?;

        if retried.status() == StatusCode::UNAUTHORIZED {
            warn!("request still unauthorized after refresh");
            return Err(response_error(retried).await);
        }
        Self::check(retried).await
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(response_error(response).await)
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if response.status() == StatusCode::NO_CONTENT {
            return serde_json::from_value(serde_json::Value::Null)
                .map_err(|err| HelpdeskError::Decode(err.to_string()));
        }
        let bytes =
            response.bytes().await.map_err(|err| HelpdeskError::Network(err.to_string()))?;
        if bytes.is_empty() {
            serde_json::from_value(serde_json::Value::Null)
                .map_err(|err| HelpdeskError::Decode(err.to_string()))
        } else {
            serde_json::from_slice(&bytes).map_err(|err| HelpdeskError::Decode(err.to_string()))
        }
    }
}
