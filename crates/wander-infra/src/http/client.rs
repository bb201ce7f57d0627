//! Shared request plumbing: bearer token, timeouts, error mapping.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use wander_core::{ServiceError, SessionContext};
use wander_core::ports::CredentialStore;
use wander_shared::ErrorResponse;

use super::ApiConfig;

/// A configured HTTP client bound to one session.
///
/// Every request carries the session's bearer token when one is present. A
/// 401 on an authenticated request signs the session out and clears the
/// stored credentials before the error is returned.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionContext,
    credentials: Option<Arc<dyn CredentialStore>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            credentials: None,
        })
    }

    /// Clear this store whenever the server rejects the session's token.
    pub fn with_credentials(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(crate) fn credentials(&self) -> Option<&Arc<dyn CredentialStore>> {
        self.credentials.as_ref()
    }

    /// Request without the session's token.
    pub(crate) fn anonymous_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.anonymous_request(method, path);
        match self.session.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request made by [`ApiClient::request`] and return the successful response.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.reject_session().await;
            return Err(ServiceError::Unauthorized);
        }
        ensure_success(response).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(decode_error)
    }

    async fn reject_session(&self) {
        self.session.invalidate();
        let Some(store) = &self.credentials else {
            return;
        };
        if let Err(error) = store.clear().await {
            tracing::warn!(error = %error, "Failed to clear stored credentials");
        }
    }
}

/// Map non-2xx responses to [`ServiceError`], reading the server's error body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(ServiceError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ServiceError::NotFound),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ServiceError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            })
        }
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.summary().map(str::to_string))
        .or_else(|| Some(body.trim().to_string()).filter(|text| !text.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string())
}

pub(crate) fn transport_error(error: reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Timeout
    } else if error.is_decode() {
        ServiceError::Decode(error.to_string())
    } else {
        ServiceError::Network(error.to_string())
    }
}

fn decode_error(error: reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Decode(error.to_string())
    }
}
