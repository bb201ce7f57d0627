use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use wander_core::ports::{AuthError, AuthService, Registration, validate_login};
use wander_core::{CurrentUser, ServiceError};
use wander_shared::dto::{LoginRequest, RegisterRequest, RegisterResponse, clean_token};

use super::ApiClient;
use super::client::{ensure_success, transport_error};

/// Login, registration and logout against the users API.
///
/// A successful login or registration signs the client's session in and
/// persists the credentials when a store is attached.
#[derive(Clone)]
pub struct HttpAuthClient {
    client: ApiClient,
}

impl HttpAuthClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn establish(&self, user: CurrentUser) -> CurrentUser {
        self.client.session().sign_in(user.clone());
        if let Some(store) = self.client.credentials() {
            if let Err(error) = store.save(&user).await {
                tracing::warn!(error = %error, "Failed to persist credentials");
            }
        }
        tracing::info!(username = %user.username, "Signed in");
        user
    }

    async fn post_credentials<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, AuthError> {
        // 401 here means bad credentials, not an expired session.
        let request = self.client.anonymous_request(Method::POST, path).json(body);
        let response = request.send().await.map_err(transport_error)?;
        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(ensure_success(response).await?)
    }
}

#[async_trait]
impl AuthService for HttpAuthClient {
    async fn login(&self, username: &str, password: &str) -> Result<CurrentUser, AuthError> {
        validate_login(username, password)?;
        let response = self
            .post_credentials(
                "/users/login",
                &LoginRequest {
                    username: username.trim().to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Service(transport_error(e)))?;
        let token = clean_token(&body);
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(self.establish(CurrentUser::new(username.trim(), token)).await)
    }

    async fn register(&self, registration: &Registration) -> Result<CurrentUser, AuthError> {
        validate_login(&registration.username, &registration.password)?;
        if registration.email.trim().is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }
        let response = self
            .post_credentials(
                "/users/register",
                &RegisterRequest {
                    username: registration.username.trim().to_string(),
                    email: registration.email.trim().to_string(),
                    password: registration.password.clone(),
                },
            )
            .await?;
        let body: RegisterResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Service(ServiceError::Decode(e.to_string())))?;
        let token = body
            .token
            .map(|t| clean_token(&t))
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let username = body
            .username
            .unwrap_or_else(|| registration.username.trim().to_string());
        let mut user = CurrentUser::new(username, token);
        user.id = body.id;
        Ok(self.establish(user).await)
    }

    async fn logout(&self) {
        self.client.session().invalidate();
        if let Some(store) = self.client.credentials() {
            if let Err(error) = store.clear().await {
                tracing::warn!(error = %error, "Failed to clear stored credentials");
            }
        }
    }
}
