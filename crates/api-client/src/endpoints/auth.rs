//! `auth/*`

use crate::client::RequestOptions;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, User};
use crate::{ApiClient, ApiResult};
use reqwest::Method;
use tracing::debug;

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange email and password for a credential pair. A 401 here means
    /// wrong credentials and is returned as is.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenResponse> {
        debug!(email = %email, "Logging in");
        let body = serde_json::to_value(LoginRequest { email, password })?;
        self.client
            .send_json(
                Method::POST,
                "auth/login",
                Some(body),
                &RequestOptions::new().skip_auth_refresh(),
            )
            .await
    }

    /// Create an account; the backend logs the new user in immediately.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<TokenResponse> {
        debug!(email = %email, "Registering");
        let body = serde_json::to_value(RegisterRequest {
            name,
            email,
            password,
        })?;
        self.client
            .send_json(
                Method::POST,
                "auth/register",
                Some(body),
                &RequestOptions::new().skip_auth_refresh(),
            )
            .await
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.client.get("auth/me").await
    }
}
