//! Authenticated API client with transparent token refresh.
//!
//! Every request carries the stored access token. When the backend answers
//! 401, the client exchanges the refresh token for a new pair and replays
//! the request once:
//!
//! ```text
//! request ──► 401 ──► refresh token stored? ── no ──► clear + LoggedOut, return 401
//!                              │ yes
//!                              ▼
//!                     POST auth/refresh ── fails ──► clear + LoggedOut, return 401
//!                              │ ok
//!                              ▼
//!                     store pair, replay once ──► result (a second 401 is returned as is)
//! ```
//!
//! Refresh exchanges are serialized. A request that waited for another
//! request's exchange replays with the token that exchange produced instead
//! of spending the refresh token again.

use crate::events::{ClientEvent, LogoutReason};
use crate::models::{RefreshRequest, TokenResponse};
use crate::origin::ApiOrigin;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
use crate::{ApiError, ApiResult};
use client_config_and_utils::Config;
use credential_storage::{CredentialPair, CredentialsManager};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    /// Return a 401 as is instead of attempting a refresh. Used by the calls
    /// that issue credentials, where 401 means wrong credentials.
    pub skip_auth_refresh: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query.extend(query);
        self
    }

    pub fn skip_auth_refresh(mut self) -> Self {
        self.skip_auth_refresh = true;
        self
    }
}

/// HTTP client for the backend REST API.
///
/// Shared behind an `Arc` by the session store, the task tracker and the CLI.
pub struct ApiClient {
    origin: ApiOrigin,
    transport: Arc<dyn HttpTransport>,
    credentials: CredentialsManager,
    // Held across refresh exchanges. Holds the access token whose session
    // the last failed refresh ended.
    refresh_lock: Mutex<Option<String>>,
    events: broadcast::Sender<ClientEvent>,
}

impl ApiClient {
    pub fn new(
        origin: ApiOrigin,
        transport: Arc<dyn HttpTransport>,
        credentials: CredentialsManager,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            origin,
            transport,
            credentials,
            refresh_lock: Mutex::new(None),
            events,
        }
    }

    /// Build a client with the reqwest transport from configuration.
    pub fn from_config(config: &Config, credentials: CredentialsManager) -> ApiResult<Self> {
        let origin = ApiOrigin::resolve(config.api_url.as_deref(), config.app_origin.as_deref())?;
        let transport = ReqwestTransport::new(config.request_timeout())?;
        debug!(origin = %origin, "API client configured");
        Ok(Self::new(origin, Arc::new(transport), credentials))
    }

    pub fn origin(&self) -> &ApiOrigin {
        &self.origin
    }

    pub fn credentials(&self) -> &CredentialsManager {
        &self.credentials
    }

    /// Receive refresh and logout notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Persist a freshly issued pair.
    pub fn store_credentials(&self, pair: &CredentialPair) -> ApiResult<()> {
        self.credentials.set_pair(pair)?;
        Ok(())
    }

    /// Clear stored credentials at the user's request.
    pub fn logout(&self) -> ApiResult<()> {
        self.end_session(LogoutReason::UserRequested)
    }

    fn end_session(&self, reason: LogoutReason) -> ApiResult<()> {
        self.credentials.clear()?;
        info!(reason = ?reason, "Session ended");
        self.emit(ClientEvent::LoggedOut { reason });
        Ok(())
    }

    fn emit(&self, event: ClientEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    /// Send a request and return the successful response.
    ///
    /// Non-2xx responses become [`ApiError::Status`]. A 401 triggers at most
    /// one refresh and one replay unless `options.skip_auth_refresh` is set.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
    ) -> ApiResult<ApiResponse> {
        let mut request = ApiRequest {
            method,
            url: self.origin.endpoint(path),
            query: options.query.clone(),
            bearer: self.credentials.access_token()?,
            body,
        };

        let response = self.transport.send(&request).await?;
        if response.status != 401 || options.skip_auth_refresh {
            return into_result(response);
        }

        debug!(method = %request.method, url = %request.url, "Request unauthorized");
        let unauthorized = ApiError::from_response(response.status, response.body);

        let Some(token) = self
            .refresh_after_unauthorized(request.bearer.as_deref())
            .await?
        else {
            return Err(unauthorized);
        };

        request.bearer = Some(token);
        let replayed = self.transport.send(&request).await?;
        if replayed.status == 401 {
            warn!(url = %request.url, "Request still unauthorized after refresh");
        }
        into_result(replayed)
    }

    /// Obtain a usable access token after `rejected` was refused.
    ///
    /// Returns `None` when the session could not be recovered; credentials
    /// have been cleared and `LoggedOut` emitted by then. Requests that were
    /// rejected with the same token as an already ended session return `None`
    /// without emitting a second `LoggedOut`.
    async fn refresh_after_unauthorized(&self, rejected: Option<&str>) -> ApiResult<Option<String>> {
        let mut ended = self.refresh_lock.lock().await;

        if let Some(current) = self.credentials.access_token()? {
            if rejected != Some(current.as_str()) {
                debug!("Access token already replaced, replaying");
                return Ok(Some(current));
            }
        }

        if rejected.is_some() && ended.as_deref() == rejected {
            debug!("Session already ended by a concurrent refresh");
            return Ok(None);
        }

        let Some(refresh_token) = self.credentials.refresh_token()? else {
            warn!("No refresh token stored, ending session");
            *ended = rejected.map(str::to_string);
            self.end_session(LogoutReason::MissingRefreshToken)?;
            return Ok(None);
        };

        match self.exchange_refresh_token(&refresh_token).await {
            Ok(pair) => {
                self.credentials.set_pair(&pair)?;
                *ended = None;
                info!("Access token refreshed");
                self.emit(ClientEvent::CredentialsRefreshed);
                Ok(Some(pair.access_token))
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, ending session");
                *ended = rejected.map(str::to_string);
                self.end_session(LogoutReason::RefreshRejected)?;
                Ok(None)
            }
        }
    }

    /// `POST auth/refresh`, sent straight to the transport without a bearer
    /// header so it can never recurse into another refresh.
    async fn exchange_refresh_token(&self, refresh_token: &str) -> ApiResult<CredentialPair> {
        let mut request = ApiRequest::new(Method::POST, self.origin.endpoint("auth/refresh"));
        request.body = Some(serde_json::to_value(RefreshRequest { refresh_token })?);

        debug!(url = %request.url, "Refreshing token");
        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            return Err(ApiError::from_response(response.status, response.body));
        }

        let tokens: TokenResponse = serde_json::from_str(&response.body)?;
        Ok(tokens.into())
    }

    /// Send a request and decode its JSON body. An empty body decodes as
    /// `null`, so `()` and `Option<T>` work for bodiless responses.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
    ) -> ApiResult<T> {
        let response = self.request(method, path, body, options).await?;
        decode(&response.body)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(Method::GET, path, None, &RequestOptions::default())
            .await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> ApiResult<T> {
        self.send_json(Method::GET, path, None, options).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::POST, path, Some(body), &RequestOptions::default())
            .await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(Method::POST, path, None, &RequestOptions::default())
            .await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::PATCH, path, Some(body), &RequestOptions::default())
            .await
    }

    /// PATCH without a request body.
    pub async fn patch_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> ApiResult<T> {
        self.send_json(Method::PATCH, path, None, options).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(Method::DELETE, path, None, &RequestOptions::default())
            .await
    }
}

fn into_result(response: ApiResponse) -> ApiResult<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response.status, response.body))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    if body.trim().is_empty() {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_str(body)?)
}

/// Validate an identifier used as a single path segment.
pub(crate) fn segment(id: &str) -> ApiResult<&str> {
    if id.is_empty() || id.contains(['/', '?', '#', '%']) || id.trim() != id {
        return Err(ApiError::InvalidPathSegment(id.to_string()));
    }
    Ok(id)
}
