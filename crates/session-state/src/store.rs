//! Session store.

use api_client::models::{User, UserUpdate};
use api_client::{ApiClient, ApiResult, ClientEvent};
use credential_storage::CredentialPair;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    /// A login or registration is in flight.
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

/// Current user plus the operations that change it.
pub struct SessionStore {
    client: Arc<ApiClient>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { client, state }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Current snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_modify(|state| state.loading = loading);
    }

    fn set_user(&self, user: Option<User>) {
        self.state.send_modify(|state| {
            state.user = user;
            state.loading = false;
        });
    }

    /// Log in with email and password, persist the issued pair and load
    /// the user.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        self.set_loading(true);
        let result = self.authenticate(self.client.auth().login(email, password).await).await;
        self.finish(result)
    }

    /// Create an account and log it in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<User> {
        self.set_loading(true);
        let result = self
            .authenticate(self.client.auth().register(name, email, password).await)
            .await;
        self.finish(result)
    }

    async fn authenticate(
        &self,
        tokens: ApiResult<api_client::models::TokenResponse>,
    ) -> ApiResult<User> {
        let pair: CredentialPair = tokens?.into();
        self.client.store_credentials(&pair)?;
        let user = self.client.auth().me().await?;
        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    fn finish(&self, result: ApiResult<User>) -> ApiResult<User> {
        match result {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                self.set_loading(false);
                Err(e)
            }
        }
    }

    /// Load the user for stored credentials.
    ///
    /// Does nothing without an access token. A rejected session clears both
    /// the stored credentials and the user. Transient failures (transport
    /// errors, 5xx) keep the credentials for the next attempt.
    pub async fn fetch_me(&self) -> ApiResult<Option<User>> {
        if !self.client.credentials().has_access_token()? {
            debug!("No stored session");
            return Ok(None);
        }

        match self.client.auth().me().await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Could not load user, keeping stored session");
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, "Stored session unusable, clearing");
                self.client.credentials().clear()?;
                self.set_user(None);
                Err(e)
            }
        }
    }

    /// Clear credentials and the session, and notify subscribers.
    pub fn logout(&self) -> ApiResult<()> {
        self.client.logout()?;
        self.set_user(None);
        Ok(())
    }

    /// Update profile fields and keep the stored user in sync.
    pub async fn update_profile(&self, update: &UserUpdate) -> ApiResult<User> {
        let user = self.client.users().update(update).await?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Clear the user whenever the client ends the session on its own
    /// (refresh failed or no refresh token), so watchers see the transition.
    pub fn follow_client_events(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::downgrade(self);
        let mut events = self.client.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ClientEvent::LoggedOut { reason }) => {
                        let Some(store) = store.upgrade() else { break };
                        debug!(reason = ?reason, "Session ended by client");
                        store.set_user(None);
                    }
                    Ok(ClientEvent::CredentialsRefreshed) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Missed client events");
                        // Re-derive from storage.
                        let Some(store) = store.upgrade() else { break };
                        if !store.client.credentials().has_access_token().unwrap_or(false) {
                            store.set_user(None);
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
