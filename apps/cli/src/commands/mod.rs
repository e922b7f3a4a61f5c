//! CLI command implementations.

mod admin;
mod agents;
mod auth;
mod billing;
mod comments;
mod integrations;

pub use admin::{admin_set_active, admin_stats, admin_system, admin_users};
pub use agents::{
    agents_config, agents_config_update, agents_run, agents_status, agents_stop, agents_toggle,
};
pub use auth::{login, logout, profile_update, register, status};
pub use billing::{billing_cancel, billing_checkout, billing_plans, billing_subscription};
pub use comments::{
    comments_approve, comments_edit, comments_list, comments_reject, comments_stats,
};
pub use integrations::{
    integrations_config, integrations_connect, integrations_delete, integrations_list,
};

use crate::output::OutputFormat;
use anyhow::Result;
use api_client::models::User;
use api_client::{ApiClient, ClientEvent, LogoutReason};
use client_config_and_utils::{Config, Paths};
use credential_storage::create_credentials_manager;
use session_state::SessionStore;
use std::io::{self, Write};
use std::sync::Arc;
use task_tracker::{TaskTracker, TrackerConfig};
use tokio::sync::broadcast;

/// Everything a command needs: the client, the session and output settings.
pub struct Context {
    pub config: Config,
    pub client: Arc<ApiClient>,
    pub session: SessionStore,
    pub format: OutputFormat,
    events: broadcast::Receiver<ClientEvent>,
}

impl Context {
    pub fn new(paths: &Paths, config: Config, format: OutputFormat) -> Result<Self> {
        paths.ensure_dirs()?;
        let credentials = create_credentials_manager(paths)?;
        let client = Arc::new(ApiClient::from_config(&config, credentials)?);
        let events = client.subscribe();
        let session = SessionStore::new(client.clone());

        Ok(Self {
            config,
            client,
            session,
            format,
            events,
        })
    }

    pub fn tracker(&self) -> TaskTracker {
        TaskTracker::new(self.client.clone(), TrackerConfig::from_config(&self.config))
    }

    /// The logged-in user, or an error telling the user to log in.
    pub async fn require_user(&self) -> Result<User> {
        match self.session.fetch_me().await? {
            Some(user) => Ok(user),
            None => anyhow::bail!("Not logged in. Run `autoreply login` first."),
        }
    }

    pub async fn require_admin(&self) -> Result<User> {
        let user = self.require_user().await?;
        if !user.is_admin {
            anyhow::bail!("Admin access required");
        }
        Ok(user)
    }

    /// Reason for a logout the client forced during this run, if any.
    pub fn forced_logout(&mut self) -> Option<LogoutReason> {
        first_forced_logout(&mut self.events)
    }
}

/// Drain pending client events and return the reason of the first forced
/// logout among them.
fn first_forced_logout(events: &mut broadcast::Receiver<ClientEvent>) -> Option<LogoutReason> {
    let mut forced = None;
    while let Ok(event) = events.try_recv() {
        if let ClientEvent::LoggedOut { reason } = event {
            if forced.is_none() && reason.is_forced() {
                forced = Some(reason);
            }
        }
    }
    forced
}

/// Read one trimmed line from stdin after printing `label`.
pub fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Use `value` when given, otherwise prompt for it. Empty input is an error.
pub fn value_or_prompt(value: Option<String>, label: &str, field: &str) -> Result<String> {
    let value = match value {
        Some(value) => value.trim().to_string(),
        None => prompt(label)?,
    };
    if value.is_empty() {
        anyhow::bail!("{} is required", field);
    }
    Ok(value)
}

/// Read a password without echo.
pub fn prompt_password(label: &str) -> Result<String> {
    let password = rpassword::prompt_password(label)?;
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }
    Ok(password)
}

/// Ask user for confirmation.
pub fn confirm(prompt_text: &str) -> bool {
    print!("{} [y/N] ", prompt_text);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
