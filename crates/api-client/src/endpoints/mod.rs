//! Typed wrappers over the backend REST surface, grouped by resource.
//!
//! Each group borrows the client: `client.comments().stats().await`.

mod admin;
mod agents;
mod auth;
mod billing;
mod comments;
mod integrations;
mod users;

pub use admin::AdminApi;
pub use agents::AgentsApi;
pub use auth::AuthApi;
pub use billing::BillingApi;
pub use comments::CommentsApi;
pub use integrations::IntegrationsApi;
pub use users::UsersApi;

use crate::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn integrations(&self) -> IntegrationsApi<'_> {
        IntegrationsApi::new(self)
    }

    pub fn comments(&self) -> CommentsApi<'_> {
        CommentsApi::new(self)
    }

    pub fn agents(&self) -> AgentsApi<'_> {
        AgentsApi::new(self)
    }

    pub fn billing(&self) -> BillingApi<'_> {
        BillingApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }
}
