//! `users/*`

use crate::models::{Plan, User, UserUpdate};
use crate::{ApiClient, ApiResult};

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.client.get("users/me").await
    }

    pub async fn update(&self, update: &UserUpdate) -> ApiResult<User> {
        self.client.patch("users/me", update).await
    }

    /// Permanently delete the account.
    pub async fn delete_account(&self) -> ApiResult<()> {
        self.client.delete("users/me").await
    }

    /// Active plans.
    pub async fn plans(&self) -> ApiResult<Vec<Plan>> {
        self.client.get("users/plans").await
    }
}
