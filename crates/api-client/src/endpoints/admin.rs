//! `admin/*`. Every call requires an admin account; others get 403.

use crate::client::{segment, RequestOptions};
use crate::models::{AdminStats, AdminUser, MessageResponse, SystemStatus};
use crate::{ApiClient, ApiResult};

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ApiResult<AdminStats> {
        self.client.get("admin/stats").await
    }

    pub async fn users(&self) -> ApiResult<Vec<AdminUser>> {
        self.client.get("admin/users").await
    }

    pub async fn set_user_active(&self, user_id: &str, is_active: bool) -> ApiResult<MessageResponse> {
        let path = format!("admin/users/{}/status", segment(user_id)?);
        self.client
            .patch_empty(&path, &RequestOptions::new().query("is_active", is_active))
            .await
    }

    pub async fn system_status(&self) -> ApiResult<SystemStatus> {
        self.client.get("admin/system-status").await
    }
}
