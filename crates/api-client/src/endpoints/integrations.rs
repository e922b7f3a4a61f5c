//! `integrations/*`

use crate::client::segment;
use crate::models::{AgentConfig, AgentConfigUpdate, ConnectUrl, Integration};
use crate::{ApiClient, ApiResult};

pub struct IntegrationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> IntegrationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Integration>> {
        self.client.get("integrations/").await
    }

    /// Deactivate an integration.
    pub async fn delete(&self, integration_id: &str) -> ApiResult<()> {
        let path = format!("integrations/{}", segment(integration_id)?);
        self.client.delete(&path).await
    }

    /// Consent URL for connecting a YouTube channel. Fails with 403 once the
    /// plan's integration limit is reached.
    pub async fn youtube_connect(&self) -> ApiResult<ConnectUrl> {
        self.client.get("integrations/youtube/connect").await
    }

    pub async fn config(&self, integration_id: &str) -> ApiResult<AgentConfig> {
        let path = format!("integrations/{}/config", segment(integration_id)?);
        self.client.get(&path).await
    }

    pub async fn update_config(
        &self,
        integration_id: &str,
        update: &AgentConfigUpdate,
    ) -> ApiResult<AgentConfig> {
        let path = format!("integrations/{}/config", segment(integration_id)?);
        self.client.patch(&path, update).await
    }
}
