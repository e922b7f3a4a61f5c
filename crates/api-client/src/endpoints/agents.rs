//! `agents/*`

use crate::client::{segment, RequestOptions};
use crate::models::{
    AgentConfig, AgentConfigUpdate, AgentRunResponse, AgentStatusResponse, AgentStopResponse,
    AgentToggleResponse,
};
use crate::{ApiClient, ApiResult};

pub struct AgentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AgentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Queue a background run; returns the task id to poll.
    pub async fn run(&self, integration_id: &str) -> ApiResult<AgentRunResponse> {
        let path = format!("agents/run/{}", segment(integration_id)?);
        self.client.post_empty(&path).await
    }

    pub async fn status(&self, task_id: &str) -> ApiResult<AgentStatusResponse> {
        let path = format!("agents/status/{}", segment(task_id)?);
        self.client.get(&path).await
    }

    /// Ask the backend to revoke a running task.
    pub async fn stop(&self, task_id: &str) -> ApiResult<AgentStopResponse> {
        let path = format!("agents/stop/{}", segment(task_id)?);
        self.client.post_empty(&path).await
    }

    /// Flip the integration's active flag.
    pub async fn toggle(&self, integration_id: &str) -> ApiResult<AgentToggleResponse> {
        let path = format!("agents/toggle/{}", segment(integration_id)?);
        self.client
            .patch_empty(&path, &RequestOptions::default())
            .await
    }

    pub async fn config(&self, integration_id: &str) -> ApiResult<AgentConfig> {
        let path = format!("agents/config/{}", segment(integration_id)?);
        self.client.get(&path).await
    }

    pub async fn update_config(
        &self,
        integration_id: &str,
        update: &AgentConfigUpdate,
    ) -> ApiResult<AgentConfig> {
        let path = format!("agents/config/{}", segment(integration_id)?);
        self.client.patch(&path, update).await
    }
}
