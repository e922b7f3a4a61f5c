//! `comments/*`

use crate::client::{segment, RequestOptions};
use crate::models::{Comment, CommentFilter, DashboardStats, MessageResponse, ReplyEdit};
use crate::{ApiClient, ApiResult};

pub struct CommentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CommentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Newest first.
    pub async fn list(&self, filter: &CommentFilter) -> ApiResult<Vec<Comment>> {
        let options = RequestOptions::new().with_query(filter.to_query());
        self.client.get_with("comments/", &options).await
    }

    pub async fn stats(&self) -> ApiResult<DashboardStats> {
        self.client.get("comments/stats").await
    }

    /// Approve the pending reply and queue it for sending.
    pub async fn approve(&self, comment_id: &str) -> ApiResult<MessageResponse> {
        let path = format!("comments/{}/approve", segment(comment_id)?);
        self.client.patch_empty(&path, &RequestOptions::default()).await
    }

    pub async fn reject(&self, comment_id: &str) -> ApiResult<MessageResponse> {
        let path = format!("comments/{}/reject", segment(comment_id)?);
        self.client.patch_empty(&path, &RequestOptions::default()).await
    }

    /// Replace the text of the pending reply.
    pub async fn edit(&self, comment_id: &str, text: &str) -> ApiResult<MessageResponse> {
        let path = format!("comments/{}/edit", segment(comment_id)?);
        self.client
            .patch(
                &path,
                &ReplyEdit {
                    text: text.to_string(),
                },
            )
            .await
    }
}
