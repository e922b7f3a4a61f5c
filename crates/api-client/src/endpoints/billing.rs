//! `billing/*`

use crate::models::{CheckoutRequest, CheckoutResponse, MessageResponse, Plan, Subscription};
use crate::{ApiClient, ApiResult};

pub struct BillingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BillingApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Active plans, cheapest first.
    pub async fn plans(&self) -> ApiResult<Vec<Plan>> {
        self.client.get("billing/plans").await
    }

    /// `None` when the user has never subscribed.
    pub async fn subscription(&self) -> ApiResult<Option<Subscription>> {
        self.client.get("billing/subscription").await
    }

    pub async fn checkout(&self, request: &CheckoutRequest) -> ApiResult<CheckoutResponse> {
        self.client.post("billing/checkout", request).await
    }

    /// Cancel at the end of the current period.
    pub async fn cancel(&self) -> ApiResult<MessageResponse> {
        self.client.post_empty("billing/cancel").await
    }
}
