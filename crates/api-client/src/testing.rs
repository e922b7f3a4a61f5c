//! Scripted transport for tests.
//!
//! Routes are matched on method and endpoint path (relative to `/api/v1`),
//! optionally narrowed to a bearer token. Each route replays its queued
//! replies in order and keeps repeating the last one. Unmatched requests get
//! a 404.

use crate::transport::{ApiRequest, ApiResponse, HttpTransport};
use crate::{ApiError, ApiResult, API_PREFIX};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Response(ApiResponse),
    Error(String),
}

struct Route {
    method: Method,
    path: String,
    bearer: Option<String>,
    replies: VecDeque<Reply>,
}

impl Route {
    fn matches(&self, request: &ApiRequest, path: &str) -> bool {
        self.method == request.method
            && self.path == path
            && self
                .bearer
                .as_ref()
                .map_or(true, |expected| request.bearer.as_ref() == Some(expected))
    }

    fn next_reply(&mut self) -> Option<Reply> {
        if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        }
    }
}

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a reply for any bearer.
    pub fn on(&self, method: Method, path: &str, status: u16, body: impl Into<String>) -> &Self {
        self.push(method, path, None, Reply::Response(ApiResponse::new(status, body)));
        self
    }

    pub fn on_json(&self, method: Method, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.on(method, path, status, body.to_string())
    }

    /// Queue a reply only for requests carrying `bearer`. Checked before
    /// bearer-agnostic routes.
    pub fn on_bearer(
        &self,
        method: Method,
        path: &str,
        bearer: &str,
        status: u16,
        body: impl Into<String>,
    ) -> &Self {
        self.push(
            method,
            path,
            Some(bearer.to_string()),
            Reply::Response(ApiResponse::new(status, body)),
        );
        self
    }

    /// Queue a transport failure.
    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, None, Reply::Error(message.to_string()));
        self
    }

    fn push(&self, method: Method, path: &str, bearer: Option<String>, reply: Reply) {
        let path = path.trim_start_matches('/').to_string();
        let mut routes = self.routes.lock();
        if let Some(route) = routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path && r.bearer == bearer)
        {
            route.replies.push_back(reply);
            return;
        }
        routes.push(Route {
            method,
            path,
            bearer,
            replies: VecDeque::from([reply]),
        });
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received for a method and path.
    pub fn count(&self, method: Method, path: &str) -> usize {
        let path = path.trim_start_matches('/');
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && endpoint_path(&r.url) == path)
            .count()
    }

    fn reply_for(&self, request: &ApiRequest) -> Option<Reply> {
        let path = endpoint_path(&request.url);
        let mut routes = self.routes.lock();

        let specific = routes
            .iter()
            .position(|r| r.bearer.is_some() && r.matches(request, path));
        let index = specific.or_else(|| {
            routes
                .iter()
                .position(|r| r.bearer.is_none() && r.matches(request, path))
        })?;

        routes[index].next_reply()
    }
}

fn endpoint_path(url: &str) -> &str {
    url.split_once(API_PREFIX)
        .map(|(_, rest)| rest.trim_start_matches('/'))
        .unwrap_or(url)
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.reply_for(request) {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Error(message)) => Err(ApiError::Transport(message)),
            None => Ok(ApiResponse::new(404, r#"{"detail":"Not Found"}"#)),
        }
    }
}
