//! Base origin resolution.
//!
//! The origin is resolved once when the client is built:
//! - missing or blank values fall back to [`DEFAULT_API_URL`]
//! - surrounding whitespace and trailing slashes are removed
//! - `http://` becomes `https://` when the hosting context is itself https,
//!   so a secure app never talks to its API in clear text

use crate::ApiResult;
use client_config_and_utils::DEFAULT_API_URL;
use url::Url;

/// Versioned prefix every endpoint lives under.
pub const API_PREFIX: &str = "/api/v1";

/// Resolved API origin, e.g. `https://api.example.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOrigin {
    origin: String,
}

impl ApiOrigin {
    /// Resolve the configured origin against the hosting context.
    pub fn resolve(configured: Option<&str>, app_origin: Option<&str>) -> ApiResult<Self> {
        let trimmed = configured
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/');

        let secure_context = app_origin
            .map(str::trim)
            .is_some_and(|origin| origin.to_ascii_lowercase().starts_with("https://"));

        let origin = match trimmed.strip_prefix("http://") {
            Some(rest) if secure_context => format!("https://{}", rest),
            _ => trimmed.to_string(),
        };

        Url::parse(&origin)?;

        Ok(Self { origin })
    }

    pub fn as_str(&self) -> &str {
        &self.origin
    }

    /// `{origin}/api/v1`
    pub fn base_url(&self) -> String {
        format!("{}{}", self.origin, API_PREFIX)
    }

    /// Absolute URL for an endpoint path such as `auth/login` or `/comments/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}

impl Default for ApiOrigin {
    fn default() -> Self {
        Self {
            origin: DEFAULT_API_URL.to_string(),
        }
    }
}

impl std::fmt::Display for ApiOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.origin)
    }
}
