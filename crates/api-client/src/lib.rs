//! HTTP client for the autoreply backend.
//!
//! This crate provides:
//! - Base origin resolution (`/api/v1` prefix, https upgrade)
//! - An authenticated client that refreshes expired access tokens and
//!   replays the failed request once
//! - Lifecycle events (`CredentialsRefreshed`, `LoggedOut`)
//! - Typed endpoint groups and models for the REST surface

mod client;
pub mod endpoints;
mod error;
mod events;
pub mod models;
mod origin;
mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::{ApiClient, RequestOptions};
pub use error::{ApiError, ApiResult};
pub use events::{ClientEvent, LogoutReason};
pub use origin::{ApiOrigin, API_PREFIX};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};

pub use reqwest::Method;
