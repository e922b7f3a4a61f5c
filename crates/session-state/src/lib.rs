//! Observable session state for the autoreply client.
//!
//! [`SessionStore`] holds the current user and exposes it through a
//! `tokio::sync::watch` channel. It is an explicit value: create one per
//! client and share it with `Arc`.

mod store;

pub use store::{SessionState, SessionStore};
