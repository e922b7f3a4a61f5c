//! Client lifecycle notifications.

use serde::{Deserialize, Serialize};

/// Why the stored credentials were discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// The user asked to log out.
    UserRequested,
    /// A request was rejected and no refresh token was stored.
    MissingRefreshToken,
    /// The refresh exchange failed.
    RefreshRejected,
}

impl LogoutReason {
    /// True when the logout was not asked for and the user has to
    /// authenticate again.
    pub fn is_forced(&self) -> bool {
        !matches!(self, LogoutReason::UserRequested)
    }
}

impl std::fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            LogoutReason::UserRequested => "logged out",
            LogoutReason::MissingRefreshToken => "session expired and no refresh token is stored",
            LogoutReason::RefreshRejected => "session expired and could not be renewed",
        };
        f.write_str(text)
    }
}

/// Broadcast by [`ApiClient`](crate::ApiClient) to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A new credential pair was obtained and stored.
    CredentialsRefreshed,
    /// Credentials were cleared; the user must log in again.
    LoggedOut { reason: LogoutReason },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_reasons() {
        assert!(!LogoutReason::UserRequested.is_forced());
        assert!(LogoutReason::MissingRefreshToken.is_forced());
        assert!(LogoutReason::RefreshRejected.is_forced());
    }

    #[test]
    fn test_reason_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&LogoutReason::RefreshRejected).unwrap(),
            "\"refresh_rejected\""
        );
    }
}
