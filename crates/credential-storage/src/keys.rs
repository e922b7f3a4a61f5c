//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Short-lived bearer token
    pub const ACCESS_TOKEN: &'static str = "access_token";

    /// Token exchanged for a new pair when the access token expires
    pub const REFRESH_TOKEN: &'static str = "refresh_token";
}
