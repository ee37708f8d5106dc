use serde::{Deserialize, Serialize};

use super::user_info::UserInfo;

/// Token pair plus user, returned by login and register.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Short-lived bearer token for API calls
    pub access_token: String,
    /// Long-lived token used to mint new access tokens
    pub refresh_token: String,
    /// Access token lifetime in seconds, when the backend reports it
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: UserInfo,
}
