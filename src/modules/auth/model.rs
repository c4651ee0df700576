use serde::{Deserialize, Serialize};

use gatehouse_core::Identity;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenCheckRequest {
    pub token: String,
}

/// Result of a token check. The rejection reason is never included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCheckResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}
