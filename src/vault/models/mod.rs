pub mod auth;
pub mod secret;

use serde::Deserialize;
use serde::Serialize;

/// Body Vault sends alongside a non-2xx status.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}
