use std::fmt;

use serde::Deserialize;
use serde::Serialize;

#[derive(Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostKubernetesLoginRequest {
    /// Name of the role against which the login is being attempted.
    pub role: String,
    /// Service account JWT used to access the TokenReview API of the cluster.
    pub jwt: String,
}

impl fmt::Debug for PostKubernetesLoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostKubernetesLoginRequest")
            .field("role", &self.role)
            .field("jwt", &"[REDACTED]")
            .finish()
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostLoginResponse {
    pub request_id: Option<String>,
    pub auth: Option<AuthInfo>,
}

#[derive(Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub client_token: String,
    pub accessor: Option<String>,
    #[serde(default)]
    pub policies: Vec<String>,
    #[serde(default)]
    pub token_policies: Vec<String>,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
}

impl fmt::Debug for AuthInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthInfo")
            .field("client_token", &"[REDACTED]")
            .field("accessor", &self.accessor)
            .field("policies", &self.policies)
            .field("token_policies", &self.token_policies)
            .field("lease_duration", &self.lease_duration)
            .field("renewable", &self.renewable)
            .finish()
    }
}
