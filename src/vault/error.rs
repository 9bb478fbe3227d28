#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("address cannot be used as a base URL")]
    NotABase,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("secret not found at {path}")]
    NotFound { path: String },

    #[error("Vault responded {status}: {}", .errors.join("; "))]
    Api { status: u16, errors: Vec<String> },
}

impl VaultError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
