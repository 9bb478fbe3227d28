mod secret_type;
mod vault;

pub use secret_type::Encoding;
pub use secret_type::SecretType;
pub use vault::VaultSecretManager;

use crate::error::Result;

/// Backend able to persist secret material produced by the agent.
#[async_trait::async_trait]
pub trait SecretManager: Send + Sync {
    /// Creates or replaces the secret stored under `name`.
    async fn ensure_secret(&self, name: &str, value: &[u8], secret_type: &SecretType)
        -> Result<()>;

    /// Returns the stored payload, or an empty vector when nothing usable is
    /// stored under `name`. An empty result means "create it".
    async fn load_secret(&self, name: &str, secret_type: &SecretType) -> Result<Vec<u8>>;

    /// Releases backend resources.
    fn close_client(&self);
}
