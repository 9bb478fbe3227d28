//! Keeps secret-agent material in HashiCorp Vault's KV v2 engine, logging in
//! with the pod's Kubernetes service account.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod identity;
pub mod secrets;
pub mod vault;

pub use config::AppConfig;
pub use config::ResolvedConfig;
pub use error::Error;
pub use error::Result;
pub use identity::MountedToken;
pub use identity::StaticToken;
pub use identity::TokenSource;
pub use secrets::SecretManager;
pub use secrets::SecretType;
pub use secrets::VaultSecretManager;
