use std::path::PathBuf;

use crate::vault::VaultError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Vault: unable to initialize Vault client: {0}")]
    ClientInit(String),

    #[error("Vault: unable to initialize Kubernetes auth method: {0}")]
    AuthMethodInit(String),

    #[error("Vault: unable to read service account token from {path}: {source}")]
    ServiceAccountToken {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Vault: unable to log in with Kubernetes auth: {0}")]
    Login(#[source] VaultError),

    #[error("Vault: no auth info was returned after login")]
    NoAuthInfo,

    #[error("Vault: secret name must not be empty")]
    InvalidName,

    #[error("Vault: {secret_type} payload for {name} is not valid UTF-8")]
    NonUtf8Payload { name: String, secret_type: String },

    #[error("Vault: unable to write secret at {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: VaultError,
    },

    #[error("Vault: unable to decode secret {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: data_encoding::DecodeError,
    },

    #[error("unable to load configuration: {0}")]
    Config(String),
}
