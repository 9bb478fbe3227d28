use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

pub const DEFAULT_VAULT_ADDRESS: &str = "http://vault-active.vault.svc.cluster.local:8200";
pub const DEFAULT_VAULT_KV_SECRET_PATH: &str = "kube/fr/secret";
pub const DEFAULT_VAULT_KUBE_ROLE: &str = "fr-secret-agent";
pub const DEFAULT_VAULT_KV_MOUNT: &str = "secret";
pub const DEFAULT_VAULT_KUBE_AUTH_MOUNT: &str = "kubernetes";
pub const DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Overrides for the Vault secret manager. Unset and empty fields fall back
/// to the defaults above.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub vault_address: Option<String>,
    pub vault_kv_mount: Option<String>,
    pub vault_kv_secret_path: Option<String>,
    pub vault_kube_role: Option<String>,
    pub vault_kube_auth_mount: Option<String>,
    pub vault_service_account_token_path: Option<PathBuf>,
    /// PEM bundle trusted in addition to the system roots.
    pub vault_ca_cert: Option<PathBuf>,
}

/// Configuration with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub address: String,
    pub kv_mount: String,
    pub kv_secret_path: String,
    pub kube_role: String,
    pub kube_auth_mount: String,
    pub service_account_token_path: PathBuf,
    pub ca_cert: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_hcl(input: &str) -> Result<Self> {
        hcl::from_str(input).map_err(|err| Error::Config(err.to_string()))
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
        Self::from_hcl(&contents)
    }

    /// Layers `overrides` on top of `self`; set, non-empty fields win.
    #[must_use]
    pub fn merge(self, overrides: AppConfig) -> AppConfig {
        AppConfig {
            vault_address: pick(overrides.vault_address, self.vault_address),
            vault_kv_mount: pick(overrides.vault_kv_mount, self.vault_kv_mount),
            vault_kv_secret_path: pick(overrides.vault_kv_secret_path, self.vault_kv_secret_path),
            vault_kube_role: pick(overrides.vault_kube_role, self.vault_kube_role),
            vault_kube_auth_mount: pick(
                overrides.vault_kube_auth_mount,
                self.vault_kube_auth_mount,
            ),
            vault_service_account_token_path: pick_path(
                overrides.vault_service_account_token_path,
                self.vault_service_account_token_path,
            ),
            vault_ca_cert: pick_path(overrides.vault_ca_cert, self.vault_ca_cert),
        }
    }

    #[must_use]
    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig {
            address: or_default(self.vault_address.as_deref(), DEFAULT_VAULT_ADDRESS),
            kv_mount: or_default(self.vault_kv_mount.as_deref(), DEFAULT_VAULT_KV_MOUNT),
            kv_secret_path: or_default(
                self.vault_kv_secret_path.as_deref(),
                DEFAULT_VAULT_KV_SECRET_PATH,
            ),
            kube_role: or_default(self.vault_kube_role.as_deref(), DEFAULT_VAULT_KUBE_ROLE),
            kube_auth_mount: or_default(
                self.vault_kube_auth_mount.as_deref(),
                DEFAULT_VAULT_KUBE_AUTH_MOUNT,
            ),
            service_account_token_path: pick_path(
                self.vault_service_account_token_path.clone(),
                None,
            )
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH)),
            ca_cert: pick_path(self.vault_ca_cert.clone(), None),
        }
    }
}

fn pick(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    preferred.filter(|v| !v.is_empty()).or(fallback)
}

fn pick_path(preferred: Option<PathBuf>, fallback: Option<PathBuf>) -> Option<PathBuf> {
    preferred.filter(|p| !p.as_os_str().is_empty()).or(fallback)
}

fn or_default(value: Option<&str>, default: &str) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(default).to_owned()
}
