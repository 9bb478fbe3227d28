use secrecy::ExposeSecret;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::SecretManager;
use super::SecretType;
use crate::config::ResolvedConfig;
use crate::error::Error;
use crate::error::Result;
use crate::identity::TokenSource;
use crate::vault::models::auth::kubernetes::PostKubernetesLoginRequest;
use crate::vault::models::secret::kv2::PostKv2DataRequest;
use crate::vault::VaultClient;

const VALUE_KEY: &str = "value";
const SECRET_TYPE_KEY: &str = "secret_type";

/// Stores secrets in a HashiCorp Vault KV v2 engine, one record per name
/// under `<kv_secret_path>/<name>`.
pub struct VaultSecretManager {
    client: VaultClient,
    secret_path: String,
    kv_mount: String,
}

impl VaultSecretManager {
    /// Builds the HTTP client and logs in with the Kubernetes auth method.
    pub async fn connect(config: &ResolvedConfig, identity: &dyn TokenSource) -> Result<Self> {
        info!(
            backend = "vault",
            address = %config.address,
            role = %config.kube_role,
            "Connecting to Vault"
        );
        let mut client = build_client(config)?;

        if config.kube_role.is_empty() {
            return Err(Error::AuthMethodInit("no role name was provided".to_owned()));
        }
        if config.kube_auth_mount.is_empty() {
            return Err(Error::AuthMethodInit(
                "no auth mount path was provided".to_owned(),
            ));
        }

        let jwt = identity
            .service_account_token()
            .await
            .map_err(|source| Error::ServiceAccountToken {
                path: identity.location().to_path_buf(),
                source,
            })?;
        let request = PostKubernetesLoginRequest {
            role: config.kube_role.clone(),
            jwt: jwt.expose_secret().to_owned(),
        };

        let response = client
            .kubernetes_login(&config.kube_auth_mount, &request)
            .await
            .map_err(Error::Login)?;
        let auth = response
            .auth
            .filter(|auth| !auth.client_token.is_empty())
            .ok_or(Error::NoAuthInfo)?;
        debug!(
            backend = "vault",
            policies = ?auth.policies,
            lease_duration = auth.lease_duration,
            "Logged in with Kubernetes auth"
        );
        client.set_token(auth.client_token.into());

        Ok(Self::from_client(
            client,
            config.kv_secret_path.clone(),
            config.kv_mount.clone(),
        ))
    }

    /// Wraps an already authenticated client.
    pub fn from_client(client: VaultClient, secret_path: String, kv_mount: String) -> Self {
        Self {
            client,
            secret_path,
            kv_mount,
        }
    }

    #[must_use]
    pub fn secret_path(&self, name: &str) -> String {
        format!("{}/{}", self.secret_path, name)
    }
}

#[async_trait::async_trait]
impl SecretManager for VaultSecretManager {
    async fn ensure_secret(
        &self,
        name: &str,
        value: &[u8],
        secret_type: &SecretType,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidName);
        }

        let encoded = secret_type.encoding().encode(value).ok_or_else(|| {
            Error::NonUtf8Payload {
                name: name.to_owned(),
                secret_type: secret_type.to_string(),
            }
        })?;

        let mut data = Map::new();
        data.insert(VALUE_KEY.to_owned(), Value::String(encoded));
        data.insert(
            SECRET_TYPE_KEY.to_owned(),
            Value::String(secret_type.to_string()),
        );

        let path = self.secret_path(name);
        debug!(backend = "vault", path = %path, %secret_type, "Writing secret");
        self.client
            .kv2_put(&self.kv_mount, &path, &PostKv2DataRequest { data })
            .await
            .map_err(|source| Error::Store {
                path: path.clone(),
                source,
            })?;

        Ok(())
    }

    async fn load_secret(&self, name: &str, secret_type: &SecretType) -> Result<Vec<u8>> {
        let path = self.secret_path(name);
        debug!(backend = "vault", path = %path, %secret_type, "Reading secret");

        // Any read failure is reported as "absent" so the caller creates it
        let response = match self.client.kv2_get(&self.kv_mount, &path).await {
            Ok(response) => response,
            Err(err) if err.is_not_found() => {
                debug!(backend = "vault", path = %path, "Secret does not exist yet");
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!(
                    backend = "vault",
                    path = %path,
                    error = %err,
                    "Failed reading secret, treating it as absent"
                );
                return Ok(Vec::new());
            }
        };

        let value = response
            .data
            .and_then(|data| data.data)
            .and_then(|mut fields| fields.remove(VALUE_KEY));
        let Some(Value::String(value)) = value else {
            debug!(
                backend = "vault",
                path = %path,
                "Secret has no string value field, treating it as absent"
            );
            return Ok(Vec::new());
        };

        secret_type
            .encoding()
            .decode(&value)
            .map_err(|source| Error::Decode {
                name: name.to_owned(),
                source,
            })
    }

    fn close_client(&self) {}
}

fn build_client(config: &ResolvedConfig) -> Result<VaultClient> {
    let addr =
        url::Url::parse(&config.address).map_err(|err| Error::ClientInit(err.to_string()))?;

    let mut builder = reqwest::Client::builder();
    if let Some(path) = &config.ca_cert {
        let pem = std::fs::read(path)
            .map_err(|err| Error::ClientInit(format!("{}: {err}", path.display())))?;
        let certs = reqwest::Certificate::from_pem_bundle(&pem)
            .map_err(|err| Error::ClientInit(format!("{}: {err}", path.display())))?;
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }
    let http = builder
        .build()
        .map_err(|err| Error::ClientInit(err.to_string()))?;

    Ok(VaultClient::with_http(addr, http))
}
