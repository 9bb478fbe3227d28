use std::collections::BTreeMap;

use anyhow::Context;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use tracing::debug;
use tracing::warn;

/// One data key of a Kubernetes secret.
#[derive(Debug, Clone)]
pub struct KubeSecretKey {
    pub name: String,
    pub namespace: Option<String>,
    pub key: String,
}

impl KubeSecretKey {
    /// Name used for the key in the secret manager when none is given.
    pub fn default_secret_name(&self) -> String {
        format!("{}-{}", self.name, self.key)
    }

    async fn api(&self) -> anyhow::Result<kube::Api<Secret>> {
        let client = kube::Client::try_default().await?;
        Ok(match &self.namespace {
            Some(ns) => kube::Api::namespaced(client, ns),
            None => kube::Api::default_namespaced(client),
        })
    }
}

pub async fn read_kube_secret_key(target: &KubeSecretKey) -> anyhow::Result<Vec<u8>> {
    debug!(secret = %target.name, key = %target.key, "Reading Kubernetes secret");
    let secrets = target.api().await?;

    let secret = secrets.get(&target.name).await?;

    let data = secret.data.context("Kubernetes secret contained no data")?;

    let byte_string = data
        .get(&target.key)
        .context("Kubernetes secret did not contain expected key")?;

    Ok(byte_string.0.clone())
}

pub async fn write_kube_secret_key(
    target: &KubeSecretKey,
    value: Vec<u8>,
    overwrite: bool,
) -> anyhow::Result<()> {
    debug!(secret = %target.name, key = %target.key, "Writing Kubernetes secret");
    let secrets = target.api().await?;

    match secrets.get_opt(&target.name).await? {
        Some(mut existing) => {
            let data = existing.data.get_or_insert_with(BTreeMap::new);
            if data.contains_key(&target.key) && !overwrite {
                return Err(anyhow::anyhow!(
                    "Kube secret key already exists, but not configured to overwrite"
                ));
            }
            if data.contains_key(&target.key) {
                warn!(
                    secret = %target.name,
                    key = %target.key,
                    "Existing key found, overwriting"
                );
            }
            data.insert(target.key.clone(), ByteString(value));
            existing.metadata.managed_fields = None;
            secrets
                .replace(&target.name, &kube::api::PostParams::default(), &existing)
                .await?;
        }
        None => {
            let mut data: BTreeMap<String, ByteString> = BTreeMap::new();
            data.insert(target.key.clone(), ByteString(value));

            let secret = Secret {
                metadata: ObjectMeta {
                    name: Some(target.name.clone()),
                    namespace: target.namespace.clone(),
                    ..Default::default()
                },
                data: Some(data),
                ..Default::default()
            };
            secrets
                .create(&kube::api::PostParams::default(), &secret)
                .await?;
        }
    }

    Ok(())
}
