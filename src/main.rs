#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod k8s;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use secret_agent_vault::AppConfig;
use secret_agent_vault::MountedToken;
use secret_agent_vault::SecretManager;
use secret_agent_vault::SecretType;
use secret_agent_vault::VaultSecretManager;
use tokio::io::AsyncWriteExt;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_subscriber::prelude::*;

use crate::k8s::read_kube_secret_key;
use crate::k8s::write_kube_secret_key;
use crate::k8s::KubeSecretKey;

#[allow(clippy::doc_markdown)]
/// Store and load secret-agent secrets in HashiCorp Vault
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Args {
    /// HCL file with secret manager settings. Flags take precedence.
    #[clap(long, env = "SECRET_AGENT_VAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Address of the Vault server expressed as a URL and port.
    #[clap(long, env = "VAULT_ADDR")]
    vault_addr: Option<String>,

    /// Mount path of the KV v2 secrets engine.
    #[clap(long)]
    kv_mount: Option<String>,

    /// Path inside the KV engine under which secrets are kept.
    #[clap(long)]
    kv_secret_path: Option<String>,

    /// Vault role bound to this service account.
    #[clap(long)]
    kube_role: Option<String>,

    /// Mount path of the Kubernetes auth method.
    #[clap(long)]
    kube_auth_mount: Option<String>,

    /// Service account token presented at login.
    #[clap(long)]
    token_path: Option<PathBuf>,

    /// PEM bundle used to verify the Vault server certificate.
    #[clap(long, env = "VAULT_CACERT")]
    ca_cert: Option<PathBuf>,

    /// Level directive for stderr logging.
    #[clap(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Create or update a secret.
    Ensure {
        #[clap(long)]
        name: String,
        /// One of keystore, pem, password; anything else is stored as base64.
        #[clap(long = "type", default_value = "keystore")]
        secret_type: SecretType,
        #[clap(long, conflicts_with = "file", required_unless_present = "file")]
        value: Option<String>,
        #[clap(long)]
        file: Option<PathBuf>,
    },
    /// Print a stored secret, or write it to a file.
    Load {
        #[clap(long)]
        name: String,
        #[clap(long = "type", default_value = "keystore")]
        secret_type: SecretType,
        #[clap(long)]
        out: Option<PathBuf>,
    },
    /// Copy a key of a Kubernetes secret into Vault.
    Push {
        #[clap(flatten)]
        target: KubeTarget,
        #[clap(long = "type", default_value = "keystore")]
        secret_type: SecretType,
    },
    /// Copy a secret from Vault into a key of a Kubernetes secret.
    Pull {
        #[clap(flatten)]
        target: KubeTarget,
        #[clap(long = "type", default_value = "keystore")]
        secret_type: SecretType,
        /// Replace the key when the Kubernetes secret already holds it.
        #[clap(long)]
        overwrite: bool,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct KubeTarget {
    /// Kubernetes secret name.
    #[clap(long)]
    secret: String,
    /// Data key inside the Kubernetes secret.
    #[clap(long)]
    key: String,
    #[clap(long)]
    namespace: Option<String>,
    /// Name in Vault; defaults to `<secret>-<key>`.
    #[clap(long)]
    name: Option<String>,
}

impl KubeTarget {
    fn split(self) -> (KubeSecretKey, String) {
        let target = KubeSecretKey {
            name: self.secret,
            namespace: self.namespace,
            key: self.key,
        };
        let name = self.name.unwrap_or_else(|| target.default_secret_name());
        (target, name)
    }
}

impl From<&Args> for AppConfig {
    fn from(args: &Args) -> Self {
        Self {
            vault_address: args.vault_addr.clone(),
            vault_kv_mount: args.kv_mount.clone(),
            vault_kv_secret_path: args.kv_secret_path.clone(),
            vault_kube_role: args.kube_role.clone(),
            vault_kube_auth_mount: args.kube_auth_mount.clone(),
            vault_service_account_token_path: args.token_path.clone(),
            vault_ca_cert: args.ca_cert.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level)?;

    let file_config = match &args.config {
        Some(path) => AppConfig::from_file(path).await?,
        None => AppConfig::default(),
    };
    let config = file_config.merge(AppConfig::from(&args)).resolve();

    info!(phase = "login", "Connecting to Vault");
    let identity = MountedToken::new(config.service_account_token_path.clone());
    let manager: Box<dyn SecretManager> = Box::new(
        VaultSecretManager::connect(&config, &identity)
            .await
            .map_err(|err| {
                error!(phase = "login", "Failed connecting to Vault");
                err
            })?,
    );

    let result = run(manager.as_ref(), args.command).await;
    manager.close_client();
    result
}

async fn run(manager: &dyn SecretManager, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Ensure {
            name,
            secret_type,
            value,
            file,
        } => {
            let payload = match (value, file) {
                (Some(value), _) => value.into_bytes(),
                (None, Some(path)) => tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("Failed reading {}", path.display()))?,
                (None, None) => {
                    return Err(anyhow::anyhow!("Either --value or --file is required"))
                }
            };
            manager.ensure_secret(&name, &payload, &secret_type).await?;
            info!(phase = "ensure", secret = %name, "Stored secret");
        }
        Command::Load {
            name,
            secret_type,
            out,
        } => {
            let payload = manager.load_secret(&name, &secret_type).await?;
            if payload.is_empty() {
                warn!(phase = "load", secret = %name, "Secret not found");
                return Ok(());
            }
            match out {
                Some(path) => tokio::fs::write(&path, &payload)
                    .await
                    .with_context(|| format!("Failed writing {}", path.display()))?,
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&payload).await?;
                    stdout.flush().await?;
                }
            }
        }
        Command::Push {
            target,
            secret_type,
        } => {
            let (target, name) = target.split();
            info!(phase = "push", secret = %name, "Reading Kubernetes secret");
            let payload = read_kube_secret_key(&target).await.map_err(|err| {
                error!(phase = "push", "Failed reading Kubernetes secret");
                err
            })?;
            manager.ensure_secret(&name, &payload, &secret_type).await?;
            info!(phase = "push", secret = %name, "Stored secret in Vault");
        }
        Command::Pull {
            target,
            secret_type,
            overwrite,
        } => {
            let (target, name) = target.split();
            info!(phase = "pull", secret = %name, "Loading secret from Vault");
            let payload = manager.load_secret(&name, &secret_type).await?;
            if payload.is_empty() {
                return Err(anyhow::anyhow!("Secret {name} not found in Vault"));
            }
            write_kube_secret_key(&target, payload, overwrite)
                .await
                .map_err(|err| {
                    error!(phase = "pull", "Failed writing Kubernetes secret");
                    err
                })?;
            info!(phase = "pull", secret = %name, "Wrote secret to Kubernetes");
        }
    }

    Ok(())
}

fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let fmt_filter = tracing_subscriber::filter::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .parse_lossy(log_level);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(fmt_filter);

    let subscriber = tracing_subscriber::Registry::default().with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
