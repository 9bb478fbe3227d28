use std::path::Path;
use std::path::PathBuf;

use secrecy::SecretString;
use tracing::debug;

/// Source of the Kubernetes service account JWT presented to Vault.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    /// Where the token comes from, for error reporting.
    fn location(&self) -> &Path;

    async fn service_account_token(&self) -> std::io::Result<SecretString>;
}

/// Token projected into the pod filesystem.
#[derive(Debug, Clone)]
pub struct MountedToken {
    pub path: PathBuf,
}

impl MountedToken {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl TokenSource for MountedToken {
    fn location(&self) -> &Path {
        &self.path
    }

    async fn service_account_token(&self) -> std::io::Result<SecretString> {
        debug!(path = %self.path.display(), "Reading service account token");
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let token = contents.trim();
        if token.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "service account token is empty",
            ));
        }
        Ok(SecretString::from(token.to_owned()))
    }
}

/// A token handed over by the caller.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    fn location(&self) -> &Path {
        Path::new("<static>")
    }

    async fn service_account_token(&self) -> std::io::Result<SecretString> {
        Ok(SecretString::from(self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;
    use tempfile::NamedTempFile;

    use super::*;

    #[tokio::test]
    async fn reads_trimmed_token_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "eyJhbGciOiJSUzI1NiJ9.payload.sig").unwrap();

        let source = MountedToken::new(file.path());
        let token = source.service_account_token().await.unwrap();

        assert_eq!(token.expose_secret(), "eyJhbGciOiJSUzI1NiJ9.payload.sig");
        assert_eq!(source.location(), file.path());
    }

    #[tokio::test]
    async fn empty_token_file_is_an_error() {
        let file = NamedTempFile::new().unwrap();

        let result = MountedToken::new(file.path()).service_account_token().await;

        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn missing_token_file_is_an_error() {
        let result = MountedToken::new("/nonexistent/serviceaccount/token")
            .service_account_token()
            .await;

        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
    }
}
