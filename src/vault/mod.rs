mod error;
pub mod models;

use reqwest::RequestBuilder;
use secrecy::ExposeSecret;
use secrecy::SecretString;
use tracing::debug;

pub use crate::vault::error::VaultError;
use crate::vault::models::auth::kubernetes::*;
use crate::vault::models::secret::kv2::*;
use crate::vault::models::ErrorResponse;

const TOKEN_HEADER: &str = "X-Vault-Token";

pub struct VaultClient {
    pub addr: url::Url,
    pub http: reqwest::Client,
    token: Option<SecretString>,
}

impl VaultClient {
    pub fn new(addr: url::Url) -> Self {
        let http = reqwest::Client::new();
        Self::with_http(addr, http)
    }

    /// Uses a preconfigured HTTP client, e.g. one trusting a private CA.
    ///
    /// A trailing slash is added to the address; endpoints keep any path
    /// prefix it carries.
    pub fn with_http(mut addr: url::Url, http: reqwest::Client) -> Self {
        if !addr.path().ends_with('/') {
            let path = format!("{}/", addr.path());
            addr.set_path(&path);
        }
        Self {
            addr,
            http,
            token: None,
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    pub async fn kubernetes_login(
        &self,
        mount: &str,
        request: &PostKubernetesLoginRequest,
    ) -> Result<PostLoginResponse, VaultError> {
        let path = format!("auth/{mount}/login");
        let endpoint = self.endpoint(&["auth", mount, "login"])?;

        let response = self.http.post(endpoint).json(request).send().await?;
        let response = Self::check_status(response, &path).await?.json().await?;

        Ok(response)
    }

    pub async fn kv2_put(
        &self,
        mount: &str,
        path: &str,
        request: &PostKv2DataRequest,
    ) -> Result<(), VaultError> {
        let endpoint = self.endpoint(&[mount, "data", path])?;

        let response = self
            .authorize(self.http.put(endpoint).json(request))
            .send()
            .await?;
        Self::check_status(response, path).await?.text().await?;

        Ok(())
    }

    pub async fn kv2_get(&self, mount: &str, path: &str) -> Result<GetKv2DataResponse, VaultError> {
        let endpoint = self.endpoint(&[mount, "data", path])?;

        let response = self.authorize(self.http.get(endpoint)).send().await?;
        let response = Self::check_status(response, path).await?.json().await?;

        Ok(response)
    }

    /// Builds `v1/<parts>` below the address. Each `/`-separated segment is
    /// percent-encoded, so `?`, `#` and `%` stay part of the secret path.
    pub fn endpoint(&self, parts: &[&str]) -> Result<url::Url, VaultError> {
        let mut endpoint = self.addr.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| VaultError::NotABase)?
            .pop_if_empty()
            .push("v1")
            .extend(
                parts
                    .iter()
                    .flat_map(|part| part.split('/'))
                    .filter(|segment| !segment.is_empty()),
            );

        Ok(endpoint)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token.expose_secret()),
            None => request,
        }
    }

    async fn check_status(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, VaultError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ErrorResponse = response.json().await.unwrap_or_default();
        debug!(status = status.as_u16(), path, "Vault request rejected");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(VaultError::NotFound {
                path: path.to_owned(),
            });
        }

        Err(VaultError::Api {
            status: status.as_u16(),
            errors: body.errors,
        })
    }
}
