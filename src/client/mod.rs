pub mod error;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use url::Url;

use crate::config::StoreConfig;
use error::{classify_rest_failure, RestErrorBody, StoreError};

/// One configured connection to the remote managed store.
///
/// Built once at startup and passed explicitly into every consumer; there is
/// no module-level shared client. All requests carry the store API key, and
/// authenticated requests additionally carry the session bearer token so the
/// remote row-level policies scope what the caller can see.
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl StoreClient {
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.url.is_empty() {
            return Err(StoreError::ConfigMissing("GESTAO_STORE_URL"));
        }
        if config.anon_key.is_empty() {
            return Err(StoreError::ConfigMissing("GESTAO_STORE_ANON_KEY"));
        }
        Url::parse(&config.url).map_err(|_| StoreError::InvalidStoreUrl)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    /// Request against the relational REST surface (`rest/v1/<table>`).
    /// Without a session token the request runs with the anonymous key only.
    pub(crate) fn rest(&self, method: Method, table: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        self.request(method, url, token)
    }

    /// Request against the authentication surface (`auth/v1/<path>`).
    pub(crate) fn auth(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}/auth/v1/{}", self.base_url, path);
        self.request(method, url, token)
    }

    fn request(&self, method: Method, url: String, token: Option<&str>) -> RequestBuilder {
        let request = self.http.request(method, url).header("apikey", &self.anon_key);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request.bearer_auth(&self.anon_key),
        }
    }

    /// Passes successful responses through and classifies everything else
    /// into a structured [`StoreError`].
    pub(crate) async fn expect_success(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.json::<RestErrorBody>().await.unwrap_or_default();
        Err(classify_rest_failure(status, body))
    }
}
