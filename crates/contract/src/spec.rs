//! Request specification bound to a base URI

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use apitest_common::EnvironmentConfig;

use crate::error::{ContractError, ContractResult};

/// Reusable request template: an HTTP client plus the base URI every
/// path is resolved against.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    client: Client,
    base: Url,
}

impl RequestSpec {
    /// Build from the resolved environment config
    pub fn new(config: &EnvironmentConfig) -> ContractResult<Self> {
        let base = parse_base(&config.base_uri)?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        debug!(
            "Request spec bound to {} (timeout {}s)",
            base,
            config.request_timeout.as_secs()
        );
        Ok(Self { client, base })
    }

    pub fn base_uri(&self) -> &Url {
        &self.base
    }

    /// Resolve a resource path such as `posts/1` against the base URI
    pub fn url(&self, path: &str) -> ContractResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ContractError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn request(&self, method: Method, path: &str) -> ContractResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    pub fn get(&self, path: &str) -> ContractResult<RequestBuilder> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> ContractResult<RequestBuilder> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> ContractResult<RequestBuilder> {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> ContractResult<RequestBuilder> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> ContractResult<RequestBuilder> {
        self.request(Method::DELETE, path)
    }
}

/// Parse the base URI, making sure its path ends in `/` so that joins
/// append to it instead of replacing the last segment.
fn parse_base(uri: &str) -> ContractResult<Url> {
    let mut base = Url::parse(uri.trim()).map_err(|e| ContractError::InvalidBaseUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    if base.cannot_be_a_base() {
        return Err(ContractError::InvalidBaseUri {
            uri: uri.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Read a response body and decode it as JSON
pub async fn decode<T: DeserializeOwned>(response: Response) -> ContractResult<T> {
    let url = response.url().to_string();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| ContractError::Decode { url, source })
}
