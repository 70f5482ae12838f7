//! Azure Client
//!
//! Main client for the Azure Resource Manager API, combining authentication
//! and HTTP functionality.

use super::auth::AzureCredentials;
use super::http::AzureHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Public-cloud ARM endpoint
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Main ARM client
#[derive(Clone)]
pub struct AzureClient {
    pub credentials: AzureCredentials,
    pub http: AzureHttpClient,
    endpoint: Url,
}

impl AzureClient {
    /// Create a client with credentials resolved from the environment
    pub fn new(endpoint: &str) -> Result<Self> {
        let credentials =
            AzureCredentials::new().context("Failed to initialize Azure credentials")?;
        Self::with_credentials(credentials, endpoint)
    }

    /// Create a client for `endpoint`, which must be an origin without a path.
    /// Tokens are requested for that endpoint.
    pub fn with_credentials(credentials: AzureCredentials, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid ARM endpoint: {}", endpoint))?;
        if endpoint.cannot_be_a_base() {
            return Err(anyhow::anyhow!("Invalid ARM endpoint: {}", endpoint));
        }
        // Resource paths are absolute and would replace any prefix
        if endpoint.path() != "/" || endpoint.query().is_some() {
            return Err(anyhow::anyhow!(
                "ARM endpoint must not have a path or query: {}",
                endpoint
            ));
        }

        Ok(Self {
            credentials: credentials.for_endpoint(&endpoint),
            http: AzureHttpClient::new()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to the ARM API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token).await
    }

    /// Build an ARM URL for an absolute resource path
    pub fn arm_url(&self, path: &str, api_version: &str) -> Result<String> {
        let mut url = self
            .endpoint
            .join(path)
            .with_context(|| format!("Invalid resource path: {}", path))?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url.to_string())
    }

    /// Check that a continuation link stays on the configured endpoint.
    /// Security: the bearer token must never be sent to another host
    pub fn next_link_url(&self, next_link: &str) -> Result<String> {
        let url = Url::parse(next_link).context("Invalid nextLink")?;
        if url.origin() != self.endpoint.origin() {
            return Err(anyhow::anyhow!(
                "nextLink points outside {}",
                self.endpoint.origin().ascii_serialization()
            ));
        }
        Ok(url.to_string())
    }
}
