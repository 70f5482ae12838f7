//! Azure Authentication
//!
//! Resolves ARM access tokens from a static token, a service principal
//! (client credentials flow), or the Azure CLI, and reads the default
//! subscription from the environment or the Azure CLI profile.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;

/// Public-cloud ARM token audience
const DEFAULT_AUDIENCE: &str = "https://management.azure.com/";

/// Default Microsoft identity platform authority
const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Where tokens come from
#[derive(Debug, Clone)]
enum TokenSource {
    /// Pre-issued bearer token
    Static(String),
    /// Client credentials flow against the identity platform
    ServicePrincipal {
        authority: String,
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    /// `az account get-access-token`
    AzureCli,
}

/// Azure credentials holder with token caching
#[derive(Clone)]
pub struct AzureCredentials {
    source: Arc<TokenSource>,
    /// ARM origin tokens are issued for, with a trailing slash
    audience: String,
    http: reqwest::Client,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Deserialize)]
struct ClientCredentialsResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct CliTokenResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    /// Epoch seconds (newer CLI versions)
    #[serde(default)]
    expires_on: Option<i64>,
    /// Local time, `2024-01-01 12:00:00.000000`
    #[serde(default, rename = "expiresOn")]
    expires_on_local: Option<String>,
}

impl AzureCredentials {
    /// Pick a token source from the environment.
    ///
    /// `AZURE_ACCESS_TOKEN` wins, then a service principal from
    /// `ARM_`/`AZURE_` `TENANT_ID`, `CLIENT_ID` and `CLIENT_SECRET`, then the
    /// Azure CLI.
    pub fn new() -> Result<Self> {
        if let Some(token) = env_var(&["AZURE_ACCESS_TOKEN"]) {
            tracing::info!("Using access token from AZURE_ACCESS_TOKEN");
            return Self::from_static(&token);
        }

        let tenant = env_var(&["ARM_TENANT_ID", "AZURE_TENANT_ID"]);
        let client = env_var(&["ARM_CLIENT_ID", "AZURE_CLIENT_ID"]);
        let secret = env_var(&["ARM_CLIENT_SECRET", "AZURE_CLIENT_SECRET"]);
        if let (Some(tenant_id), Some(client_id), Some(client_secret)) = (tenant, client, secret) {
            let authority =
                env_var(&["AZURE_AUTHORITY_HOST"]).unwrap_or_else(|| DEFAULT_AUTHORITY.to_string());
            tracing::info!("Using service principal {} in tenant {}", client_id, tenant_id);
            return Self::service_principal(&authority, &tenant_id, &client_id, &client_secret);
        }

        tracing::info!("Using Azure CLI credentials");
        Self::with_source(TokenSource::AzureCli)
    }

    /// Credentials that always hand out `token`
    pub fn from_static(token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(anyhow::anyhow!("Access token is empty"));
        }
        Self::with_source(TokenSource::Static(token.trim().to_string()))
    }

    /// Client credentials flow against `authority`
    pub fn service_principal(
        authority: &str,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self> {
        Self::with_source(TokenSource::ServicePrincipal {
            authority: authority.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    fn with_source(source: TokenSource) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tazure/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            source: Arc::new(source),
            audience: DEFAULT_AUDIENCE.to_string(),
            http,
            token_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Request tokens for the ARM endpoint at `endpoint` (sovereign clouds).
    ///
    /// Returns credentials with an empty token cache when the audience changes.
    pub fn for_endpoint(mut self, endpoint: &Url) -> Self {
        let audience = format!("{}/", endpoint.origin().ascii_serialization());
        if audience != self.audience {
            tracing::debug!("Token audience set to {}", audience);
            self.audience = audience;
            self.token_cache = Arc::new(RwLock::new(None));
        }
        self
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Get an access token for API calls
    pub async fn get_token(&self) -> Result<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let (token, ttl) = self.fetch_token().await?;
        let lifetime = ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        let now = Instant::now();
        let expires_at = now
            .checked_add(lifetime)
            .or_else(|| now.checked_add(DEFAULT_TOKEN_TTL))
            .unwrap_or(now);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }

        tracing::debug!("New token cached, expires in ~{} minutes", lifetime.as_secs() / 60);

        Ok(token)
    }

    /// Force refresh the token
    pub async fn refresh_token(&self) -> Result<String> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }

        self.get_token().await
    }

    async fn fetch_token(&self) -> Result<(String, Duration)> {
        match self.source.as_ref() {
            TokenSource::Static(token) => Ok((token.clone(), DEFAULT_TOKEN_TTL)),
            TokenSource::ServicePrincipal {
                authority,
                tenant_id,
                client_id,
                client_secret,
            } => {
                let url = format!("{}/{}/oauth2/v2.0/token", authority, tenant_id);
                let scope = format!("{}.default", self.audience);
                tracing::debug!("POST {} (scope {})", url, scope);

                let response = self
                    .http
                    .post(&url)
                    .form(&[
                        ("grant_type", "client_credentials"),
                        ("client_id", client_id.as_str()),
                        ("client_secret", client_secret.as_str()),
                        ("scope", scope.as_str()),
                    ])
                    .send()
                    .await
                    .context("Failed to send token request")?;

                let status = response.status();
                if !status.is_success() {
                    // Security: the body may echo request details, log only the status
                    tracing::error!("Token request failed: {}", status);
                    return Err(anyhow::anyhow!("Token request failed: {}", status));
                }

                let body: ClientCredentialsResponse = response
                    .json()
                    .await
                    .context("Failed to parse token response")?;
                let ttl = body
                    .expires_in
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_TOKEN_TTL);
                Ok((body.access_token, ttl))
            }
            TokenSource::AzureCli => {
                let output = tokio::process::Command::new("az")
                    .args([
                        "account",
                        "get-access-token",
                        "--resource",
                        self.audience.as_str(),
                        "--output",
                        "json",
                    ])
                    .output()
                    .await
                    .context("Failed to run 'az'. Install the Azure CLI or set ARM_CLIENT_ID")?;

                if !output.status.success() {
                    return Err(anyhow::anyhow!(
                        "Failed to get access token from Azure CLI. Run 'az login'"
                    ));
                }

                parse_cli_token(&output.stdout, Utc::now().timestamp())
            }
        }
    }
}

/// Parse `az account get-access-token` output into a token and its TTL
fn parse_cli_token(stdout: &[u8], now: i64) -> Result<(String, Duration)> {
    let body: CliTokenResponse =
        serde_json::from_slice(stdout).context("Failed to parse Azure CLI token output")?;

    let expires_at = body.expires_on.or_else(|| {
        let local = body.expires_on_local.as_deref()?;
        let naive = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M:%S%.f").ok()?;
        Local
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.timestamp())
    });

    let ttl = match expires_at {
        Some(at) if at > now => Duration::from_secs((at - now) as u64),
        Some(_) => Duration::ZERO,
        None => DEFAULT_TOKEN_TTL,
    };
    Ok((body.access_token, ttl))
}

/// First non-empty value among `names`
fn env_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Get the Azure CLI configuration directory
pub fn get_azure_config_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("AZURE_CONFIG_DIR") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|p| p.join(".azure"))
}

/// Validate a subscription id (hyphenated GUID, as ARM prints it)
pub fn validate_subscription_id(subscription: &str) -> bool {
    subscription.len() == 36 && uuid::Uuid::try_parse(subscription).is_ok()
}

#[derive(Deserialize)]
struct AzureProfile {
    #[serde(default)]
    subscriptions: Vec<ProfileSubscription>,
}

#[derive(Deserialize)]
struct ProfileSubscription {
    id: String,
    #[serde(default, rename = "isDefault")]
    is_default: bool,
}

/// Read the default subscription.
///
/// Checks `ARM_SUBSCRIPTION_ID` and `AZURE_SUBSCRIPTION_ID`, then the default
/// subscription of the Azure CLI profile.
/// Security: Validates the id format before returning
pub fn get_default_subscription() -> Option<String> {
    for name in ["ARM_SUBSCRIPTION_ID", "AZURE_SUBSCRIPTION_ID"] {
        if let Ok(subscription) = std::env::var(name) {
            if validate_subscription_id(&subscription) {
                return Some(subscription);
            }
            tracing::warn!("Invalid subscription id format in {}", name);
        }
    }

    let profile_path = get_azure_config_dir()?.join("azureProfile.json");
    let content = std::fs::read_to_string(profile_path).ok()?;
    default_subscription_from_profile(&content)
}

fn default_subscription_from_profile(content: &str) -> Option<String> {
    // The CLI writes this file with a UTF-8 BOM
    let content = content.trim_start_matches('\u{feff}');
    let profile: AzureProfile = match serde_json::from_str(content) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Failed to parse azureProfile.json: {}", e);
            return None;
        }
    };

    profile
        .subscriptions
        .into_iter()
        .find(|s| s.is_default)
        .map(|s| s.id)
        .filter(|id| validate_subscription_id(id))
}
