//! REST client for the asset platform API.
//!
//! Implements the provider traits over HTTP. Note there is deliberately no
//! request timeout on the fetch paths: a hung relationship fetch leaves the
//! affected node labels at `Loading...` rather than failing the page.

use crate::provider::{AssetProvider, PermissionProbe, ReadScope, RelationshipProvider};
use crate::relationship::Relationship;
use crate::store::Asset;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Standard items envelope used by the platform's list endpoints.
#[derive(Debug, Deserialize)]
struct ItemsResponse<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CapabilityEntry {
    acl: String,
    actions: Vec<String>,
}

/// API client bound to one project.
pub struct ApiClient {
    http: Client,
    base_url: String,
    project: String,
    api_key: String,
}

impl ApiClient {
    /// Create a client from `ASSET_API_BASE_URL`, `ASSET_API_PROJECT` and
    /// `ASSET_API_KEY` (a `.env` file is honored if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("ASSET_API_BASE_URL")
            .context("ASSET_API_BASE_URL environment variable not set")?;
        let project = std::env::var("ASSET_API_PROJECT")
            .context("ASSET_API_PROJECT environment variable not set")?;
        let api_key = std::env::var("ASSET_API_KEY")
            .context("ASSET_API_KEY environment variable not set")?;
        Ok(Self::new(base_url, project, api_key))
    }

    pub fn new(
        base_url: impl Into<String>,
        project: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            // Default client: no total-request timeout.
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project: project.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/v1/projects/{}{}",
            self.base_url, self.project, path
        )
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("failed to fetch {path}"))?;
        Self::decode(response, path).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<T> {
        let url = self.url(path);
        let response = self
            .http
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to post to {path}"))?;
        Self::decode(response, path).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response, path: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "API error {} on {}: {}",
                status,
                path,
                body.chars().take(200).collect::<String>()
            ));
        }
        response
            .json()
            .await
            .with_context(|| format!("failed to parse response from {path}"))
    }
}

#[async_trait]
impl RelationshipProvider for ApiClient {
    async fn fetch_for_asset(&self, asset_id: u64) -> Result<Vec<Relationship>> {
        let body = json!({
            "filter": {
                "sourcesOrTargets": [
                    { "resource": "asset", "resourceId": asset_id.to_string() }
                ]
            }
        });
        let response: ItemsResponse<Relationship> =
            self.post("/relationships/list", body).await?;
        Ok(response.items)
    }
}

#[async_trait]
impl AssetProvider for ApiClient {
    async fn list_root_assets(&self) -> Result<Vec<Asset>> {
        let response: ItemsResponse<Asset> = self.get("/assets?root=true").await?;
        Ok(response.items)
    }
}

#[async_trait]
impl PermissionProbe for ApiClient {
    /// Best-effort: a failed probe reports readable rather than blocking the
    /// page, matching the advisory-only role of the check.
    async fn can_read(&self, scope: ReadScope) -> bool {
        let acl = match scope {
            ReadScope::Relationships => "relationshipsAcl",
            ReadScope::Assets => "assetsAcl",
        };
        match self
            .get::<ItemsResponse<CapabilityEntry>>("/capabilities")
            .await
        {
            Ok(response) => response
                .items
                .iter()
                .any(|entry| entry.acl == acl && entry.actions.iter().any(|a| a == "READ")),
            Err(error) => {
                debug!(%scope, %error, "capability probe failed, assuming readable");
                true
            }
        }
    }
}
