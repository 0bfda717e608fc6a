//! External collaborator contracts.
//!
//! The explorer is a pure in-process view-model; everything that touches the
//! outside world (REST API, page navigation, telemetry) comes in through
//! these traits. `client::ApiClient` implements the network-facing ones.

use crate::relationship::Relationship;
use crate::store::Asset;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Capabilities probed before the graph page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadScope {
    Relationships,
    Assets,
}

impl fmt::Display for ReadScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadScope::Relationships => write!(f, "relationships"),
            ReadScope::Assets => write!(f, "assets"),
        }
    }
}

/// Fetches all relationships touching a given asset id.
///
/// Results are merged into the session's relationship index; merges are
/// idempotent, so there is no cancellation of in-flight fetches and a stale
/// response is safe. Failures surface to the caller; no automatic retry.
#[async_trait]
pub trait RelationshipProvider: Send + Sync {
    async fn fetch_for_asset(&self, asset_id: u64) -> Result<Vec<Relationship>>;
}

/// Lists the root assets shown when nothing has been expanded yet.
#[async_trait]
pub trait AssetProvider: Send + Sync {
    async fn list_root_assets(&self) -> Result<Vec<Asset>>;
}

/// Best-effort capability probe. A denial is logged once at page load; the
/// session does not otherwise branch on it.
#[async_trait]
pub trait PermissionProbe: Send + Sync {
    async fn can_read(&self, scope: ReadScope) -> bool;
}

/// Abstract "change current page" side effect.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}
