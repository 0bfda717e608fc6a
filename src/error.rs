//! Error types for the explorer session.
//!
//! Provider-level failures (HTTP, auth) travel as `anyhow::Error` inside the
//! provider traits; the session wraps them into `ExplorerError` so callers
//! can tell which operation failed. Fetch failures are surfaced, never
//! retried, and never roll back already-applied view state.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("failed to list root assets")]
    RootAssetFetch {
        #[source]
        source: anyhow::Error,
    },

    #[error("relationship fetch for asset {asset_id} failed")]
    RelationshipFetch {
        asset_id: u64,
        #[source]
        source: anyhow::Error,
    },
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;
