//! asset-relations - relationship-graph view-model for industrial asset
//! exploration.
//!
//! Assembles a filtered, colored, interactively-expandable graph over
//! heterogeneous resources (assets, time series, 3D models and nodes, files)
//! from a relationship index, and maintains the client-side visibility and
//! query state driving it.
//!
//! # Architecture
//!
//! ```text
//! ExplorerSession (interaction controller)
//!   ├── Stores          per-kind entity caches (assets, time series, 3D, types)
//!   ├── RelationshipIndex  records by id + resource-id buckets
//!   ├── view state      visible-node set, root ids, query tokens, preview
//!   └── graph()
//!         ├── FilterRegistry::build  (Resource / Relationships / Types)
//!         ├── CompiledQuery::compile (tokens -> node/link predicates)
//!         └── build_graph            (anchor-gated one-hop expansion)
//! ```
//!
//! User interactions (node click, query edit, hide) mutate the session;
//! [`ExplorerSession::graph`] then recomputes the render-ready
//! [`GraphData`] from scratch. Network access happens only through the
//! [`provider`] traits; [`client::ApiClient`] is the REST implementation.
//!
//! # Example
//!
//! ```no_run
//! use asset_relations::{ApiClient, Collaborators, ExplorerSession, LogTracker};
//! use std::sync::Arc;
//!
//! # struct NoNav;
//! # impl asset_relations::Navigator for NoNav { fn push(&self, _p: &str) {} }
//! # async fn run() -> anyhow::Result<()> {
//! let api = Arc::new(ApiClient::from_env()?);
//! let mut session = ExplorerSession::new(
//!     "plant-a",
//!     Collaborators {
//!         relationships: api.clone(),
//!         assets: api.clone(),
//!         permissions: api,
//!         navigator: Arc::new(NoNav),
//!         tracker: Arc::new(LogTracker::new()),
//!     },
//! );
//! session.load().await?;
//! let graph = session.graph();
//! println!("{} nodes, {} links", graph.nodes.len(), graph.links.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod filters;
pub mod graph;
pub mod index;
pub mod provider;
pub mod relationship;
pub mod resource;
pub mod session;
pub mod store;
pub mod telemetry;

// Re-exports
pub use client::ApiClient;
pub use error::{ExplorerError, ExplorerResult};
pub use filters::{CompiledQuery, FilterEntry, FilterRegistry, KindClass, LinkFilter, NodeFilter};
pub use graph::{build_graph, GraphData, GraphLink, GraphNode, LinkColor, NodeColor};
pub use index::RelationshipIndex;
pub use provider::{AssetProvider, Navigator, PermissionProbe, ReadScope, RelationshipProvider};
pub use relationship::{Relationship, RelationshipType};
pub use resource::{ResourceKind, ResourceRef, ThreeDKey};
pub use session::{ClickOutcome, Collaborators, ExplorerSession, NodePreview};
pub use store::{
    Asset, AssetStore, Stores, ThreeDModel, ThreeDStore, Timeseries, TimeseriesStore,
    TypeDefinition, TypeStore,
};
pub use telemetry::{init_tracing, LogTracker, NoopTracker, RecordingTracker, UsageTracker};
