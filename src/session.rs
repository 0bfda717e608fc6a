//! Explorer session - the interaction controller.
//!
//! Owns the resource stores, the relationship index and the view state
//! (visible-node set, root ids, query tokens, preview card), and drives them
//! from user interactions. All mutation happens on discrete interaction or
//! fetch-completion calls; the view-model rebuild in [`ExplorerSession::graph`]
//! is synchronous and performs no I/O.

use crate::error::{ExplorerError, ExplorerResult};
use crate::filters::{CompiledQuery, FilterRegistry};
use crate::graph::{build_graph, GraphData};
use crate::index::RelationshipIndex;
use crate::provider::{AssetProvider, Navigator, PermissionProbe, ReadScope, RelationshipProvider};
use crate::resource::{ResourceKind, ResourceRef};
use crate::store::Stores;
use crate::telemetry::UsageTracker;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

/// The currently selected node, shown in a side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePreview {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub kind: ResourceKind,
}

/// What a node click did.
///
/// `NotLoaded` is an advisory the caller should surface ("not yet loaded");
/// `Ignored` is silent. Unresolved time-series clicks are `Ignored` while
/// unresolved asset clicks are `NotLoaded` - the asymmetry is a recorded
/// product decision, kept as distinct variants rather than unified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The node joined the visible set (and a preview was opened).
    Expanded { id: u64 },
    /// Asset not yet in the store; nothing changed.
    NotLoaded,
    /// Inert node kind, or an unresolved time series.
    Ignored,
}

/// External collaborators wired into a session.
pub struct Collaborators {
    pub relationships: Arc<dyn RelationshipProvider>,
    pub assets: Arc<dyn AssetProvider>,
    pub permissions: Arc<dyn PermissionProbe>,
    pub navigator: Arc<dyn Navigator>,
    pub tracker: Arc<dyn UsageTracker>,
}

pub struct ExplorerSession {
    tenant: String,
    stores: Stores,
    index: RelationshipIndex,
    visible_node_ids: BTreeSet<u64>,
    root_asset_ids: Vec<u64>,
    query: Vec<String>,
    preview: Option<NodePreview>,
    collaborators: Collaborators,
}

impl ExplorerSession {
    pub fn new(tenant: impl Into<String>, collaborators: Collaborators) -> Self {
        Self {
            tenant: tenant.into(),
            stores: Stores::new(),
            index: RelationshipIndex::new(),
            visible_node_ids: BTreeSet::new(),
            root_asset_ids: Vec::new(),
            query: Vec::new(),
            preview: None,
            collaborators,
        }
    }

    /// Page-load sequence: usage event, best-effort permission probe (a
    /// denial is logged, not acted on), then the root-asset fetch.
    pub async fn load(&mut self) -> ExplorerResult<()> {
        self.collaborators
            .tracker
            .track("RelationshipPage.Load", json!({}));

        for scope in [ReadScope::Relationships, ReadScope::Assets] {
            if !self.collaborators.permissions.can_read(scope).await {
                warn!(%scope, "missing read capability, graph may render empty");
            }
        }

        let roots = self
            .collaborators
            .assets
            .list_root_assets()
            .await
            .map_err(|source| ExplorerError::RootAssetFetch { source })?;
        self.root_asset_ids = roots.iter().map(|asset| asset.id).collect();
        self.stores.assets.extend(roots);
        Ok(())
    }

    /// Handle a node click.
    ///
    /// Only expandable kinds ([`ResourceKind::is_expandable`]) react: assets
    /// expand and trigger a relationship fetch; time series expand without
    /// fetching; files and 3D resources are inert. View state is updated
    /// *before* the fetch completes, so a fetch failure surfaces as `Err`
    /// without removing anything already rendered.
    pub async fn click_node(&mut self, node: &ResourceRef) -> ExplorerResult<ClickOutcome> {
        if !node.resource.is_expandable() {
            return Ok(ClickOutcome::Ignored);
        }
        match node.resource {
            ResourceKind::Asset => {
                let Some(asset) = self.stores.assets.get_by_ref(node).cloned() else {
                    return Ok(ClickOutcome::NotLoaded);
                };
                self.visible_node_ids.insert(asset.id);
                self.preview = Some(NodePreview {
                    id: asset.id,
                    title: asset.name.clone(),
                    description: asset
                        .description
                        .clone()
                        .unwrap_or_else(|| "N/A".to_string()),
                    kind: ResourceKind::Asset,
                });
                self.collaborators.tracker.track(
                    "RelationshipPage.AssetClicked",
                    json!({ "assetId": node.resource_id }),
                );

                let batch = self
                    .collaborators
                    .relationships
                    .fetch_for_asset(asset.id)
                    .await
                    .map_err(|source| ExplorerError::RelationshipFetch {
                        asset_id: asset.id,
                        source,
                    })?;
                self.index.merge(batch, &self.stores.assets);
                Ok(ClickOutcome::Expanded { id: asset.id })
            }
            ResourceKind::TimeSeries => {
                let Some(ts) = self
                    .stores
                    .timeseries
                    .get_by_resource_id(&node.resource_id)
                    .cloned()
                else {
                    // Silent no-op, unlike the asset arm.
                    return Ok(ClickOutcome::Ignored);
                };
                self.visible_node_ids.insert(ts.id);
                self.preview = Some(NodePreview {
                    id: ts.id,
                    title: ts.display_name(),
                    description: ts.description.clone().unwrap_or_else(|| "N/A".to_string()),
                    kind: ResourceKind::TimeSeries,
                });
                self.collaborators.tracker.track(
                    "RelationshipPage.TimeseriesClicked",
                    json!({ "timeseries": node.resource_id }),
                );
                Ok(ClickOutcome::Expanded { id: ts.id })
            }
            // Unreachable past the expandability gate.
            _ => Ok(ClickOutcome::Ignored),
        }
    }

    /// Remove an id from the visible set, clearing the preview if it
    /// referenced that id.
    pub fn remove_from_visible(&mut self, id: u64) {
        self.collaborators
            .tracker
            .track("RelationshipPage.RemoveFromVisibleNode", json!({ "id": id }));
        self.visible_node_ids.remove(&id);
        if self.preview.as_ref().is_some_and(|p| p.id == id) {
            self.preview = None;
        }
    }

    pub fn hide_preview(&mut self) {
        self.preview = None;
    }

    /// Navigate to the previewed resource's page. Returns the pushed path,
    /// or `None` when no preview is open.
    pub fn go_to_preview(&mut self) -> Option<String> {
        let preview = self.preview.as_ref()?;
        self.collaborators.tracker.track(
            "RelationshipPage.GoToResource",
            json!({ "id": preview.id, "type": preview.kind.route_segment() }),
        );
        let path = format!(
            "/{}/{}/{}",
            self.tenant,
            preview.kind.route_segment(),
            preview.id
        );
        self.collaborators.navigator.push(&path);
        Some(path)
    }

    pub fn set_query(&mut self, tokens: Vec<String>) {
        self.query = tokens;
    }

    /// Build the graph view-model from current state.
    ///
    /// The filter registry (including the dynamic `Types` category) is
    /// rebuilt from current store contents on every call.
    pub fn graph(&self) -> GraphData {
        let registry = FilterRegistry::build(&self.stores);
        let compiled = CompiledQuery::compile(&self.query, &registry);
        build_graph(
            &self.visible_node_ids,
            &self.root_asset_ids,
            &compiled,
            self.preview.as_ref().map(|p| p.id),
            &self.stores,
            &self.index,
        )
    }

    /// Current filter registry, for rendering the filter picker.
    pub fn filter_registry(&self) -> FilterRegistry {
        FilterRegistry::build(&self.stores)
    }

    // Read accessors for the embedding application.

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Mutable store access: time series, 3D models and types are populated
    /// by the embedding application, not by this session.
    pub fn stores_mut(&mut self) -> &mut Stores {
        &mut self.stores
    }

    pub fn visible_node_ids(&self) -> &BTreeSet<u64> {
        &self.visible_node_ids
    }

    pub fn root_asset_ids(&self) -> &[u64] {
        &self.root_asset_ids
    }

    pub fn query(&self) -> &[String] {
        &self.query
    }

    pub fn preview(&self) -> Option<&NodePreview> {
        self.preview.as_ref()
    }

    pub fn relationship_count(&self) -> usize {
        self.index.len()
    }
}
