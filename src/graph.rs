//! Graph view-model builder.
//!
//! Deterministically computes the render-ready `{nodes, links}` pair from the
//! visible-node set, the compiled query, the relationship index and the
//! resource stores. Recomputed from scratch on every state change; the data
//! volumes (hundreds of nodes) make diffing unnecessary.
//!
//! The one rule an implementer must not weaken: a node filter only opens
//! traversal from an already-visible anchor. Without it, any active filter
//! would pull the entire relationship graph into view.

use crate::filters::CompiledQuery;
use crate::index::RelationshipIndex;
use crate::relationship::{Relationship, RelationshipType};
use crate::resource::{ResourceKind, ResourceRef};
use crate::store::Stores;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Rendered width for every link.
const LINK_WIDTH: f32 = 3.0;

/// Node fill color, render-ready as an rgba() string.
///
/// The selection override is checked before the kind-based default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeColor {
    /// The node matching the current preview selection.
    Selected,
    Asset,
    ThreeD,
    /// Time series, files, and anything else.
    Default,
}

impl NodeColor {
    pub fn as_rgba(&self) -> &'static str {
        match self {
            NodeColor::Selected => "rgba(0,0,0,0.5)",
            NodeColor::Asset => "rgba(0,0,255,0.5)",
            NodeColor::ThreeD => "rgba(0,122,0,0.9)",
            NodeColor::Default => "rgba(255,0,0,0.5)",
        }
    }
}

impl Serialize for NodeColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_rgba())
    }
}

/// Link stroke color, render-ready as an rgba() string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkColor {
    /// `isParentOf` pointing at the current preview selection.
    ParentOfSelected,
    ParentOf,
    BelongsTo,
    /// `flowsTo`, `implements`.
    Default,
}

impl LinkColor {
    pub fn as_rgba(&self) -> &'static str {
        match self {
            LinkColor::ParentOfSelected => "rgba(0,255,255,0.5)",
            LinkColor::ParentOf => "rgba(0,0,255,0.9)",
            LinkColor::BelongsTo => "rgba(255,0,0,0.5)",
            LinkColor::Default => "rgba(0,122,0,0.9)",
        }
    }
}

impl Serialize for LinkColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_rgba())
    }
}

/// A node ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub resource: ResourceKind,
    pub resource_id: String,
    pub label: String,
    pub color: NodeColor,
}

/// A link ready for rendering; source/target are node ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLink {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relationship_type: RelationshipType,
    pub external_id: String,
    pub data_set: String,
    pub color: LinkColor,
    pub link_width: f32,
}

/// The rendered graph view-model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Display label for a relationship endpoint.
///
/// Unresolved references render `Loading...`; that is a transient state, not
/// an error.
pub fn build_label(node: &ResourceRef, stores: &Stores) -> String {
    match node.resource {
        ResourceKind::Asset => stores
            .assets
            .get_by_ref(node)
            .map(|asset| asset.name.clone())
            .unwrap_or_else(|| "Loading...".to_string()),
        ResourceKind::ThreeD | ResourceKind::ThreeDRevision => {
            let key = node.three_d_key();
            let model_name = key
                .model_id()
                .and_then(|id| stores.threed.get(id))
                .map(|model| model.name.clone())
                .unwrap_or_else(|| "Loading...".to_string());
            if key.is_node() {
                format!("Node in {model_name}")
            } else {
                format!("Linked to {model_name}")
            }
        }
        ResourceKind::TimeSeries => stores
            .timeseries
            .get_by_resource_id(&node.resource_id)
            .map(|ts| ts.display_name())
            .unwrap_or_else(|| "Loading...".to_string()),
        ResourceKind::File => format!("{}:{}", node.resource, node.resource_id),
    }
}

/// Node color: selection override first, then kind default.
pub fn node_color(node: &ResourceRef, selected_id: Option<u64>) -> NodeColor {
    if let Some(id) = selected_id {
        if node.resource_id == id.to_string() {
            return NodeColor::Selected;
        }
    }
    match node.resource {
        ResourceKind::Asset => NodeColor::Asset,
        ResourceKind::ThreeD | ResourceKind::ThreeDRevision => NodeColor::ThreeD,
        ResourceKind::TimeSeries | ResourceKind::File => NodeColor::Default,
    }
}

/// Link color by relationship type, highlighting `isParentOf` edges into the
/// current selection.
pub fn link_color(link: &Relationship, selected_id: Option<u64>) -> LinkColor {
    match link.relationship_type {
        RelationshipType::IsParentOf => {
            if selected_id.is_some_and(|id| link.target.resource_id == id.to_string()) {
                LinkColor::ParentOfSelected
            } else {
                LinkColor::ParentOf
            }
        }
        RelationshipType::BelongsTo => LinkColor::BelongsTo,
        RelationshipType::FlowsTo | RelationshipType::Implements => LinkColor::Default,
    }
}

/// Build the graph view-model.
///
/// * With an empty visible set, the output is exactly the root asset ids and
///   no links (there is nothing to expand from).
/// * Otherwise, the one-hop neighborhood of the visible set is traversed:
///   a relationship contributes its endpoints and link iff the node-filter
///   side passes (no filters, or a matching endpoint anchored to an
///   already-visible opposite endpoint) and the link-filter side passes.
/// * Self-loops contribute nodes only.
pub fn build_graph(
    visible_node_ids: &BTreeSet<u64>,
    root_asset_ids: &[u64],
    query: &CompiledQuery,
    selected_id: Option<u64>,
    stores: &Stores,
    index: &RelationshipIndex,
) -> GraphData {
    let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
    let mut links: Vec<GraphLink> = Vec::new();

    let expanding = !visible_node_ids.is_empty();
    let seed_ids: Vec<u64> = if expanding {
        visible_node_ids.iter().copied().collect()
    } else {
        root_asset_ids.to_vec()
    };

    // Seed every visible (or root) id as an asset node.
    for id in &seed_ids {
        let node = ResourceRef::asset(*id);
        nodes.insert(node.resource_id.clone(), make_node(&node, selected_id, stores));
    }

    if !expanding {
        return GraphData {
            nodes: nodes.into_values().collect(),
            links,
        };
    }

    // Union of relationship ids touching any visible id, in stable order.
    let mut relationship_ids: BTreeSet<&str> = BTreeSet::new();
    for id in &seed_ids {
        relationship_ids.extend(index.ids_for_resource(*id));
    }

    for relationship_id in relationship_ids {
        let Some(relationship) = index.get(relationship_id) else {
            continue;
        };

        let source_pass = query
            .node_filters
            .iter()
            .any(|filter| filter.matches(&relationship.source, stores));
        let target_pass = query
            .node_filters
            .iter()
            .any(|filter| filter.matches(&relationship.target, stores));

        // A node filter only opens traversal from an already-visible anchor:
        // the matching endpoint must sit opposite a visible one.
        let node_side_ok = query.node_filters.is_empty()
            || (source_pass && resolves_to_visible(&relationship.target, visible_node_ids, stores))
            || (target_pass && resolves_to_visible(&relationship.source, visible_node_ids, stores));

        let link_side_ok = query.link_filters.is_empty()
            || query
                .link_filters
                .iter()
                .any(|filter| filter.matches(relationship));

        if !(node_side_ok && link_side_ok) {
            continue;
        }

        for endpoint in [&relationship.source, &relationship.target] {
            nodes.insert(
                endpoint.resource_id.clone(),
                make_node(endpoint, selected_id, stores),
            );
        }
        if !relationship.is_self_loop() {
            links.push(GraphLink {
                id: relationship.id.clone(),
                source: relationship.source.resource_id.clone(),
                target: relationship.target.resource_id.clone(),
                relationship_type: relationship.relationship_type,
                external_id: relationship.external_id.clone(),
                data_set: relationship.data_set.clone(),
                color: link_color(relationship, selected_id),
                link_width: LINK_WIDTH,
            });
        }
    }

    GraphData {
        nodes: nodes.into_values().collect(),
        links,
    }
}

fn make_node(node: &ResourceRef, selected_id: Option<u64>, stores: &Stores) -> GraphNode {
    GraphNode {
        id: node.resource_id.clone(),
        resource: node.resource,
        resource_id: node.resource_id.clone(),
        label: build_label(node, stores),
        color: node_color(node, selected_id),
    }
}

fn resolves_to_visible(
    node: &ResourceRef,
    visible_node_ids: &BTreeSet<u64>,
    stores: &Stores,
) -> bool {
    stores
        .assets
        .resolve_id(&node.resource_id)
        .is_some_and(|id| visible_node_ids.contains(&id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Asset, ThreeDModel, Timeseries};
    use pretty_assertions::assert_eq;

    fn stores() -> Stores {
        let mut stores = Stores::new();
        stores.assets.insert(Asset {
            id: 1,
            name: "Main Pump".to_string(),
            description: None,
            external_id: None,
        });
        stores.timeseries.insert(Timeseries {
            id: 20,
            name: Some("pressure".to_string()),
            description: None,
        });
        stores.threed.insert(ThreeDModel {
            id: 900,
            name: "Plant Model".to_string(),
        });
        stores
    }

    #[test]
    fn test_asset_label() {
        let stores = stores();
        assert_eq!(build_label(&ResourceRef::asset(1), &stores), "Main Pump");
        assert_eq!(build_label(&ResourceRef::asset(2), &stores), "Loading...");
    }

    #[test]
    fn test_timeseries_label() {
        let stores = stores();
        let known = ResourceRef::new(ResourceKind::TimeSeries, "20");
        let unknown = ResourceRef::new(ResourceKind::TimeSeries, "21");
        assert_eq!(build_label(&known, &stores), "pressure");
        assert_eq!(build_label(&unknown, &stores), "Loading...");
    }

    #[test]
    fn test_three_d_labels() {
        let stores = stores();
        let node = ResourceRef::new(ResourceKind::ThreeD, "7:12:900");
        let revision = ResourceRef::new(ResourceKind::ThreeDRevision, "12:900");
        let unloaded = ResourceRef::new(ResourceKind::ThreeD, "12:901");
        assert_eq!(build_label(&node, &stores), "Node in Plant Model");
        assert_eq!(build_label(&revision, &stores), "Linked to Plant Model");
        assert_eq!(build_label(&unloaded, &stores), "Linked to Loading...");
    }

    #[test]
    fn test_file_label_falls_back_to_pair() {
        let stores = stores();
        let file = ResourceRef::new(ResourceKind::File, "55");
        assert_eq!(build_label(&file, &stores), "file:55");
    }

    #[test]
    fn test_node_color_selection_override() {
        let node = ResourceRef::asset(1);
        assert_eq!(node_color(&node, None), NodeColor::Asset);
        assert_eq!(node_color(&node, Some(1)), NodeColor::Selected);
        assert_eq!(node_color(&node, Some(2)), NodeColor::Asset);

        let ts = ResourceRef::new(ResourceKind::TimeSeries, "20");
        assert_eq!(node_color(&ts, None), NodeColor::Default);
        let model = ResourceRef::new(ResourceKind::ThreeDRevision, "12:900");
        assert_eq!(node_color(&model, None), NodeColor::ThreeD);
    }

    #[test]
    fn test_link_color_highlights_parent_into_selection() {
        let link = Relationship {
            id: "r1".to_string(),
            source: ResourceRef::asset(1),
            target: ResourceRef::asset(2),
            relationship_type: RelationshipType::IsParentOf,
            external_id: "ext".to_string(),
            data_set: "ds".to_string(),
        };
        assert_eq!(link_color(&link, Some(2)), LinkColor::ParentOfSelected);
        assert_eq!(link_color(&link, Some(1)), LinkColor::ParentOf);
        assert_eq!(link_color(&link, None), LinkColor::ParentOf);
    }

    #[test]
    fn test_color_wire_format() {
        let json = serde_json::to_string(&NodeColor::Asset).unwrap();
        assert_eq!(json, r#""rgba(0,0,255,0.5)""#);
        let json = serde_json::to_string(&LinkColor::BelongsTo).unwrap();
        assert_eq!(json, r#""rgba(255,0,0,0.5)""#);
    }
}
