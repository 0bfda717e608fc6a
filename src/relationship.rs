//! Relationship records - typed, directed edges between resources.

use crate::resource::ResourceRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of relationship types the platform models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    #[serde(rename = "flowsTo")]
    FlowsTo,
    #[serde(rename = "belongsTo")]
    BelongsTo,
    #[serde(rename = "isParentOf")]
    IsParentOf,
    #[serde(rename = "implements")]
    Implements,
}

impl RelationshipType {
    /// API string representation (matches the wire format).
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::FlowsTo => "flowsTo",
            RelationshipType::BelongsTo => "belongsTo",
            RelationshipType::IsParentOf => "isParentOf",
            RelationshipType::Implements => "implements",
        }
    }

    /// Display name for filter UI entries.
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationshipType::FlowsTo => "Flows To",
            RelationshipType::BelongsTo => "Belongs To",
            RelationshipType::IsParentOf => "Is Parent Of",
            RelationshipType::Implements => "Implements",
        }
    }

    /// All relationship types, in registry order.
    pub fn all() -> &'static [RelationshipType] {
        &[
            RelationshipType::FlowsTo,
            RelationshipType::BelongsTo,
            RelationshipType::IsParentOf,
            RelationshipType::Implements,
        ]
    }

    /// Registry key under the `Relationships` filter category.
    pub fn registry_key(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, directed edge between two resources.
///
/// Immutable once fetched; owned by the [`RelationshipIndex`](crate::index::RelationshipIndex)
/// for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub source: ResourceRef,
    pub target: ResourceRef,
    pub relationship_type: RelationshipType,
    pub external_id: String,
    pub data_set: String,
}

impl Relationship {
    /// Both endpoints share a resource id. Self-loops contribute nodes to the
    /// rendered graph but never links.
    pub fn is_self_loop(&self) -> bool {
        self.source.resource_id == self.target.resource_id
    }
}
