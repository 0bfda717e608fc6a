//! Resource references - the endpoints of relationships.
//!
//! A `ResourceRef` identifies one end of a relationship: a resource kind plus
//! an opaque id string. For assets the id is either the numeric internal id
//! or the asset's external id; for 3D resources it may encode a composite
//! colon-separated key (`..:modelId` with an optional node segment).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of resource kinds a relationship endpoint can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "asset")]
    Asset,
    #[serde(rename = "timeSeries")]
    TimeSeries,
    #[serde(rename = "threeD")]
    ThreeD,
    #[serde(rename = "threeDRevision")]
    ThreeDRevision,
    #[serde(rename = "file")]
    File,
}

impl ResourceKind {
    /// API string representation (matches the wire format).
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Asset => "asset",
            ResourceKind::TimeSeries => "timeSeries",
            ResourceKind::ThreeD => "threeD",
            ResourceKind::ThreeDRevision => "threeDRevision",
            ResourceKind::File => "file",
        }
    }

    /// Whether clicking a node of this kind expands the graph.
    ///
    /// Files and 3D resources render but are inert.
    pub fn is_expandable(&self) -> bool {
        matches!(self, ResourceKind::Asset | ResourceKind::TimeSeries)
    }

    /// Path segment used when navigating to a resource page.
    pub fn route_segment(&self) -> &'static str {
        match self {
            ResourceKind::Asset => "asset",
            ResourceKind::TimeSeries => "timeseries",
            ResourceKind::ThreeD | ResourceKind::ThreeDRevision => "threed",
            ResourceKind::File => "file",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One endpoint of a relationship. Identity is `(resource, resource_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub resource: ResourceKind,
    pub resource_id: String,
}

impl ResourceRef {
    pub fn new(resource: ResourceKind, resource_id: impl Into<String>) -> Self {
        Self {
            resource,
            resource_id: resource_id.into(),
        }
    }

    /// Shorthand for an asset endpoint with a numeric id.
    pub fn asset(id: u64) -> Self {
        Self::new(ResourceKind::Asset, id.to_string())
    }

    /// Parse this endpoint's id as a composite 3D key.
    ///
    /// Only meaningful for `ThreeD` / `ThreeDRevision` endpoints.
    pub fn three_d_key(&self) -> ThreeDKey<'_> {
        ThreeDKey::parse(&self.resource_id)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.resource_id)
    }
}

/// Composite colon-separated key for 3D endpoints.
///
/// The model id is the last segment; a three-segment key designates a node
/// inside a model revision rather than a link to the revision itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreeDKey<'a> {
    segments: Vec<&'a str>,
}

impl<'a> ThreeDKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            segments: raw.split(':').collect(),
        }
    }

    /// The model id encoded in the key, if the last segment is numeric.
    pub fn model_id(&self) -> Option<u64> {
        self.segments.last().and_then(|s| s.parse().ok())
    }

    /// True when the key addresses a node within a revision.
    pub fn is_node(&self) -> bool {
        self.segments.len() == 3
    }
}
