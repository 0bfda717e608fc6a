//! In-memory resource stores.
//!
//! Per-kind caches of fetched entities, keyed by numeric id. Stores are
//! populated by providers (or directly by the embedding application) and read
//! synchronously by the view-model builder; a miss is a transient
//! `Loading...` state, never an error.

use crate::resource::ResourceRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node in the physical-equipment hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// A time series attached to an asset. Name and description are optional on
/// the wire; display falls back to the numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeseries {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Timeseries {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// A 3D model known to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeDModel {
    pub id: u64,
    pub name: String,
}

/// A type definition, used only for dynamic filter generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub id: u64,
    pub name: String,
}

/// Reference to a type from an asset-to-type association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: u64,
}

/// One entry of an asset's type associations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTypeAssignment {
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

/// Asset cache with an external-id secondary index.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    items: HashMap<u64, Asset>,
    by_external_id: HashMap<String, u64>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an asset, maintaining the external-id index.
    pub fn insert(&mut self, asset: Asset) {
        if let Some(ext) = &asset.external_id {
            self.by_external_id.insert(ext.clone(), asset.id);
        }
        self.items.insert(asset.id, asset);
    }

    pub fn extend(&mut self, assets: impl IntoIterator<Item = Asset>) {
        for asset in assets {
            self.insert(asset);
        }
    }

    pub fn get(&self, id: u64) -> Option<&Asset> {
        self.items.get(&id)
    }

    /// Resolve an endpoint id string to a numeric asset id.
    ///
    /// External-id lookup wins over numeric parse, matching the API's
    /// id-or-external-id addressing.
    pub fn resolve_id(&self, resource_id: &str) -> Option<u64> {
        self.by_external_id
            .get(resource_id)
            .copied()
            .or_else(|| resource_id.parse().ok())
    }

    /// Resolve an endpoint straight to the cached asset, if present.
    pub fn get_by_ref(&self, node: &ResourceRef) -> Option<&Asset> {
        self.resolve_id(&node.resource_id)
            .and_then(|id| self.items.get(&id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Time-series cache. This subsystem never fetches time series itself; it
/// consumes whatever the embedding application has already cached.
#[derive(Debug, Clone, Default)]
pub struct TimeseriesStore {
    items: HashMap<u64, Timeseries>,
}

impl TimeseriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ts: Timeseries) {
        self.items.insert(ts.id, ts);
    }

    pub fn get(&self, id: u64) -> Option<&Timeseries> {
        self.items.get(&id)
    }

    /// Lookup by an endpoint's id string (numeric only for time series).
    pub fn get_by_resource_id(&self, resource_id: &str) -> Option<&Timeseries> {
        resource_id.parse().ok().and_then(|id| self.items.get(&id))
    }
}

/// 3D model cache, keyed by model id.
#[derive(Debug, Clone, Default)]
pub struct ThreeDStore {
    models: HashMap<u64, ThreeDModel>,
}

impl ThreeDStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: ThreeDModel) {
        self.models.insert(model.id, model);
    }

    pub fn get(&self, id: u64) -> Option<&ThreeDModel> {
        self.models.get(&id)
    }
}

/// Type definitions plus asset-to-type associations.
#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    items: HashMap<u64, TypeDefinition>,
    by_asset_id: HashMap<u64, Vec<AssetTypeAssignment>>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, def: TypeDefinition) {
        self.items.insert(def.id, def);
    }

    pub fn assign(&mut self, asset_id: u64, type_id: u64) {
        self.by_asset_id.entry(asset_id).or_default().push(AssetTypeAssignment {
            type_ref: TypeRef { id: type_id },
        });
    }

    pub fn get(&self, id: u64) -> Option<&TypeDefinition> {
        self.items.get(&id)
    }

    pub fn assignments(&self, asset_id: u64) -> &[AssetTypeAssignment] {
        self.by_asset_id
            .get(&asset_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterate loaded type ids and definitions, for filter generation.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &TypeDefinition)> {
        self.items.iter().map(|(id, def)| (*id, def))
    }
}

/// All per-kind caches bundled for the view-model builder.
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub assets: AssetStore,
    pub timeseries: TimeseriesStore,
    pub threed: ThreeDStore,
    pub types: TypeStore,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn asset(id: u64, name: &str, external_id: Option<&str>) -> Asset {
        Asset {
            id,
            name: name.to_string(),
            description: None,
            external_id: external_id.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_prefers_external_id() {
        let mut store = AssetStore::new();
        // External id happens to look like a different asset's numeric id.
        store.insert(asset(1, "Pump", Some("2")));
        store.insert(asset(2, "Valve", None));

        assert_eq!(store.resolve_id("2"), Some(1));
        assert_eq!(store.resolve_id("1"), Some(1));
    }

    #[test]
    fn test_resolve_falls_back_to_numeric() {
        let mut store = AssetStore::new();
        store.insert(asset(7, "Compressor", Some("WMT-7")));

        assert_eq!(store.resolve_id("WMT-7"), Some(7));
        assert_eq!(store.resolve_id("7"), Some(7));
        assert_eq!(store.resolve_id("not-an-id"), None);
    }

    #[test]
    fn test_get_by_ref() {
        let mut store = AssetStore::new();
        store.insert(asset(3, "Tank", Some("TK-3")));

        let by_ext = ResourceRef::new(crate::resource::ResourceKind::Asset, "TK-3");
        assert_eq!(store.get_by_ref(&by_ext).map(|a| a.id), Some(3));
        // Resolvable id with no cached entity is still a miss.
        let missing = ResourceRef::asset(99);
        assert!(store.get_by_ref(&missing).is_none());
    }

    #[test]
    fn test_timeseries_display_name() {
        let named = Timeseries {
            id: 10,
            name: Some("temp_sensor".to_string()),
            description: None,
        };
        let unnamed = Timeseries {
            id: 11,
            name: None,
            description: None,
        };
        assert_eq!(named.display_name(), "temp_sensor");
        assert_eq!(unnamed.display_name(), "11");
    }

    #[test]
    fn test_type_assignments() {
        let mut types = TypeStore::new();
        types.insert(TypeDefinition {
            id: 100,
            name: "Pump".to_string(),
        });
        types.assign(1, 100);
        types.assign(1, 200);

        assert_eq!(types.assignments(1).len(), 2);
        assert!(types.assignments(2).is_empty());
    }
}
