//! Relationship index.
//!
//! Owns all fetched relationship records for the session and an index from
//! resolved numeric resource id to the relationship ids touching it. Merges
//! are idempotent and additive: a stale response for an asset no longer of
//! interest is safe to merge, and there is no ordering guarantee between
//! concurrent fetches for different asset ids.

use crate::relationship::Relationship;
use crate::store::AssetStore;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    items: HashMap<String, Relationship>,
    by_resource: HashMap<u64, BTreeSet<String>>,
}

impl RelationshipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a fetched batch, keying each record under both endpoints.
    ///
    /// Endpoint ids resolve through the asset store's external-id index,
    /// then as plain numeric ids; endpoints with no numeric resolution
    /// (composite 3D keys) keep their record but seed no traversal bucket,
    /// since the visible set holds numeric ids only.
    ///
    /// Returns the number of records not previously indexed.
    pub fn merge(&mut self, batch: Vec<Relationship>, assets: &AssetStore) -> usize {
        let mut added = 0;
        for relationship in batch {
            for endpoint in [&relationship.source, &relationship.target] {
                if let Some(id) = assets.resolve_id(&endpoint.resource_id) {
                    self.by_resource
                        .entry(id)
                        .or_default()
                        .insert(relationship.id.clone());
                }
            }
            // Last write wins by relationship id.
            if self.items.insert(relationship.id.clone(), relationship).is_none() {
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, relationship_id: &str) -> Option<&Relationship> {
        self.items.get(relationship_id)
    }

    /// Relationship ids touching the given resolved resource id, in stable
    /// (sorted) order.
    pub fn ids_for_resource(&self, resource_id: u64) -> impl Iterator<Item = &str> {
        self.by_resource
            .get(&resource_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::RelationshipType;
    use crate::resource::ResourceRef;
    use crate::store::Asset;
    use pretty_assertions::assert_eq;

    fn rel(id: &str, source: u64, target: u64) -> Relationship {
        Relationship {
            id: id.to_string(),
            source: ResourceRef::asset(source),
            target: ResourceRef::asset(target),
            relationship_type: RelationshipType::FlowsTo,
            external_id: format!("ext-{id}"),
            data_set: "test".to_string(),
        }
    }

    #[test]
    fn test_merge_keys_both_endpoints() {
        let assets = AssetStore::new();
        let mut index = RelationshipIndex::new();
        index.merge(vec![rel("r1", 1, 2)], &assets);

        assert_eq!(index.ids_for_resource(1).collect::<Vec<_>>(), vec!["r1"]);
        assert_eq!(index.ids_for_resource(2).collect::<Vec<_>>(), vec!["r1"]);
        assert_eq!(index.ids_for_resource(3).count(), 0);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let assets = AssetStore::new();
        let mut index = RelationshipIndex::new();
        let batch = vec![rel("r1", 1, 2), rel("r2", 1, 3)];

        let first = index.merge(batch.clone(), &assets);
        let second = index.merge(batch, &assets);

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(index.len(), 2);
        assert_eq!(index.ids_for_resource(1).count(), 2);
    }

    #[test]
    fn test_merge_resolves_external_ids() {
        let mut assets = AssetStore::new();
        assets.insert(Asset {
            id: 5,
            name: "Pump".to_string(),
            description: None,
            external_id: Some("PMP-5".to_string()),
        });

        let mut index = RelationshipIndex::new();
        let mut edge = rel("r1", 1, 0);
        edge.target = ResourceRef::new(crate::resource::ResourceKind::Asset, "PMP-5");
        index.merge(vec![edge], &assets);

        assert_eq!(index.ids_for_resource(5).collect::<Vec<_>>(), vec!["r1"]);
    }

    #[test]
    fn test_unresolvable_endpoint_keeps_record() {
        let assets = AssetStore::new();
        let mut index = RelationshipIndex::new();
        let mut edge = rel("r1", 1, 0);
        edge.target = ResourceRef::new(crate::resource::ResourceKind::ThreeD, "7:12:900");
        index.merge(vec![edge], &assets);

        assert!(index.get("r1").is_some());
        assert_eq!(index.ids_for_resource(1).count(), 1);
    }

    #[test]
    fn test_last_write_wins_by_id() {
        let assets = AssetStore::new();
        let mut index = RelationshipIndex::new();
        index.merge(vec![rel("r1", 1, 2)], &assets);

        let mut updated = rel("r1", 1, 2);
        updated.data_set = "refreshed".to_string();
        index.merge(vec![updated], &assets);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("r1").unwrap().data_set, "refreshed");
    }
}
