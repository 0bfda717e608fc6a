//! Filter registry and query compilation.
//!
//! Query tokens either name a registered predicate (`Category.key`) or fall
//! back to a case-insensitive substring match on the resolved node's display
//! name. Registered predicates are a closed data enum dispatched in one
//! place rather than per-kind closures, so the set of things a filter can
//! test stays visible.
//!
//! The `Types` category is generated from the currently loaded type data by
//! [`FilterRegistry::build`] and treated as an immutable value; upstream type
//! changes are handled by rebuilding the registry, never by mutating it.

use crate::relationship::{Relationship, RelationshipType};
use crate::resource::{ResourceKind, ResourceRef};
use crate::store::Stores;
use std::collections::BTreeMap;

/// Node-kind classes selectable under the `Resource` category.
///
/// `ThreeD` covers both model links and in-model nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClass {
    Asset,
    Timeseries,
    ThreeD,
}

impl KindClass {
    pub fn matches(&self, kind: ResourceKind) -> bool {
        match self {
            KindClass::Asset => kind == ResourceKind::Asset,
            KindClass::Timeseries => kind == ResourceKind::TimeSeries,
            KindClass::ThreeD => {
                matches!(kind, ResourceKind::ThreeD | ResourceKind::ThreeDRevision)
            }
        }
    }
}

/// A predicate over relationship endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFilter {
    /// Endpoint is of the given kind class.
    Kind(KindClass),
    /// Endpoint resolves to an asset associated with the given type.
    HasType(u64),
    /// Substring match against the resolved asset's name (lowercased).
    /// Unresolved endpoints pass: missing data must not hide nodes.
    NameContains(String),
}

impl NodeFilter {
    pub fn matches(&self, node: &ResourceRef, stores: &Stores) -> bool {
        match self {
            NodeFilter::Kind(class) => class.matches(node.resource),
            NodeFilter::HasType(type_id) => stores
                .assets
                .resolve_id(&node.resource_id)
                .map(|asset_id| {
                    stores
                        .types
                        .assignments(asset_id)
                        .iter()
                        .any(|a| a.type_ref.id == *type_id)
                })
                .unwrap_or(false),
            NodeFilter::NameContains(needle) => match stores.assets.get_by_ref(node) {
                Some(asset) => asset.name.to_lowercase().contains(needle),
                None => true,
            },
        }
    }
}

/// A predicate over relationship records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFilter {
    OfType(RelationshipType),
}

impl LinkFilter {
    pub fn matches(&self, link: &Relationship) -> bool {
        match self {
            LinkFilter::OfType(relationship_type) => {
                link.relationship_type == *relationship_type
            }
        }
    }
}

/// One registry entry: a display name plus an optional predicate per side.
#[derive(Debug, Clone)]
pub struct FilterEntry {
    pub name: String,
    pub node: Option<NodeFilter>,
    pub link: Option<LinkFilter>,
}

/// Hierarchical table of named predicates, grouped by category.
///
/// Categories are `Resource` (kind classes), `Relationships` (edge types)
/// and `Types` (dynamic, one entry per loaded type definition).
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    categories: BTreeMap<String, BTreeMap<String, FilterEntry>>,
}

impl FilterRegistry {
    /// Build the registry from the current type data.
    ///
    /// O(number of loaded types); called once per relevant state change.
    pub fn build(stores: &Stores) -> Self {
        let mut categories = BTreeMap::new();

        let mut resource = BTreeMap::new();
        resource.insert(
            "asset".to_string(),
            FilterEntry {
                name: "Asset".to_string(),
                node: Some(NodeFilter::Kind(KindClass::Asset)),
                link: None,
            },
        );
        resource.insert(
            "timeseries".to_string(),
            FilterEntry {
                name: "Timeseries".to_string(),
                node: Some(NodeFilter::Kind(KindClass::Timeseries)),
                link: None,
            },
        );
        resource.insert(
            "3d".to_string(),
            FilterEntry {
                name: "3D".to_string(),
                node: Some(NodeFilter::Kind(KindClass::ThreeD)),
                link: None,
            },
        );
        categories.insert("Resource".to_string(), resource);

        let mut relationships = BTreeMap::new();
        for relationship_type in RelationshipType::all() {
            relationships.insert(
                relationship_type.registry_key().to_string(),
                FilterEntry {
                    name: relationship_type.display_name().to_string(),
                    node: None,
                    link: Some(LinkFilter::OfType(*relationship_type)),
                },
            );
        }
        categories.insert("Relationships".to_string(), relationships);

        let mut types = BTreeMap::new();
        for (type_id, definition) in stores.types.iter() {
            types.insert(
                type_id.to_string(),
                FilterEntry {
                    name: definition.name.clone(),
                    node: Some(NodeFilter::HasType(type_id)),
                    link: None,
                },
            );
        }
        categories.insert("Types".to_string(), types);

        Self { categories }
    }

    /// Resolve a `Category.key` token to its registered entry.
    ///
    /// A token is split on the first `.`; `None` signals the caller to fall
    /// back to substring-name matching.
    pub fn resolve(&self, token: &str) -> Option<&FilterEntry> {
        let (category, key) = token.split_once('.')?;
        self.categories.get(category)?.get(key)
    }

    /// Iterate categories and entries in stable order, for a filter UI.
    pub fn categories(
        &self,
    ) -> impl Iterator<Item = (&str, impl Iterator<Item = (&str, &FilterEntry)>)> {
        self.categories.iter().map(|(name, entries)| {
            (
                name.as_str(),
                entries.iter().map(|(key, entry)| (key.as_str(), entry)),
            )
        })
    }
}

/// Query tokens compiled into predicate lists for one build pass.
#[derive(Debug, Clone, Default)]
pub struct CompiledQuery {
    pub node_filters: Vec<NodeFilter>,
    pub link_filters: Vec<LinkFilter>,
}

impl CompiledQuery {
    /// Compile raw query tokens against the registry.
    ///
    /// Registered entries contribute whichever predicate sides they define;
    /// unresolvable tokens become substring name filters on the node side.
    pub fn compile(tokens: &[String], registry: &FilterRegistry) -> Self {
        let mut node_filters = Vec::new();
        let mut link_filters = Vec::new();
        for token in tokens {
            match registry.resolve(token) {
                Some(entry) => {
                    if let Some(node) = &entry.node {
                        node_filters.push(node.clone());
                    }
                    if let Some(link) = &entry.link {
                        link_filters.push(*link);
                    }
                }
                None => {
                    node_filters.push(NodeFilter::NameContains(token.to_lowercase()));
                }
            }
        }
        Self {
            node_filters,
            link_filters,
        }
    }
}
