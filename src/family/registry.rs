//! Per-traversal arena of people.
//!
//! Relations are stored as sets of [`PersonId`]s and resolved through the
//! registry, so parent ↔ child cycles never turn into ownership cycles.

use std::collections::BTreeSet;
use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::config::TreeConfig;
use crate::model::{Node, NodeId, Value};
use super::name::display_name_of;

// ============================================================================
// Identity and snapshot types
// ============================================================================

/// Stable identity of a person, derived from the graph node id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NodeId> for PersonId {
    fn from(id: NodeId) -> Self {
        PersonId(id.to_string())
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
    #[default]
    U,
}

impl Sex {
    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str).map(str::trim) {
            Some("M" | "m") => Sex::M,
            Some("F" | "f") => Sex::F,
            _ => Sex::U,
        }
    }
}

/// The registry's canonical snapshot of a person. Only ever handed out by
/// shared reference; see [`PersonCard`] for the owned form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonProps {
    pub id: PersonId,
    pub sex: Sex,
    pub name: String,
    pub birth_year: i64,
    pub marriage_year: i64,
}

/// An owned copy of a person's snapshot, free to be extended with one
/// level of nested relatives without touching the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonCard {
    #[serde(flatten)]
    pub props: PersonProps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PersonCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<PersonCard>>,
}

impl From<&PersonProps> for PersonCard {
    fn from(props: &PersonProps) -> Self {
        Self { props: props.clone(), children: None, parents: None }
    }
}

// ============================================================================
// PersonNode
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonNode {
    props: PersonProps,
    pub children: BTreeSet<PersonId>,
    pub parents: BTreeSet<PersonId>,
    pub partners: BTreeSet<PersonId>,
    pub siblings: BTreeSet<PersonId>,
}

impl PersonNode {
    fn from_raw(id: PersonId, node: &Node, config: &TreeConfig) -> Self {
        let keys = &config.keys;
        let props = PersonProps {
            sex: Sex::from_value(node.get(&keys.sex)),
            name: display_name_of(node.get(&keys.name)),
            birth_year: year_of(node, &keys.birth_year, config.unknown_year),
            marriage_year: year_of(node, &keys.marriage_year, config.unknown_year),
            id,
        };
        Self {
            props,
            children: BTreeSet::new(),
            parents: BTreeSet::new(),
            partners: BTreeSet::new(),
            siblings: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.props.id
    }

    pub fn props(&self) -> &PersonProps {
        &self.props
    }

    /// Composite ordering key: parent set (when requested), birth year,
    /// display name.
    fn sort_key(&self, order: SortOrder) -> (Option<&BTreeSet<PersonId>>, i64, &str) {
        let parents = match order {
            SortOrder::ByParents => Some(&self.parents),
            SortOrder::Default => None,
        };
        (parents, self.props.birth_year, self.props.name.as_str())
    }
}

fn year_of(node: &Node, key: &str, unknown: i64) -> i64 {
    match node.get(key) {
        None | Some(Value::Null) => unknown,
        Some(value) => value.as_year().unwrap_or_else(|| {
            warn!(node = %node.id, key, value = %value, "unreadable year, treating as unknown");
            unknown
        }),
    }
}

// ============================================================================
// PersonRegistry
// ============================================================================

/// How to order a relation group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Birth year, then name.
    #[default]
    Default,
    /// Parent set first, so half-siblings group by their other parent.
    ByParents,
}

/// De-duplicating store of the people met during one traversal.
#[derive(Debug)]
pub struct PersonRegistry<'c> {
    config: &'c TreeConfig,
    people: HashMap<PersonId, PersonNode>,
}

impl<'c> PersonRegistry<'c> {
    pub fn new(config: &'c TreeConfig) -> Self {
        Self { config, people: HashMap::new() }
    }

    /// The entry for `node`, built on first sight. Later calls with the
    /// same identity return the existing entry untouched.
    pub fn get_or_create(&mut self, node: &Node) -> &PersonNode {
        let config = self.config;
        self.people
            .entry(PersonId::from(node.id))
            .or_insert_with_key(|id| {
                trace!(person = %id, "registering person");
                PersonNode::from_raw(id.clone(), node, config)
            })
    }

    /// [`get_or_create`](Self::get_or_create), keeping only the identity.
    pub fn register(&mut self, node: &Node) -> PersonId {
        self.get_or_create(node).id().clone()
    }

    pub fn get(&self, id: &PersonId) -> Option<&PersonNode> {
        self.people.get(id)
    }

    pub fn get_mut(&mut self, id: &PersonId) -> Option<&mut PersonNode> {
        self.people.get_mut(id)
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.people.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Record `parent → child` on both sides. Unregistered ids are ignored.
    pub fn link_parent_child(&mut self, parent: &PersonId, child: &PersonId) {
        if let Some(p) = self.people.get_mut(parent) {
            p.children.insert(child.clone());
        }
        if let Some(c) = self.people.get_mut(child) {
            c.parents.insert(parent.clone());
        }
    }

    /// Add `parent` to `child`'s parents without touching the parent's
    /// children.
    pub fn add_parent(&mut self, child: &PersonId, parent: &PersonId) {
        if let Some(c) = self.people.get_mut(child) {
            c.parents.insert(parent.clone());
        }
    }

    fn sorted_nodes(&self, ids: &BTreeSet<PersonId>, order: SortOrder) -> Vec<&PersonNode> {
        let mut nodes: Vec<&PersonNode> = ids
            .iter()
            .filter_map(|id| {
                let node = self.people.get(id);
                if node.is_none() {
                    warn!(person = %id, "relation points at an unregistered person");
                }
                node
            })
            .collect();
        // Stable: equal keys keep identity order from the set.
        nodes.sort_by(|a, b| a.sort_key(order).cmp(&b.sort_key(order)));
        nodes
    }

    /// Read-only snapshots of `ids`, sorted.
    pub fn sorted_views(&self, ids: &BTreeSet<PersonId>, order: SortOrder) -> Vec<&PersonProps> {
        self.sorted_nodes(ids, order).into_iter().map(PersonNode::props).collect()
    }

    /// Owned cards for `ids`, sorted. Mutating them never reaches the
    /// registry.
    pub fn sorted_copies(&self, ids: &BTreeSet<PersonId>, order: SortOrder) -> Vec<PersonCard> {
        self.sorted_views(ids, order).into_iter().map(PersonCard::from).collect()
    }
}
