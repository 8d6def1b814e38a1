//! One focal individual in, one nested family record out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TreeConfig;
use crate::model::{lowercase_keys, NodeId, Value};
use crate::query::{FamilyQuery, GraphQueryClient, ResultSet};
use crate::{Error, Result};
use super::parse::{parse_horizontal, parse_vertical};
use super::registry::{PersonCard, PersonId, PersonRegistry, SortOrder};

/// Output keys owned by the assembler; raw properties may not shadow them.
const RESERVED_KEYS: [&str; 5] = ["id", "children", "parents", "partners", "siblings"];

/// The assembled family view of one individual.
///
/// Serializes as a single JSON object: the focal individual's raw
/// properties (keys lower-cased, in key order) next to `id` and the four
/// relation arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledTree {
    pub id: PersonId,
    #[serde(flatten)]
    pub properties: BTreeMap<String, Value>,
    /// Sorted by parent set, then birth year and name. Each card carries
    /// its own `children` and `parents`.
    pub children: Vec<PersonCard>,
    /// Each card carries its own `parents`.
    pub parents: Vec<PersonCard>,
    pub partners: Vec<PersonCard>,
    pub siblings: Vec<PersonCard>,
}

/// Builds [`AssembledTree`]s from a graph reached through a
/// [`GraphQueryClient`].
///
/// The assembler holds no per-request state; every call to
/// [`assemble`](Self::assemble) works on a fresh registry.
pub struct TreeAssembler<C: GraphQueryClient> {
    client: C,
    config: TreeConfig,
}

impl<C: GraphQueryClient> TreeAssembler<C> {
    pub fn new(client: C) -> Self {
        Self { client, config: TreeConfig::default() }
    }

    /// An assembler with a custom configuration. Fails with
    /// [`Error::Config`] when the configuration does not validate.
    pub fn with_config(client: C, config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The five family patterns for `individual`, in result order.
    fn queries(&self, individual: NodeId) -> [FamilyQuery; 5] {
        let label = self.config.person_label.as_str();
        let hops = self.config.max_hops;
        [
            FamilyQuery::individual(individual),
            FamilyQuery::ancestors(individual, hops).with_label(label),
            FamilyQuery::spouses(individual).with_label(label),
            FamilyQuery::siblings(individual).with_label(label),
            // Descendants themselves are not label-checked; their co-parents are.
            FamilyQuery::descendants(individual, hops).with_label(label),
        ]
    }

    /// Assemble the family tree of `individual`.
    ///
    /// Issues one query batch. Fails with [`Error::NotFound`] when the
    /// individual does not exist and with [`Error::DataContractViolation`]
    /// when a walk returns an edge type the family schema does not know.
    #[tracing::instrument(skip(self))]
    pub async fn assemble(&self, individual: NodeId) -> Result<AssembledTree> {
        let queries = self.queries(individual);
        let results = self.client.execute_batch(&queries).await?;
        let [focal, ancestors, spouses, siblings, descendants]: [ResultSet; 5] =
            results.try_into().map_err(|sets: Vec<ResultSet>| {
                Error::ExecutionError(format!(
                    "query batch returned {} result sets, expected {}",
                    sets.len(),
                    queries.len(),
                ))
            })?;

        let focal_node = focal
            .into_iter()
            .next()
            .map(|row| row.node)
            .ok_or_else(|| Error::NotFound(format!("no such individual: {individual}")))?;

        // Pass one: collect everyone and every relation.
        let mut registry = PersonRegistry::new(&self.config);
        let focal_id = registry.register(&focal_node);
        parse_vertical(&mut registry, &ancestors)?;
        parse_vertical(&mut registry, &descendants)?;
        let partners = parse_horizontal(&mut registry, &spouses);
        let sibling_ids = parse_horizontal(&mut registry, &siblings);
        if let Some(person) = registry.get_mut(&focal_id) {
            person.partners = partners;
            person.siblings = sibling_ids;
        }

        debug!(
            people = registry.len(),
            ancestor_rows = ancestors.len(),
            descendant_rows = descendants.len(),
            spouse_rows = spouses.len(),
            sibling_rows = siblings.len(),
            "family graph collected",
        );

        // Pass two: sort, flatten and attach the extra generation.
        let person = registry
            .get(&focal_id)
            .ok_or_else(|| Error::ExecutionError(format!("focal person {focal_id} missing from registry")))?;

        let children = registry
            .sorted_copies(&person.children, SortOrder::ByParents)
            .into_iter()
            .map(|mut card| {
                if let Some(child) = registry.get(&card.props.id) {
                    card.children = Some(registry.sorted_copies(&child.children, SortOrder::Default));
                    card.parents = Some(registry.sorted_copies(&child.parents, SortOrder::Default));
                }
                card
            })
            .collect();

        let parents = registry
            .sorted_copies(&person.parents, SortOrder::Default)
            .into_iter()
            .map(|mut card| {
                if let Some(parent) = registry.get(&card.props.id) {
                    card.parents = Some(registry.sorted_copies(&parent.parents, SortOrder::Default));
                }
                card
            })
            .collect();

        let partners = registry.sorted_copies(&person.partners, SortOrder::Default);
        let siblings = registry.sorted_copies(&person.siblings, SortOrder::Default);

        let mut properties: BTreeMap<String, Value> =
            lowercase_keys(&focal_node.properties).into_iter().collect();
        for key in RESERVED_KEYS {
            if properties.remove(key).is_some() {
                warn!(key, "dropping raw property that collides with an assembled field");
            }
        }

        Ok(AssembledTree {
            id: PersonId::from(individual),
            properties,
            children,
            parents,
            partners,
            siblings,
        })
    }

    /// [`assemble`](Self::assemble), rendered as a JSON value for the web
    /// layer.
    pub async fn assemble_json(&self, individual: NodeId) -> Result<serde_json::Value> {
        let tree = self.assemble(individual).await?;
        Ok(serde_json::to_value(tree)?)
    }
}
