//! Turning pattern rows into registry relations.

use std::collections::BTreeSet;

use tracing::trace;

use crate::model::FamilyRelType;
use crate::query::QueryRow;
use crate::{Error, Result};
use super::registry::{PersonId, PersonRegistry};

/// Fold parent → child rows (ancestor or descendant walks) into the
/// registry.
///
/// Every edge must be `FATHER_OF` or `MOTHER_OF`. Anything else means the
/// graph schema and this engine disagree, and the traversal is aborted with
/// [`Error::DataContractViolation`]. A row's co-parent is added to the
/// row node's parents.
pub fn parse_vertical(registry: &mut PersonRegistry<'_>, rows: &[QueryRow]) -> Result<()> {
    for row in rows {
        for edge in &row.edges {
            let rel_type: FamilyRelType = edge.rel_type.parse()?;
            if !rel_type.is_vertical() {
                return Err(Error::DataContractViolation(format!(
                    "{rel_type} edge {} -> {} in a parent/child walk",
                    edge.start.id, edge.end.id,
                )));
            }

            let parent = registry.register(&edge.start);
            let child = registry.register(&edge.end);
            trace!(%parent, %child, %rel_type, "vertical edge");
            registry.link_parent_child(&parent, &child);
        }

        if let Some(co_parent) = &row.co_parent {
            let child = registry.register(&row.node);
            let parent = registry.register(co_parent);
            registry.add_parent(&child, &parent);
        }
    }
    Ok(())
}

/// Register the people of a same-generation pattern (spouses or siblings)
/// and return their identities. The caller decides which relation they
/// fill.
pub fn parse_horizontal(registry: &mut PersonRegistry<'_>, rows: &[QueryRow]) -> BTreeSet<PersonId> {
    rows.iter().map(|row| registry.register(&row.node)).collect()
}
