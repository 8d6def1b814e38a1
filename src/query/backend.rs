//! [`GraphQueryClient`] over any [`StorageBackend`].
//!
//! Every pattern is evaluated with the backend's adjacency and expansion
//! primitives inside one read-only transaction per batch.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::model::{Direction, FamilyRelType, Node, NodeId};
use crate::storage::{ExpandDepth, StorageBackend};
use crate::tx::TxMode;
use crate::{Graph, Result};
use super::{FamilyPattern, FamilyQuery, GraphQueryClient, PathEdge, QueryRow, ResultSet};

#[async_trait]
impl<B: StorageBackend> GraphQueryClient for Graph<B> {
    async fn execute_batch(&self, queries: &[FamilyQuery]) -> Result<Vec<ResultSet>> {
        let backend = self.backend();
        let tx = backend.begin_tx(TxMode::ReadOnly).await?;

        let mut sets = Vec::with_capacity(queries.len());
        for query in queries {
            let outcome = run_query(backend, &tx, query).await;
            match outcome {
                Ok(rows) => {
                    trace!(pattern = ?query.pattern, subject = %query.subject, rows = rows.len(), "pattern evaluated");
                    sets.push(rows);
                }
                Err(e) => {
                    backend.rollback_tx(tx).await?;
                    return Err(e);
                }
            }
        }

        backend.commit_tx(tx).await?;
        debug!(queries = queries.len(), "query batch complete");
        Ok(sets)
    }
}

async fn run_query<B: StorageBackend>(
    backend: &B,
    tx: &B::Tx,
    query: &FamilyQuery,
) -> Result<ResultSet> {
    // A missing subject matches nothing; the caller decides whether that is
    // an error.
    let Some(subject) = backend.get_node(tx, query.subject).await? else {
        return Ok(Vec::new());
    };

    match query.pattern {
        FamilyPattern::Individual => Ok(vec![QueryRow::node(subject)]),
        FamilyPattern::Ancestors { max_hops } => ancestors(backend, tx, query, max_hops).await,
        FamilyPattern::Spouses => spouses(backend, tx, query).await,
        FamilyPattern::Siblings => siblings(backend, tx, query).await,
        FamilyPattern::Descendants { max_hops } => descendants(backend, tx, query, max_hops).await,
    }
}

async fn ancestors<B: StorageBackend>(
    backend: &B,
    tx: &B::Tx,
    query: &FamilyQuery,
    max_hops: usize,
) -> Result<ResultSet> {
    let paths = backend.expand(
        tx, query.subject, Direction::Incoming, &FamilyRelType::VERTICAL, ExpandDepth::up_to(max_hops),
    ).await?;

    Ok(paths
        .iter()
        .filter(|path| query.admits(path.end()))
        .map(|path| QueryRow::node(path.end().clone()).with_edges(PathEdge::from_path(path)))
        .collect())
}

async fn spouses<B: StorageBackend>(
    backend: &B,
    tx: &B::Tx,
    query: &FamilyQuery,
) -> Result<ResultSet> {
    let rels = backend.get_relationships(
        tx, query.subject, Direction::Both, &[FamilyRelType::Spouse.as_str()],
    ).await?;

    let mut rows = Vec::new();
    for rel in rels {
        let Some(other) = rel.other_node(query.subject) else { continue };
        if other == query.subject {
            continue;
        }
        if let Some(node) = backend.get_node(tx, other).await? {
            if query.admits(&node) {
                rows.push(QueryRow::node(node));
            }
        }
    }
    Ok(rows)
}

/// `(n)<-[r1]-(p)-[r2]->(sibling)` with `r1 != r2`. The subject is excluded
/// explicitly as well, so duplicated parent edges cannot make a person
/// their own sibling.
async fn siblings<B: StorageBackend>(
    backend: &B,
    tx: &B::Tx,
    query: &FamilyQuery,
) -> Result<ResultSet> {
    let parent_rels = backend.get_relationships(
        tx, query.subject, Direction::Incoming, &FamilyRelType::VERTICAL,
    ).await?;

    let mut rows = Vec::new();
    for up in parent_rels {
        let Some(parent) = backend.get_node(tx, up.src).await? else { continue };
        if !query.admits(&parent) {
            continue;
        }

        let child_rels = backend.get_relationships(
            tx, parent.id, Direction::Outgoing, &FamilyRelType::VERTICAL,
        ).await?;
        for down in child_rels {
            if down.id == up.id || down.dst == query.subject {
                continue;
            }
            if let Some(sibling) = backend.get_node(tx, down.dst).await? {
                if query.admits(&sibling) {
                    rows.push(QueryRow::node(sibling));
                }
            }
        }
    }
    Ok(rows)
}

async fn descendants<B: StorageBackend>(
    backend: &B,
    tx: &B::Tx,
    query: &FamilyQuery,
    max_hops: usize,
) -> Result<ResultSet> {
    let paths = backend.expand(
        tx, query.subject, Direction::Outgoing, &FamilyRelType::VERTICAL, ExpandDepth::up_to(max_hops),
    ).await?;

    let mut rows = Vec::new();
    for path in &paths {
        let descendant = path.end();
        let edges = PathEdge::from_path(path);
        let co_parents = co_parents(backend, tx, query, descendant.id).await?;

        if co_parents.is_empty() {
            rows.push(QueryRow::node(descendant.clone()).with_edges(edges));
            continue;
        }
        for parent in co_parents {
            rows.push(
                QueryRow::node(descendant.clone())
                    .with_edges(edges.iter().cloned())
                    .with_co_parent(Some(parent)),
            );
        }
    }
    Ok(rows)
}

/// Parents of `child` other than the query subject.
async fn co_parents<B: StorageBackend>(
    backend: &B,
    tx: &B::Tx,
    query: &FamilyQuery,
    child: NodeId,
) -> Result<Vec<Node>> {
    let rels = backend.get_relationships(tx, child, Direction::Incoming, &FamilyRelType::VERTICAL).await?;

    let mut parents = Vec::new();
    for rel in rels {
        if rel.src == query.subject {
            continue;
        }
        if let Some(parent) = backend.get_node(tx, rel.src).await? {
            if query.admits(&parent) {
                parents.push(parent);
            }
        }
    }
    Ok(parents)
}
