//! # Family pattern queries
//!
//! The assembler never talks to storage directly. It hands a batch of
//! [`FamilyQuery`] descriptors to a [`GraphQueryClient`] and gets back one
//! [`ResultSet`] per descriptor, in the same order.
//!
//! | Pattern | Rows |
//! |---------|------|
//! | `Individual` | the subject node, or nothing |
//! | `Ancestors` | one row per upward path, carrying the path's edges |
//! | `Spouses` | one row per spouse |
//! | `Siblings` | one row per (shared parent, sibling) pair |
//! | `Descendants` | one row per downward path and co-parent of its end node |

pub mod backend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{Node, NodeId, Path};
use crate::Result;

// ============================================================================
// Query descriptors
// ============================================================================

/// Shape of a family pattern, relative to the query subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FamilyPattern {
    /// The subject node itself.
    Individual,
    /// Nodes reached by walking `FATHER_OF`/`MOTHER_OF` edges backwards.
    Ancestors { max_hops: usize },
    /// Nodes joined to the subject by an undirected `SPOUSE` edge.
    Spouses,
    /// Other children of the subject's parents.
    Siblings,
    /// Nodes reached by walking `FATHER_OF`/`MOTHER_OF` edges forwards,
    /// each paired with its other parents.
    Descendants { max_hops: usize },
}

/// One pattern query scoped to a subject node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyQuery {
    pub subject: NodeId,
    pub pattern: FamilyPattern,
    /// When set, relatives matched by the pattern must carry this label.
    pub person_label: Option<String>,
}

impl FamilyQuery {
    pub fn new(subject: NodeId, pattern: FamilyPattern) -> Self {
        Self { subject, pattern, person_label: None }
    }

    pub fn individual(subject: NodeId) -> Self {
        Self::new(subject, FamilyPattern::Individual)
    }

    pub fn ancestors(subject: NodeId, max_hops: usize) -> Self {
        Self::new(subject, FamilyPattern::Ancestors { max_hops })
    }

    pub fn spouses(subject: NodeId) -> Self {
        Self::new(subject, FamilyPattern::Spouses)
    }

    pub fn siblings(subject: NodeId) -> Self {
        Self::new(subject, FamilyPattern::Siblings)
    }

    pub fn descendants(subject: NodeId, max_hops: usize) -> Self {
        Self::new(subject, FamilyPattern::Descendants { max_hops })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.person_label = Some(label.into());
        self
    }

    /// Whether `node` satisfies this query's label constraint.
    pub fn admits(&self, node: &Node) -> bool {
        self.person_label.as_deref().is_none_or(|label| node.has_label(label))
    }
}

// ============================================================================
// Result rows
// ============================================================================

/// A typed edge with both endpoint nodes, oriented the way the stored
/// relationship points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEdge {
    pub rel_type: String,
    pub start: Node,
    pub end: Node,
}

impl PathEdge {
    pub fn new(rel_type: impl Into<String>, start: Node, end: Node) -> Self {
        Self { rel_type: rel_type.into(), start, end }
    }

    /// All edges of a path. Two generations fit inline.
    pub fn from_path(path: &Path) -> SmallVec<[PathEdge; 2]> {
        path.oriented_steps()
            .map(|(rel, src, dst)| PathEdge::new(rel.rel_type.clone(), src.clone(), dst.clone()))
            .collect()
    }
}

/// One row of a pattern result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    /// The node the pattern matched: the subject, an ancestor, a spouse,
    /// a sibling or a descendant.
    pub node: Node,
    /// Edges along the path that reached `node` (vertical patterns only).
    pub edges: SmallVec<[PathEdge; 2]>,
    /// For descendant rows: another parent of `node` who is not the subject.
    pub co_parent: Option<Node>,
}

impl QueryRow {
    pub fn node(node: Node) -> Self {
        Self { node, edges: SmallVec::new(), co_parent: None }
    }

    pub fn with_edges(mut self, edges: impl IntoIterator<Item = PathEdge>) -> Self {
        self.edges = edges.into_iter().collect();
        self
    }

    pub fn with_co_parent(mut self, co_parent: Option<Node>) -> Self {
        self.co_parent = co_parent;
        self
    }
}

/// All rows produced by one query.
pub type ResultSet = Vec<QueryRow>;

// ============================================================================
// GraphQueryClient
// ============================================================================

/// Executes batches of family pattern queries against a graph store.
///
/// Implementations return exactly one result set per query, preserving
/// order. Retries, timeouts and connection handling belong here, not in the
/// assembler.
#[async_trait]
pub trait GraphQueryClient: Send + Sync {
    async fn execute_batch(&self, queries: &[FamilyQuery]) -> Result<Vec<ResultSet>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_admission() {
        let indi = Node::new(NodeId(1)).with_labels(["INDI"]);
        let fam = Node::new(NodeId(2)).with_labels(["FAM"]);

        let open = FamilyQuery::spouses(NodeId(1));
        assert!(open.admits(&indi));
        assert!(open.admits(&fam));

        let scoped = FamilyQuery::spouses(NodeId(1)).with_label("INDI");
        assert!(scoped.admits(&indi));
        assert!(!scoped.admits(&fam));
    }

    #[test]
    fn test_query_row_builders() {
        let child = Node::new(NodeId(2));
        let edge = PathEdge::new("FATHER_OF", Node::new(NodeId(1)), child.clone());
        let row = QueryRow::node(child)
            .with_edges([edge])
            .with_co_parent(Some(Node::new(NodeId(3))));

        assert_eq!(row.edges.len(), 1);
        assert!(!row.edges.spilled());
        assert_eq!(row.co_parent.map(|n| n.id), Some(NodeId(3)));
    }
}
