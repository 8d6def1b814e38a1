//! # Storage Backend Trait
//!
//! The contract between the family-tree query client and any graph store.
//! It covers exactly what loading a family graph and walking it needs:
//! node and relationship creation, node lookup, adjacency and bounded
//! expansion.
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryBackend` | `memory` | In-memory for testing/embedding |

pub mod memory;

use async_trait::async_trait;
use crate::model::*;
use crate::tx::{Transaction, TxMode};
use crate::Result;

pub use memory::MemoryBackend;

// ============================================================================
// Expand depth specification
// ============================================================================

/// Hop range for graph expansion, `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandDepth {
    pub min: usize,
    pub max: usize,
}

impl ExpandDepth {
    /// `1..=max` hops, the shape every family walk uses.
    pub fn up_to(max: usize) -> Self {
        ExpandDepth { min: 1, max }
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.min, self.max)
    }
}

// ============================================================================
// StorageBackend Trait
// ============================================================================

/// The storage contract.
///
/// Any backend that implements this trait can be wrapped in a
/// [`Graph`](crate::Graph) and serve family-tree traversals.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// The transaction type for this backend.
    type Tx: Transaction;

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a new transaction.
    async fn begin_tx(&self, mode: TxMode) -> Result<Self::Tx>;

    /// Commit a transaction.
    async fn commit_tx(&self, tx: Self::Tx) -> Result<()>;

    /// Roll back a transaction.
    async fn rollback_tx(&self, tx: Self::Tx) -> Result<()>;

    // ========================================================================
    // Node CRUD
    // ========================================================================

    /// Create a node with the given labels and properties.
    async fn create_node(
        &self,
        tx: &mut Self::Tx,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId>;

    /// Get a node by ID. Returns None if not found.
    async fn get_node(&self, tx: &Self::Tx, id: NodeId) -> Result<Option<Node>>;

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    /// Create a relationship between two existing nodes.
    async fn create_relationship(
        &self,
        tx: &mut Self::Tx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId>;

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Get all relationships of a node, filtered by direction and by type.
    /// An empty `rel_types` slice matches every type.
    async fn get_relationships(
        &self,
        tx: &Self::Tx,
        node: NodeId,
        dir: Direction,
        rel_types: &[&str],
    ) -> Result<Vec<Relationship>>;

    /// Expand from a node: BFS traversal to the given depth.
    ///
    /// Returns one path per distinct walk; a relationship is never reused
    /// within a path and no node is visited twice.
    async fn expand(
        &self,
        tx: &Self::Tx,
        node: NodeId,
        dir: Direction,
        rel_types: &[&str],
        depth: ExpandDepth,
    ) -> Result<Vec<Path>>;

    // ========================================================================
    // Batch operations
    // ========================================================================

    /// Batch create nodes.
    ///
    /// Default falls back to sequential `create_node` calls.
    async fn create_nodes_batch(
        &self,
        tx: &mut Self::Tx,
        nodes: Vec<(Vec<String>, PropertyMap)>,
    ) -> Result<Vec<NodeId>> {
        let mut ids = Vec::with_capacity(nodes.len());
        for (labels, props) in nodes {
            let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
            ids.push(self.create_node(tx, &label_refs, props).await?);
        }
        Ok(ids)
    }

    /// Batch create relationships.
    ///
    /// Default falls back to sequential `create_relationship` calls.
    async fn create_relationships_batch(
        &self,
        tx: &mut Self::Tx,
        rels: Vec<(NodeId, NodeId, String, PropertyMap)>,
    ) -> Result<Vec<RelId>> {
        let mut ids = Vec::with_capacity(rels.len());
        for (src, dst, rel_type, props) in rels {
            ids.push(self.create_relationship(tx, src, dst, &rel_type, props).await?);
        }
        Ok(ids)
    }
}
