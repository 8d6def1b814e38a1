//! In-memory storage backend.
//!
//! This is the reference implementation of `StorageBackend`.
//! It uses simple HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **No real transactions**: `commit_tx()` and `rollback_tx()` are no-ops.
//!   Writes are applied immediately. Rollback does NOT undo mutations.
//! - **Single-writer only**: Per-collection locks mean multi-step mutations
//!   are NOT atomic. Fine for loading a family graph once and reading it
//!   from many traversals.
//!
//! Use this backend for:
//! - Testing the family-tree assembler end to end
//! - Embedding the engine where the family graph is loaded from a dump

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::RwLock;
use async_trait::async_trait;

use crate::model::*;
use crate::tx::{Transaction, TxMode, TxId};
use crate::{Error, Result};
use super::{StorageBackend, ExpandDepth};

// ============================================================================
// MemoryBackend
// ============================================================================

/// In-memory property graph storage.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    nodes: RwLock<HashMap<NodeId, Node>>,
    relationships: RwLock<HashMap<RelId, Relationship>>,
    /// node_id → list of relationship IDs
    adjacency: RwLock<HashMap<NodeId, Vec<RelId>>>,
    /// Last ids handed out; the first node/relationship/tx gets 1.
    last_node_id: AtomicU64,
    last_rel_id: AtomicU64,
    last_tx_id: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// MemoryTx
// ============================================================================

/// In-memory transaction (currently just a marker, no real MVCC).
#[derive(Debug)]
pub struct MemoryTx {
    id: TxId,
    mode: TxMode,
}

impl Transaction for MemoryTx {
    fn mode(&self) -> TxMode { self.mode }
    fn id(&self) -> TxId { self.id }
}

fn ensure_writable(tx: &MemoryTx) -> Result<()> {
    if tx.is_read_only() {
        return Err(Error::TxError(format!("transaction {} is read-only", tx.id.0)));
    }
    Ok(())
}

// ============================================================================
// StorageBackend impl
// ============================================================================

#[async_trait]
impl StorageBackend for MemoryBackend {
    type Tx = MemoryTx;

    async fn begin_tx(&self, mode: TxMode) -> Result<MemoryTx> {
        let id = TxId(self.inner.last_tx_id.fetch_add(1, Ordering::Relaxed) + 1);
        Ok(MemoryTx { id, mode })
    }

    /// No-op: memory backend applies writes immediately, not on commit.
    async fn commit_tx(&self, _tx: MemoryTx) -> Result<()> { Ok(()) }

    /// WARNING: No-op. Memory backend has no write-ahead log.
    /// Mutations applied during this transaction are NOT reverted.
    async fn rollback_tx(&self, _tx: MemoryTx) -> Result<()> { Ok(()) }

    // ========================================================================
    // Node CRUD
    // ========================================================================

    async fn create_node(
        &self,
        tx: &mut MemoryTx,
        labels: &[&str],
        props: PropertyMap,
    ) -> Result<NodeId> {
        ensure_writable(tx)?;
        let id = NodeId(self.inner.last_node_id.fetch_add(1, Ordering::Relaxed) + 1);
        let node = Node {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: props,
        };

        self.inner.nodes.write().insert(id, node);
        self.inner.adjacency.write().insert(id, Vec::new());

        Ok(id)
    }

    async fn get_node(&self, _tx: &MemoryTx, id: NodeId) -> Result<Option<Node>> {
        Ok(self.inner.nodes.read().get(&id).cloned())
    }

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    async fn create_relationship(
        &self,
        tx: &mut MemoryTx,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        ensure_writable(tx)?;
        // Verify both nodes exist
        {
            let nodes = self.inner.nodes.read();
            if !nodes.contains_key(&src) {
                return Err(Error::NotFound(format!("Source node {src}")));
            }
            if !nodes.contains_key(&dst) {
                return Err(Error::NotFound(format!("Target node {dst}")));
            }
        }

        let id = RelId(self.inner.last_rel_id.fetch_add(1, Ordering::Relaxed) + 1);
        let rel = Relationship {
            id,
            src,
            dst,
            rel_type: rel_type.to_string(),
            properties: props,
        };

        self.inner.relationships.write().insert(id, rel);

        // Update adjacency for both endpoints
        let mut adj = self.inner.adjacency.write();
        adj.entry(src).or_default().push(id);
        if src != dst {
            adj.entry(dst).or_default().push(id);
        }

        Ok(id)
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    async fn get_relationships(
        &self,
        _tx: &MemoryTx,
        node: NodeId,
        dir: Direction,
        rel_types: &[&str],
    ) -> Result<Vec<Relationship>> {
        let adj = self.inner.adjacency.read();
        let rels = self.inner.relationships.read();

        let Some(rel_ids) = adj.get(&node) else {
            return Ok(Vec::new());
        };

        let result = rel_ids
            .iter()
            .filter_map(|rid| rels.get(rid))
            .filter(|rel| match dir {
                Direction::Outgoing => rel.src == node,
                Direction::Incoming => rel.dst == node,
                Direction::Both => true,
            })
            .filter(|rel| rel_types.is_empty() || rel_types.contains(&rel.rel_type.as_str()))
            .cloned()
            .collect();

        Ok(result)
    }

    async fn expand(
        &self,
        tx: &MemoryTx,
        node: NodeId,
        dir: Direction,
        rel_types: &[&str],
        depth: ExpandDepth,
    ) -> Result<Vec<Path>> {
        let (min_depth, max_depth) = depth.bounds();

        let mut results = Vec::new();
        let start_node = self.get_node(tx, node).await?
            .ok_or_else(|| Error::NotFound(format!("Node {node}")))?;

        // BFS expansion
        let mut queue: Vec<Path> = vec![Path::single(start_node)];

        for current_depth in 0..max_depth {
            let mut next_queue = Vec::new();

            for path in &queue {
                let tip = path.end().id;
                let rels = self.get_relationships(tx, tip, dir, rel_types).await?;

                for rel in rels {
                    let next_id = rel.other_node(tip).unwrap_or(rel.dst);

                    // Avoid cycles
                    if path.nodes.iter().any(|n| n.id == next_id) {
                        continue;
                    }

                    if let Some(next_node) = self.get_node(tx, next_id).await? {
                        let mut new_path = path.clone();
                        new_path.append(rel, next_node);

                        if current_depth + 1 >= min_depth {
                            results.push(new_path.clone());
                        }
                        if current_depth + 1 < max_depth {
                            next_queue.push(new_path);
                        }
                    }
                }
            }

            queue = next_queue;
            if queue.is_empty() { break; }
        }

        Ok(results)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("NAME".into(), Value::from(name));
        props
    }

    #[tokio::test]
    async fn test_create_and_get_node() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();

        let id = db.create_node(&mut tx, &["INDI"], person("Ada/Lovelace/")).await.unwrap();
        let node = db.get_node(&tx, id).await.unwrap().unwrap();

        assert_eq!(id, NodeId(1));
        assert_eq!(node.labels, vec!["INDI"]);
        assert_eq!(node.get("NAME"), Some(&Value::from("Ada/Lovelace/")));
    }

    #[tokio::test]
    async fn test_read_only_tx_rejects_writes() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadOnly).await.unwrap();

        let result = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await;
        assert!(matches!(result, Err(Error::TxError(_))));
        assert_eq!(db.get_node(&tx, NodeId(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_relationship() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();

        let father = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();
        let child = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();

        let rel_id = db.create_relationship(&mut tx, father, child, "FATHER_OF", PropertyMap::new()).await.unwrap();
        let rels = db.get_relationships(&tx, child, Direction::Incoming, &[]).await.unwrap();

        assert_eq!(rels.len(), 1);
        let rel = &rels[0];
        assert_eq!(rel.id, rel_id);
        assert_eq!(rel.src, father);
        assert_eq!(rel.dst, child);
        assert_eq!(rel.rel_type, "FATHER_OF");
    }

    #[tokio::test]
    async fn test_relationship_to_missing_node() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();

        let a = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();
        let result = db.create_relationship(&mut tx, a, NodeId(99), "SPOUSE", PropertyMap::new()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_relationships_filters() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();

        let father = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();
        let mother = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();
        let child = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();

        db.create_relationship(&mut tx, father, child, "FATHER_OF", PropertyMap::new()).await.unwrap();
        db.create_relationship(&mut tx, mother, child, "MOTHER_OF", PropertyMap::new()).await.unwrap();
        db.create_relationship(&mut tx, father, mother, "SPOUSE", PropertyMap::new()).await.unwrap();

        let incoming = db.get_relationships(&tx, child, Direction::Incoming, &FamilyRelType::VERTICAL).await.unwrap();
        assert_eq!(incoming.len(), 2);

        let spouse = db.get_relationships(&tx, mother, Direction::Both, &["SPOUSE"]).await.unwrap();
        assert_eq!(spouse.len(), 1);
        assert_eq!(spouse[0].other_node(mother), Some(father));

        let everything = db.get_relationships(&tx, father, Direction::Both, &[]).await.unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[tokio::test]
    async fn test_expand_two_generations() {
        let db = MemoryBackend::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();

        let grandfather = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();
        let father = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();
        let child = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();
        let great = db.create_node(&mut tx, &["INDI"], PropertyMap::new()).await.unwrap();

        db.create_relationship(&mut tx, great, grandfather, "FATHER_OF", PropertyMap::new()).await.unwrap();
        db.create_relationship(&mut tx, grandfather, father, "FATHER_OF", PropertyMap::new()).await.unwrap();
        db.create_relationship(&mut tx, father, child, "FATHER_OF", PropertyMap::new()).await.unwrap();

        let paths = db.expand(&tx, child, Direction::Incoming, &FamilyRelType::VERTICAL, ExpandDepth::up_to(2)).await.unwrap();

        // child <- father, child <- father <- grandfather; great-grandfather is out of range
        assert_eq!(paths.len(), 2);
        let ends: Vec<NodeId> = paths.iter().map(|p| p.end().id).collect();
        assert_eq!(ends, vec![father, grandfather]);
    }

    #[tokio::test]
    async fn test_expand_missing_start_node() {
        let db = MemoryBackend::new();
        let tx = db.begin_tx(TxMode::ReadOnly).await.unwrap();

        let result = db.expand(&tx, NodeId(7), Direction::Outgoing, &[], ExpandDepth::up_to(1)).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
