//! # family-tree: family network assembly over a property graph
//!
//! Given one individual in a genealogical graph, assemble the record a
//! family-tree UI renders: parents and grandparents, children and
//! grandchildren (with their other parents), partners and siblings,
//! de-duplicated and deterministically ordered.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `GraphQueryClient` is the contract between the
//!    assembler and whatever graph store holds the family data
//! 2. **Clean DTOs**: `Node`, `Relationship`, `Value` cross all boundaries
//! 3. **Arena, not object graph**: people live in a per-request
//!    `PersonRegistry`; relations are sets of ids
//! 4. **One round-trip**: every traversal issues a single query batch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use family_tree::{Graph, NodeId, TreeAssembler};
//!
//! # async fn example() -> family_tree::Result<()> {
//! let graph = Graph::open_memory().await?;
//! // ... load individuals and FATHER_OF / MOTHER_OF / SPOUSE edges ...
//!
//! let assembler = TreeAssembler::new(graph);
//! let tree = assembler.assemble(NodeId(1)).await?;
//! println!("{}", serde_json::to_string_pretty(&tree)?);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod tx;
pub mod query;
pub mod family;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, Relationship, Path, Value, PropertyMap,
    NodeId, RelId, Direction, FamilyRelType,
};

// ============================================================================
// Re-exports: Storage, queries, assembly
// ============================================================================

pub use storage::{StorageBackend, MemoryBackend, ExpandDepth};
pub use tx::{Transaction, TxMode, TxId};
pub use query::{FamilyPattern, FamilyQuery, GraphQueryClient, PathEdge, QueryRow, ResultSet};
pub use family::{AssembledTree, PersonCard, PersonId, Sex, TreeAssembler};
pub use config::TreeConfig;

// ============================================================================
// Top-level Graph handle
// ============================================================================

/// The primary entry point for stored family data. A `Graph` wraps a
/// storage backend and answers family pattern queries against it.
pub struct Graph<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Graph<B> {
    /// Create a Graph with the given backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend (for loading data).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// In-memory graph for testing and embedding.
impl Graph<storage::MemoryBackend> {
    pub async fn open_memory() -> Result<Self> {
        let backend = storage::MemoryBackend::new();
        Ok(Self::with_backend(backend))
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The graph holds data this engine has no interpretation for, such as
    /// an unknown relationship type. Never recovered from.
    #[error("Data contract violation: {0}")]
    DataContractViolation(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Transaction error: {0}")]
    TxError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
