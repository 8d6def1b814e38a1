//! Path: a sequence of alternating nodes and relationships.

use serde::{Deserialize, Serialize};
use super::{Node, Relationship};

/// A path in the graph: node -[rel]- node -[rel]- node ...
///
/// Relationships keep their stored direction, which need not match the
/// direction the path was walked in (an ancestor walk follows
/// `FATHER_OF` edges backwards).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Nodes along the path. Always has one more element than `relationships`.
    pub nodes: Vec<Node>,
    /// Relationships connecting consecutive nodes.
    pub relationships: Vec<Relationship>,
}

impl Path {
    pub fn single(node: Node) -> Self {
        Self { nodes: vec![node], relationships: Vec::new() }
    }

    pub fn end(&self) -> &Node {
        self.nodes.last().expect("Path always has at least one node")
    }

    /// Extend path with a relationship and its target node.
    pub fn append(&mut self, rel: Relationship, node: Node) {
        self.relationships.push(rel);
        self.nodes.push(node);
    }

    /// Each relationship with its endpoints oriented the way the
    /// relationship itself points: `(rel, source, target)`.
    pub fn oriented_steps(&self) -> impl Iterator<Item = (&Relationship, &Node, &Node)> + '_ {
        self.relationships.iter().enumerate().map(|(i, rel)| {
            let a = &self.nodes[i];
            let b = &self.nodes[i + 1];
            if rel.src == a.id { (rel, a, b) } else { (rel, b, a) }
        })
    }
}
