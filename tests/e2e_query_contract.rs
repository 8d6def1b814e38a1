//! Assembly against a canned GraphQueryClient.
//!
//! These tests feed the assembler rows no well-formed graph would produce,
//! to pin down how it treats a client that breaks the query contract.

use async_trait::async_trait;
use family_tree::{
    Error, FamilyPattern, FamilyQuery, GraphQueryClient, Node, NodeId, PathEdge, QueryRow,
    ResultSet, TreeAssembler,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

/// Replays fixed result sets and records the batches it was asked for.
struct CannedClient {
    sets: Vec<ResultSet>,
    seen: Mutex<Vec<Vec<FamilyQuery>>>,
}

impl CannedClient {
    fn new(sets: Vec<ResultSet>) -> Self {
        Self { sets, seen: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl GraphQueryClient for CannedClient {
    async fn execute_batch(&self, queries: &[FamilyQuery]) -> family_tree::Result<Vec<ResultSet>> {
        self.seen.lock().push(queries.to_vec());
        Ok(self.sets.clone())
    }
}

fn indi(id: u64, name: &str) -> Node {
    Node::new(NodeId(id)).with_labels(["INDI"]).with_property("NAME", name)
}

fn focal_only() -> Vec<ResultSet> {
    vec![vec![QueryRow::node(indi(1, "Focal//"))], vec![], vec![], vec![], vec![]]
}

#[tokio::test]
async fn test_single_batch_of_five_patterns() {
    let assembler = TreeAssembler::new(CannedClient::new(focal_only()));
    assembler.assemble(NodeId(1)).await.unwrap();

    let seen = assembler.client().seen.lock();
    assert_eq!(seen.len(), 1);
    let patterns: Vec<FamilyPattern> = seen[0].iter().map(|q| q.pattern).collect();
    assert_eq!(patterns, vec![
        FamilyPattern::Individual,
        FamilyPattern::Ancestors { max_hops: 2 },
        FamilyPattern::Spouses,
        FamilyPattern::Siblings,
        FamilyPattern::Descendants { max_hops: 2 },
    ]);
    assert!(seen[0].iter().all(|q| q.subject == NodeId(1)));
    assert_eq!(seen[0][0].person_label, None);
    assert_eq!(seen[0][2].person_label.as_deref(), Some("INDI"));
}

#[tokio::test]
async fn test_unknown_edge_type_aborts_traversal() {
    let mut sets = focal_only();
    sets[1] = vec![QueryRow::node(indi(2, "Cousin//"))
        .with_edges([PathEdge::new("COUSIN_OF", indi(2, "Cousin//"), indi(1, "Focal//"))])];

    let result = TreeAssembler::new(CannedClient::new(sets)).assemble(NodeId(1)).await;
    match result {
        Err(Error::DataContractViolation(msg)) => assert!(msg.contains("COUSIN_OF")),
        other => panic!("expected DataContractViolation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_focal_set_is_not_found() {
    let mut sets = focal_only();
    sets[0].clear();

    let result = TreeAssembler::new(CannedClient::new(sets)).assemble(NodeId(1)).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_short_batch_is_execution_error() {
    let mut sets = focal_only();
    sets.truncate(3);

    let result = TreeAssembler::new(CannedClient::new(sets)).assemble(NodeId(1)).await;
    assert!(matches!(result, Err(Error::ExecutionError(_))));
}

#[tokio::test]
async fn test_co_parent_from_descendant_row() {
    let focal = indi(1, "Focal//");
    let child = indi(2, "Child//");
    let grandchild = indi(3, "Grandchild//");
    let in_law = indi(4, "InLaw//");

    let mut sets = focal_only();
    sets[4] = vec![
        QueryRow::node(child.clone())
            .with_edges([PathEdge::new("FATHER_OF", focal.clone(), child.clone())]),
        QueryRow::node(grandchild.clone())
            .with_edges([
                PathEdge::new("FATHER_OF", focal.clone(), child.clone()),
                PathEdge::new("MOTHER_OF", child.clone(), grandchild.clone()),
            ])
            .with_co_parent(Some(in_law)),
    ];

    let tree = TreeAssembler::new(CannedClient::new(sets)).assemble(NodeId(1)).await.unwrap();
    assert_eq!(tree.children.len(), 1);

    let grandchildren = tree.children[0].children.as_deref().unwrap();
    assert_eq!(grandchildren.len(), 1);
    assert_eq!(grandchildren[0].props.name, "Grandchild");
    assert!(grandchildren[0].parents.is_none());

    // The in-law parents the grandchild, not the child.
    let child_parents: Vec<&str> = tree.children[0]
        .parents
        .iter()
        .flatten()
        .map(|p| p.props.name.as_str())
        .collect();
    assert_eq!(child_parents, vec!["Focal"]);
}

#[tokio::test]
async fn test_duplicate_rows_register_once() {
    let mut sets = focal_only();
    let spouse = indi(9, "Spouse//");
    sets[2] = vec![QueryRow::node(spouse.clone()), QueryRow::node(spouse)];

    let tree = TreeAssembler::new(CannedClient::new(sets)).assemble(NodeId(1)).await.unwrap();
    assert_eq!(tree.partners.len(), 1);
    assert_eq!(tree.partners[0].props.name, "Spouse");
}
