//! Relationship (edge) in the family graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use super::{NodeId, PropertyMap};
use crate::Error;

/// Opaque relationship identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelId(pub u64);

impl fmt::Display for RelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// A relationship (directed edge) in the property graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelId,
    pub src: NodeId,
    pub dst: NodeId,
    pub rel_type: String,
    pub properties: PropertyMap,
}

impl Relationship {
    pub fn new(id: RelId, src: NodeId, dst: NodeId, rel_type: impl Into<String>) -> Self {
        Self {
            id,
            src,
            dst,
            rel_type: rel_type.into(),
            properties: PropertyMap::new(),
        }
    }

    /// The "other" end of the relationship from the given node.
    pub fn other_node(&self, from: NodeId) -> Option<NodeId> {
        if from == self.src { Some(self.dst) }
        else if from == self.dst { Some(self.src) }
        else { None }
    }
}

// ============================================================================
// Family relationship types
// ============================================================================

/// The edge types the family schema stores. Siblings, grandparents and
/// grandchildren are derived from these, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyRelType {
    #[serde(rename = "FATHER_OF")]
    FatherOf,
    #[serde(rename = "MOTHER_OF")]
    MotherOf,
    #[serde(rename = "SPOUSE")]
    Spouse,
}

impl FamilyRelType {
    /// Parent → child edge types, in the order queries list them.
    pub const VERTICAL: [&'static str; 2] = ["FATHER_OF", "MOTHER_OF"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyRelType::FatherOf => "FATHER_OF",
            FamilyRelType::MotherOf => "MOTHER_OF",
            FamilyRelType::Spouse => "SPOUSE",
        }
    }

    /// True for parent → child edges.
    pub fn is_vertical(&self) -> bool {
        matches!(self, FamilyRelType::FatherOf | FamilyRelType::MotherOf)
    }
}

impl fmt::Display for FamilyRelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyRelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FATHER_OF" => Ok(FamilyRelType::FatherOf),
            "MOTHER_OF" => Ok(FamilyRelType::MotherOf),
            "SPOUSE" => Ok(FamilyRelType::Spouse),
            other => Err(Error::DataContractViolation(
                format!("unexpected relationship type '{other}'")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family_rel_types() {
        assert_eq!("FATHER_OF".parse::<FamilyRelType>().unwrap(), FamilyRelType::FatherOf);
        assert_eq!("MOTHER_OF".parse::<FamilyRelType>().unwrap(), FamilyRelType::MotherOf);
        assert_eq!("SPOUSE".parse::<FamilyRelType>().unwrap(), FamilyRelType::Spouse);
        assert!(FamilyRelType::FatherOf.is_vertical());
        assert!(!FamilyRelType::Spouse.is_vertical());
    }

    #[test]
    fn test_unknown_rel_type_is_contract_violation() {
        let err = "COUSIN_OF".parse::<FamilyRelType>().unwrap_err();
        assert!(matches!(err, Error::DataContractViolation(ref m) if m.contains("COUSIN_OF")));
    }

    #[test]
    fn test_other_node() {
        let rel = Relationship::new(RelId(1), NodeId(1), NodeId(2), "SPOUSE");
        assert_eq!(rel.other_node(NodeId(1)), Some(NodeId(2)));
        assert_eq!(rel.other_node(NodeId(2)), Some(NodeId(1)));
        assert_eq!(rel.other_node(NodeId(3)), None);
    }
}
