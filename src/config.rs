//! Traversal configuration.
//!
//! Everything the assembler needs to know about how the graph encodes
//! people: which label marks an individual, which property keys hold the
//! name, sex and years, and how far the vertical walks reach.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Year used when a birth or marriage year is absent. Sorts unknown people
/// after everyone with a known year.
pub const UNKNOWN_YEAR: i64 = 9999;

/// Property keys read from an individual's raw node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyKeys {
    /// Encoded `Given/Family/Suffix` name.
    pub name: String,
    pub sex: String,
    pub birth_year: String,
    pub marriage_year: String,
}

impl Default for PropertyKeys {
    fn default() -> Self {
        Self {
            name: "NAME".into(),
            sex: "SEX".into(),
            birth_year: "birth_year".into(),
            marriage_year: "marriage_year".into(),
        }
    }
}

/// Configuration for a [`TreeAssembler`](crate::family::TreeAssembler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Label carried by individual nodes. Relatives reached through a
    /// parent, spouse or sibling pattern must have it.
    pub person_label: String,
    /// Generations walked up (ancestors) and down (descendants).
    pub max_hops: usize,
    /// Year substituted for a missing or unparsable birth/marriage year.
    pub unknown_year: i64,
    pub keys: PropertyKeys,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            person_label: "INDI".into(),
            max_hops: 2,
            unknown_year: UNKNOWN_YEAR,
            keys: PropertyKeys::default(),
        }
    }
}

impl TreeConfig {
    /// Parse a JSON document; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_hops == 0 {
            return Err(Error::Config("max_hops must be at least 1".into()));
        }
        if self.person_label.is_empty() {
            return Err(Error::Config("person_label must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();
        assert_eq!(config.person_label, "INDI");
        assert_eq!(config.max_hops, 2);
        assert_eq!(config.unknown_year, 9999);
        assert_eq!(config.keys.name, "NAME");
        assert_eq!(config.keys.sex, "SEX");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TreeConfig::from_json(r#"{"person_label": "Person", "keys": {"name": "fullName"}}"#).unwrap();
        assert_eq!(config.person_label, "Person");
        assert_eq!(config.max_hops, 2);
        assert_eq!(config.keys.name, "fullName");
        assert_eq!(config.keys.sex, "SEX");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(TreeConfig::from_json(r#"{"max_hops": 0}"#), Err(Error::Config(_))));
        assert!(matches!(TreeConfig::from_json("not json"), Err(Error::Config(_))));
    }
}
