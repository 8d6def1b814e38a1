//! # Property Graph Model
//!
//! Plain data types for the family graph as the store exposes it.
//! These types cross every boundary: storage ↔ query client ↔ assembler.
//!
//! This module is pure data with no I/O or async.

pub mod node;
pub mod relationship;
pub mod path;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId};
pub use relationship::{Relationship, RelId, Direction, FamilyRelType};
pub use path::Path;
pub use value::Value;
pub use property_map::{PropertyMap, lowercase_keys};
