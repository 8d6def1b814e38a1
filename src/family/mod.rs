//! # Family-tree assembly
//!
//! ```text
//! TreeAssembler ──execute_batch──▶ GraphQueryClient
//!      │                                │ rows
//!      ▼                                ▼
//! PersonRegistry ◀── parse_vertical / parse_horizontal
//!      │
//!      └── sorted copies ──▶ AssembledTree
//! ```

pub mod name;
pub mod registry;
pub mod parse;
pub mod assembler;

pub use name::{display_name, display_name_of};
pub use registry::{PersonCard, PersonId, PersonNode, PersonProps, PersonRegistry, Sex, SortOrder};
pub use parse::{parse_horizontal, parse_vertical};
pub use assembler::{AssembledTree, TreeAssembler};
