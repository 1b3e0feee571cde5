//! Text adapters for the two data-document kinds.
//!
//! Language-source parsing is an external concern (trees arrive through the
//! constructor API with a symbol table); configuration lists and build
//! descriptors are simple enough that their adapters ship here, so batch
//! runs and tests can go text-to-text.

pub mod pom;
pub mod props;

pub use pom::{parse_pom, write_pom};
pub use props::{parse_properties, write_properties};
