//! Rule primitives: the reusable, parameterized transformations the
//! declarative catalog is built from.
//!
//! Config and build primitives are pure data (key patterns, coordinates,
//! tag paths) and can be declared in a manifest. Source primitives carry
//! executable matching logic because their matches need semantic type
//! information.

pub mod java;
pub mod pom;
pub mod props;
