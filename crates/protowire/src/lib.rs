//! ## Crate layout
//! - `core`: wire primitives, host builtin types, leaf codecs, the frozen
//!   model registry, and the execution strategies.
//! - `schema`: declaration nodes, validation, representation resolution,
//!   and proto text emission.
//!
//! The `prelude` module mirrors the surface application code uses.

pub use protowire_core as core;
pub use protowire_schema as schema;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::error::{Error, ErrorKind};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use serde::{Deserialize, Serialize};
}
