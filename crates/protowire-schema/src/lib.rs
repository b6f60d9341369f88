pub mod build;
pub mod emit;
pub mod error;
pub mod node;
pub mod resolve;
pub mod resolved;
pub mod types;
pub mod validate;

/// Maximum length for message identifiers.
pub const MAX_MESSAGE_NAME_LEN: usize = 64;

/// Maximum length for field identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

/// Highest field number the wire format can address (29 bits).
pub const FIELD_NUMBER_MAX: u32 = (1 << 29) - 1;

/// Field numbers reserved by the wire format for internal use.
pub const FIELD_NUMBER_RESERVED: std::ops::RangeInclusive<u32> = 19_000..=19_999;

use crate::build::BuildError;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        error::ErrorTree,
        node::*,
        resolve::{Representation, ScalarRepr},
        types::{BuiltinKind, CompatibilityLevel, FormatOverride, ScalarType},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    BuildError(#[from] BuildError),
}
