//! Core runtime for protowire: wire primitives, host builtin types, the
//! leaf codecs, the frozen model registry, and the execution strategies,
//! with the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

pub mod codec;
pub mod error;
pub mod model;
pub mod obs;
pub mod strategy;
pub mod types;
pub mod value;
pub mod wire;

///
/// Prelude
///
/// Prelude contains the model-building and serialization vocabulary.
/// Errors, codecs, and wire helpers stay at their module paths.
///

pub mod prelude {
    pub use crate::{
        model::{TypeModel, TypeModelBuilder},
        strategy::{Serializer, Strategy},
        types::{Decimal, Duration, Guid, Instant},
        value::{Record, Value},
    };
    pub use protowire_schema::{
        node::{FieldDef, FieldType, MapDef, MessageDef},
        types::{BuiltinKind, CompatibilityLevel, FormatOverride, ScalarType},
    };
}
