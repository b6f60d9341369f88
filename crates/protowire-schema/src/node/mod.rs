mod field;
mod message;

pub use field::{FieldDef, FieldType, MapDef};
pub use message::{MessageDef, ModelDef};
