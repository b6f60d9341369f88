//! Host value types mapped onto the wire.

mod decimal;
mod duration;
mod guid;
mod instant;

pub use decimal::{Decimal, DecimalParts};
pub use duration::Duration;
pub use guid::Guid;
pub use instant::Instant;
