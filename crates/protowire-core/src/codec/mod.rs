//! Payload-level codecs.
//!
//! Each submodule encodes and decodes one representation family. None of
//! them write field tags for the payloads they own; framing belongs to the
//! message walkers in `strategy`.

pub mod builtin;
pub mod native;
pub mod scalar;
pub mod surrogate;
pub mod wellknown;

use crate::wire::{WireError, WireType};
use thiserror::Error as ThisError;

///
/// CodecError
///
/// Context-free codec failure. The strategy layer attaches the
/// `Message.field` route when it lifts one of these into [`crate::Error`].
///

#[derive(Clone, Debug, Eq, ThisError, PartialEq)]
pub enum CodecError {
    #[error("decimal mantissa or scale is out of range")]
    DecimalRange,

    #[error("decimal text {0:?} does not parse")]
    DecimalText(String),

    #[error("guid payload must be 16 bytes, got {0}")]
    GuidLength(usize),

    #[error("guid text {0:?} does not parse")]
    GuidText(String),

    #[error("time scale {0} is not recognized")]
    TimeScale(u64),

    #[error("payload is not valid UTF-8")]
    Utf8,

    #[error("expected {expected} value, got {actual}")]
    ValueMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("unexpected wire type {actual:?}, expected {expected:?}")]
    WireTypeMismatch {
        expected: WireType,
        actual: WireType,
    },
}
