//! Execution strategies over a frozen model.
//!
//! `Interpreted` owns the semantics. The planned and compiled forms are
//! derived from the same leaf codecs and the same framing rules, so all
//! three produce identical bytes for identical input.

pub mod compiled;
pub mod interpreted;
pub mod planned;

use crate::{
    codec::{builtin, scalar, CodecError},
    error::Error,
    model::TypeModel,
    obs::{self, MetricsEvent},
    value::{Record, Value},
    wire::WireType,
};
use derive_more::{Display, FromStr};
use protowire_schema::resolved::ResolvedKind;
use std::sync::Arc;

///
/// Strategy
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Default, Display, Eq, FromStr, PartialEq)]
pub enum Strategy {
    Compiled,
    #[default]
    Interpreted,
    Planned,
}

///
/// Serializer
///

#[derive(Clone, Debug)]
pub struct Serializer {
    model: Arc<TypeModel>,
    strategy: Strategy,
}

impl Serializer {
    #[must_use]
    pub const fn new(model: Arc<TypeModel>, strategy: Strategy) -> Self {
        Self { model, strategy }
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn model(&self) -> &TypeModel {
        &self.model
    }

    pub fn encode(&self, message: &str, record: &Record) -> Result<Vec<u8>, Error> {
        let resolved = self.model.resolved();
        let index = resolved
            .index_of(message)
            .ok_or_else(|| Error::unknown_message(message))?;

        let mut buf = Vec::new();
        match self.strategy {
            Strategy::Interpreted => {
                interpreted::encode_message(resolved, &resolved.messages[index], record, &mut buf)?;
            }
            Strategy::Planned => self.model.planned().encode(index, record, &mut buf)?,
            Strategy::Compiled => self.model.compiled().encode(index, record, &mut buf)?,
        }

        obs::sink().record(MetricsEvent::EncodeCompleted {
            message,
            strategy: self.strategy,
            bytes: buf.len(),
        });

        Ok(buf)
    }

    pub fn decode(&self, message: &str, payload: &[u8]) -> Result<Record, Error> {
        let resolved = self.model.resolved();
        let index = resolved
            .index_of(message)
            .ok_or_else(|| Error::unknown_message(message))?;

        let record = match self.strategy {
            Strategy::Interpreted => {
                interpreted::decode_message(resolved, &resolved.messages[index], payload)?
            }
            Strategy::Planned => self.model.planned().decode(index, payload)?,
            Strategy::Compiled => self.model.compiled().decode(index, payload)?,
        };

        obs::sink().record(MetricsEvent::DecodeCompleted {
            message,
            strategy: self.strategy,
            bytes: payload.len(),
        });

        Ok(record)
    }
}

//
// helpers shared by the three walkers
//

/// Wire type one occurrence of this kind takes on the wire.
pub(crate) const fn natural_wire(kind: &ResolvedKind) -> WireType {
    match kind {
        ResolvedKind::Scalar { ty, repr } => scalar::wire_type(*ty, *repr),
        ResolvedKind::Builtin { .. } | ResolvedKind::Message(_) | ResolvedKind::Map { .. } => {
            WireType::LengthDelimited
        }
    }
}

/// Value a decoded map entry gets when the wire omits this part.
pub(crate) fn default_for(kind: &ResolvedKind) -> Value {
    match kind {
        ResolvedKind::Scalar { ty, .. } => scalar::default_value(*ty),
        ResolvedKind::Builtin { repr, .. } => builtin::default_value(*repr),
        ResolvedKind::Message(_) => Value::Record(Record::new()),
        ResolvedKind::Map { .. } => unreachable!("map entries cannot themselves be maps"),
    }
}

pub(crate) const fn expect_wire(expected: WireType, actual: WireType) -> Result<(), CodecError> {
    if expected as u8 == actual as u8 {
        Ok(())
    } else {
        Err(CodecError::WireTypeMismatch { expected, actual })
    }
}

pub(crate) fn append(record: &mut Record, number: u32, item: Value) {
    if let Some(Value::List(items)) = record.get_mut(number) {
        items.push(item);
    } else {
        record.set(number, Value::List(vec![item]));
    }
}

// duplicate keys merge last-wins
pub(crate) fn merge_entry(record: &mut Record, number: u32, key: Value, value: Value) {
    if let Some(Value::Map(pairs)) = record.get_mut(number) {
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => pairs.push((key, value)),
        }
    } else {
        record.set(number, Value::Map(vec![(key, value)]));
    }
}

///
/// TESTS
///
