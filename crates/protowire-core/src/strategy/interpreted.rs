//! Tree-walking strategy.
//!
//! Walks the resolved model on every call with no precomputation. This
//! is the reference semantics the planned and compiled sets reproduce.

use crate::{
    codec::{builtin, scalar, CodecError},
    error::Error,
    strategy::{append, default_for, expect_wire, merge_entry, natural_wire},
    value::{Record, Value},
    wire::{self, WireReader, WireType},
};
use protowire_schema::resolved::{ResolvedField, ResolvedKind, ResolvedMessage, ResolvedModel};

///
/// FieldCx
///
/// Names the field being walked so codec failures carry their route.
///

struct FieldCx<'a> {
    model: &'a ResolvedModel,
    message: &'a str,
    field: &'a str,
}

impl FieldCx<'_> {
    fn lift(&self, source: CodecError) -> Error {
        Error::codec(format!("{}.{}", self.message, self.field), source)
    }
}

pub(crate) fn encode_message(
    model: &ResolvedModel,
    message: &ResolvedMessage,
    record: &Record,
    buf: &mut Vec<u8>,
) -> Result<(), Error> {
    for field in &message.fields {
        let Some(value) = record.get(field.number) else {
            continue;
        };
        let cx = FieldCx {
            model,
            message: &message.name,
            field: &field.name,
        };

        match &field.kind {
            ResolvedKind::Map {
                key,
                value: value_kind,
                ..
            } => {
                let Value::Map(pairs) = value else {
                    return Err(cx.lift(CodecError::ValueMismatch {
                        expected: "map",
                        actual: value.label(),
                    }));
                };
                for (entry_key, entry_value) in pairs {
                    let mut entry = Vec::new();
                    encode_occurrence(&cx, key, 1, entry_key, &mut entry, true)?;
                    encode_occurrence(&cx, value_kind, 2, entry_value, &mut entry, true)?;
                    wire::write_tag(buf, field.number, WireType::LengthDelimited);
                    wire::write_len_prefixed(buf, &entry);
                }
            }
            kind if field.repeated => {
                let Value::List(items) = value else {
                    return Err(cx.lift(CodecError::ValueMismatch {
                        expected: "list",
                        actual: value.label(),
                    }));
                };
                for item in items {
                    encode_occurrence(&cx, kind, field.number, item, buf, false)?;
                }
            }
            kind => encode_occurrence(&cx, kind, field.number, value, buf, true)?,
        }
    }

    Ok(())
}

/// One tagged occurrence. Defaults are elided only for singular scalars
/// and inside map entries; repeated elements always hit the wire.
fn encode_occurrence(
    cx: &FieldCx<'_>,
    kind: &ResolvedKind,
    number: u32,
    value: &Value,
    buf: &mut Vec<u8>,
    elide_defaults: bool,
) -> Result<(), Error> {
    match kind {
        ResolvedKind::Scalar { ty, repr } => {
            if elide_defaults && scalar::is_default(*ty, value) {
                return Ok(());
            }
            wire::write_tag(buf, number, scalar::wire_type(*ty, *repr));
            scalar::encode(buf, *ty, *repr, value).map_err(|e| cx.lift(e))
        }
        ResolvedKind::Builtin { repr, .. } => {
            let payload = builtin::payload(*repr, value).map_err(|e| cx.lift(e))?;
            wire::write_tag(buf, number, WireType::LengthDelimited);
            wire::write_len_prefixed(buf, &payload);
            Ok(())
        }
        ResolvedKind::Message(name) => {
            let Value::Record(inner) = value else {
                return Err(cx.lift(CodecError::ValueMismatch {
                    expected: "record",
                    actual: value.label(),
                }));
            };
            let Some(target) = cx.model.get(name) else {
                unreachable!("validated message reference")
            };
            let mut inner_buf = Vec::new();
            encode_message(cx.model, target, inner, &mut inner_buf)?;
            wire::write_tag(buf, number, WireType::LengthDelimited);
            wire::write_len_prefixed(buf, &inner_buf);
            Ok(())
        }
        ResolvedKind::Map { .. } => unreachable!("maps are framed by the field walker"),
    }
}

pub(crate) fn decode_message(
    model: &ResolvedModel,
    message: &ResolvedMessage,
    payload: &[u8],
) -> Result<Record, Error> {
    let mut reader = WireReader::new(payload);
    let mut record = Record::new();

    while !reader.is_empty() {
        let (number, wire) = reader
            .read_tag()
            .map_err(|e| Error::codec(message.name.as_str(), CodecError::Wire(e)))?;

        match message.get_field(number) {
            Some(field) => decode_field(model, message, field, wire, &mut reader, &mut record)?,
            None => reader
                .skip(wire)
                .map_err(|e| Error::codec(message.name.as_str(), CodecError::Wire(e)))?,
        }
    }

    Ok(record)
}

fn decode_field(
    model: &ResolvedModel,
    message: &ResolvedMessage,
    field: &ResolvedField,
    wire: WireType,
    reader: &mut WireReader<'_>,
    record: &mut Record,
) -> Result<(), Error> {
    let cx = FieldCx {
        model,
        message: &message.name,
        field: &field.name,
    };

    match &field.kind {
        ResolvedKind::Map { key, value, .. } => {
            expect_wire(WireType::LengthDelimited, wire).map_err(|e| cx.lift(e))?;
            let entry = reader
                .read_len_prefixed()
                .map_err(|e| cx.lift(CodecError::Wire(e)))?;
            let (entry_key, entry_value) = decode_entry(&cx, key, value, entry)?;
            merge_entry(record, field.number, entry_key, entry_value);
        }
        kind if field.repeated => {
            let natural = natural_wire(kind);
            if wire == natural {
                let item = decode_kind(&cx, kind, reader)?;
                append(record, field.number, item);
            } else if wire == WireType::LengthDelimited && matches!(kind, ResolvedKind::Scalar { .. })
            {
                // packed run: one length frame, back-to-back occurrences
                let run = reader
                    .read_len_prefixed()
                    .map_err(|e| cx.lift(CodecError::Wire(e)))?;
                let mut inner = WireReader::new(run);
                while !inner.is_empty() {
                    let item = decode_kind(&cx, kind, &mut inner)?;
                    append(record, field.number, item);
                }
            } else {
                return Err(cx.lift(CodecError::WireTypeMismatch {
                    expected: natural,
                    actual: wire,
                }));
            }
        }
        kind => {
            expect_wire(natural_wire(kind), wire).map_err(|e| cx.lift(e))?;
            let value = decode_kind(&cx, kind, reader)?;
            record.set(field.number, value);
        }
    }

    Ok(())
}

fn decode_entry(
    cx: &FieldCx<'_>,
    key_kind: &ResolvedKind,
    value_kind: &ResolvedKind,
    payload: &[u8],
) -> Result<(Value, Value), Error> {
    let mut reader = WireReader::new(payload);
    let mut key = None;
    let mut value = None;

    while !reader.is_empty() {
        let (number, wire) = reader
            .read_tag()
            .map_err(|e| cx.lift(CodecError::Wire(e)))?;

        match number {
            1 => {
                expect_wire(natural_wire(key_kind), wire).map_err(|e| cx.lift(e))?;
                key = Some(decode_kind(cx, key_kind, &mut reader)?);
            }
            2 => {
                expect_wire(natural_wire(value_kind), wire).map_err(|e| cx.lift(e))?;
                value = Some(decode_kind(cx, value_kind, &mut reader)?);
            }
            _ => reader
                .skip(wire)
                .map_err(|e| cx.lift(CodecError::Wire(e)))?,
        }
    }

    Ok((
        key.unwrap_or_else(|| default_for(key_kind)),
        value.unwrap_or_else(|| default_for(value_kind)),
    ))
}

fn decode_kind(
    cx: &FieldCx<'_>,
    kind: &ResolvedKind,
    reader: &mut WireReader<'_>,
) -> Result<Value, Error> {
    match kind {
        ResolvedKind::Scalar { ty, repr } => {
            scalar::decode(reader, *ty, *repr).map_err(|e| cx.lift(e))
        }
        ResolvedKind::Builtin { repr, .. } => {
            let payload = reader
                .read_len_prefixed()
                .map_err(|e| cx.lift(CodecError::Wire(e)))?;
            builtin::decode(*repr, payload).map_err(|e| cx.lift(e))
        }
        ResolvedKind::Message(name) => {
            let payload = reader
                .read_len_prefixed()
                .map_err(|e| cx.lift(CodecError::Wire(e)))?;
            let Some(target) = cx.model.get(name) else {
                unreachable!("validated message reference")
            };
            Ok(Value::Record(decode_message(cx.model, target, payload)?))
        }
        ResolvedKind::Map { .. } => unreachable!("maps are framed by the field walker"),
    }
}

///
/// TESTS
///
