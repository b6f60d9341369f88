//! Plan-driven strategy.
//!
//! One pass over the resolved model precomputes per-field ops with their
//! tag bytes and wire expectations, plus a number-to-op table for decode.
//! Execution then walks the flat plan instead of the model tree.

use crate::{
    codec::{builtin, scalar, CodecError},
    error::Error,
    strategy::{append, expect_wire, merge_entry},
    value::{Record, Value},
    wire::{self, WireReader, WireType},
};
use protowire_schema::{
    resolve::{Representation, ScalarRepr},
    resolved::{ResolvedKind, ResolvedMessage, ResolvedModel},
    types::ScalarType,
};
use std::collections::HashMap;

///
/// PlanSet
///
/// Index-aligned with `ResolvedModel::messages` so message references
/// compile down to a plain index.
///

#[derive(Debug)]
pub(crate) struct PlanSet {
    plans: Vec<MessagePlan>,
}

impl PlanSet {
    pub(crate) fn build(model: &ResolvedModel) -> Self {
        Self {
            plans: model
                .messages
                .iter()
                .map(|message| MessagePlan::build(model, message))
                .collect(),
        }
    }

    pub(crate) fn encode(
        &self,
        index: usize,
        record: &Record,
        buf: &mut Vec<u8>,
    ) -> Result<(), Error> {
        let plan = &self.plans[index];

        for op in &plan.ops {
            let Some(value) = record.get(op.number) else {
                continue;
            };
            let cx = OpCx {
                set: self,
                message: &plan.name,
                field: &op.name,
            };

            match &op.op {
                OpKind::Map { key, value: val_op } => {
                    let Value::Map(pairs) = value else {
                        return Err(cx.lift(CodecError::ValueMismatch {
                            expected: "map",
                            actual: value.label(),
                        }));
                    };
                    for (entry_key, entry_value) in pairs {
                        let mut entry = Vec::new();
                        encode_occurrence(&cx, &key.tag, &key.op, entry_key, &mut entry, true)?;
                        encode_occurrence(&cx, &val_op.tag, &val_op.op, entry_value, &mut entry, true)?;
                        buf.extend_from_slice(&op.tag);
                        wire::write_len_prefixed(buf, &entry);
                    }
                }
                kind if op.repeated => {
                    let Value::List(items) = value else {
                        return Err(cx.lift(CodecError::ValueMismatch {
                            expected: "list",
                            actual: value.label(),
                        }));
                    };
                    for item in items {
                        encode_occurrence(&cx, &op.tag, kind, item, buf, false)?;
                    }
                }
                kind => encode_occurrence(&cx, &op.tag, kind, value, buf, true)?,
            }
        }

        Ok(())
    }

    pub(crate) fn decode(&self, index: usize, payload: &[u8]) -> Result<Record, Error> {
        let plan = &self.plans[index];
        let mut reader = WireReader::new(payload);
        let mut record = Record::new();

        while !reader.is_empty() {
            let (number, wire) = reader
                .read_tag()
                .map_err(|e| Error::codec(plan.name.as_str(), CodecError::Wire(e)))?;

            let Some(&slot) = plan.by_number.get(&number) else {
                reader
                    .skip(wire)
                    .map_err(|e| Error::codec(plan.name.as_str(), CodecError::Wire(e)))?;
                continue;
            };
            let op = &plan.ops[slot];
            let cx = OpCx {
                set: self,
                message: &plan.name,
                field: &op.name,
            };

            match &op.op {
                OpKind::Map { key, value } => {
                    expect_wire(WireType::LengthDelimited, wire).map_err(|e| cx.lift(e))?;
                    let entry = reader
                        .read_len_prefixed()
                        .map_err(|e| cx.lift(CodecError::Wire(e)))?;
                    let (entry_key, entry_value) = decode_entry(&cx, key, value, entry)?;
                    merge_entry(&mut record, op.number, entry_key, entry_value);
                }
                kind if op.repeated => {
                    if wire == op.wire {
                        let item = decode_op(&cx, kind, &mut reader)?;
                        append(&mut record, op.number, item);
                    } else if wire == WireType::LengthDelimited
                        && matches!(kind, OpKind::Scalar { .. })
                    {
                        let run = reader
                            .read_len_prefixed()
                            .map_err(|e| cx.lift(CodecError::Wire(e)))?;
                        let mut inner = WireReader::new(run);
                        while !inner.is_empty() {
                            let item = decode_op(&cx, kind, &mut inner)?;
                            append(&mut record, op.number, item);
                        }
                    } else {
                        return Err(cx.lift(CodecError::WireTypeMismatch {
                            expected: op.wire,
                            actual: wire,
                        }));
                    }
                }
                kind => {
                    expect_wire(op.wire, wire).map_err(|e| cx.lift(e))?;
                    let value = decode_op(&cx, kind, &mut reader)?;
                    record.set(op.number, value);
                }
            }
        }

        Ok(record)
    }
}

///
/// MessagePlan
///

#[derive(Debug)]
struct MessagePlan {
    name: String,
    ops: Vec<FieldOp>,
    by_number: HashMap<u32, usize>,
}

impl MessagePlan {
    fn build(model: &ResolvedModel, message: &ResolvedMessage) -> Self {
        let ops: Vec<FieldOp> = message
            .fields
            .iter()
            .map(|field| {
                let op = OpKind::build(model, &field.kind);
                let wire = op.wire();
                let mut tag = Vec::new();
                wire::write_tag(&mut tag, field.number, wire);

                FieldOp {
                    number: field.number,
                    name: field.name.clone(),
                    repeated: field.repeated,
                    tag,
                    wire,
                    op,
                }
            })
            .collect();

        let by_number = ops
            .iter()
            .enumerate()
            .map(|(slot, op)| (op.number, slot))
            .collect();

        Self {
            name: message.name.clone(),
            ops,
            by_number,
        }
    }
}

///
/// FieldOp
///

#[derive(Debug)]
struct FieldOp {
    number: u32,
    name: String,
    repeated: bool,
    /// Tag bytes, encoded once at plan time.
    tag: Vec<u8>,
    wire: WireType,
    op: OpKind,
}

///
/// OpKind
///

#[derive(Debug)]
enum OpKind {
    Scalar {
        ty: ScalarType,
        repr: ScalarRepr,
    },
    Builtin {
        repr: Representation,
    },
    Message {
        index: usize,
    },
    Map {
        key: Box<EntryOp>,
        value: Box<EntryOp>,
    },
}

impl OpKind {
    fn build(model: &ResolvedModel, kind: &ResolvedKind) -> Self {
        match kind {
            ResolvedKind::Scalar { ty, repr } => Self::Scalar {
                ty: *ty,
                repr: *repr,
            },
            ResolvedKind::Builtin { repr, .. } => Self::Builtin { repr: *repr },
            ResolvedKind::Message(name) => {
                let Some(index) = model.index_of(name) else {
                    unreachable!("validated message reference")
                };
                Self::Message { index }
            }
            ResolvedKind::Map { key, value, .. } => Self::Map {
                key: Box::new(EntryOp::build(model, 1, key)),
                value: Box::new(EntryOp::build(model, 2, value)),
            },
        }
    }

    const fn wire(&self) -> WireType {
        match self {
            Self::Scalar { ty, repr } => scalar::wire_type(*ty, *repr),
            Self::Builtin { .. } | Self::Message { .. } | Self::Map { .. } => {
                WireType::LengthDelimited
            }
        }
    }

    fn default(&self) -> Value {
        match self {
            Self::Scalar { ty, .. } => scalar::default_value(*ty),
            Self::Builtin { repr } => builtin::default_value(*repr),
            Self::Message { .. } => Value::Record(Record::new()),
            Self::Map { .. } => unreachable!("map entries cannot themselves be maps"),
        }
    }
}

///
/// EntryOp
/// Key or value slot of a map entry, with its own pre-encoded tag.
///

#[derive(Debug)]
struct EntryOp {
    tag: Vec<u8>,
    wire: WireType,
    op: OpKind,
}

impl EntryOp {
    fn build(model: &ResolvedModel, number: u32, kind: &ResolvedKind) -> Self {
        let op = OpKind::build(model, kind);
        let wire = op.wire();
        let mut tag = Vec::new();
        wire::write_tag(&mut tag, number, wire);

        Self { tag, wire, op }
    }
}

///
/// OpCx
///

struct OpCx<'a> {
    set: &'a PlanSet,
    message: &'a str,
    field: &'a str,
}

impl OpCx<'_> {
    fn lift(&self, source: CodecError) -> Error {
        Error::codec(format!("{}.{}", self.message, self.field), source)
    }
}

fn encode_occurrence(
    cx: &OpCx<'_>,
    tag: &[u8],
    op: &OpKind,
    value: &Value,
    buf: &mut Vec<u8>,
    elide_defaults: bool,
) -> Result<(), Error> {
    match op {
        OpKind::Scalar { ty, repr } => {
            if elide_defaults && scalar::is_default(*ty, value) {
                return Ok(());
            }
            buf.extend_from_slice(tag);
            scalar::encode(buf, *ty, *repr, value).map_err(|e| cx.lift(e))
        }
        OpKind::Builtin { repr } => {
            let payload = builtin::payload(*repr, value).map_err(|e| cx.lift(e))?;
            buf.extend_from_slice(tag);
            wire::write_len_prefixed(buf, &payload);
            Ok(())
        }
        OpKind::Message { index } => {
            let Value::Record(inner) = value else {
                return Err(cx.lift(CodecError::ValueMismatch {
                    expected: "record",
                    actual: value.label(),
                }));
            };
            let mut inner_buf = Vec::new();
            cx.set.encode(*index, inner, &mut inner_buf)?;
            buf.extend_from_slice(tag);
            wire::write_len_prefixed(buf, &inner_buf);
            Ok(())
        }
        OpKind::Map { .. } => unreachable!("maps are framed by the field walker"),
    }
}

fn decode_entry(
    cx: &OpCx<'_>,
    key_op: &EntryOp,
    value_op: &EntryOp,
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
                expect_wire(key_op.wire, wire).map_err(|e| cx.lift(e))?;
                key = Some(decode_op(cx, &key_op.op, &mut reader)?);
            }
            2 => {
                expect_wire(value_op.wire, wire).map_err(|e| cx.lift(e))?;
                value = Some(decode_op(cx, &value_op.op, &mut reader)?);
            }
            _ => reader
                .skip(wire)
                .map_err(|e| cx.lift(CodecError::Wire(e)))?,
        }
    }

    Ok((
        key.unwrap_or_else(|| key_op.op.default()),
        value.unwrap_or_else(|| value_op.op.default()),
    ))
}

fn decode_op(
    cx: &OpCx<'_>,
    op: &OpKind,
    reader: &mut WireReader<'_>,
) -> Result<Value, Error> {
    match op {
        OpKind::Scalar { ty, repr } => scalar::decode(reader, *ty, *repr).map_err(|e| cx.lift(e)),
        OpKind::Builtin { repr } => {
            let payload = reader
                .read_len_prefixed()
                .map_err(|e| cx.lift(CodecError::Wire(e)))?;
            builtin::decode(*repr, payload).map_err(|e| cx.lift(e))
        }
        OpKind::Message { index } => {
            let payload = reader
                .read_len_prefixed()
                .map_err(|e| cx.lift(CodecError::Wire(e)))?;
            Ok(Value::Record(cx.set.decode(*index, payload)?))
        }
        OpKind::Map { .. } => unreachable!("maps are framed by the field walker"),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeModelBuilder;
    use protowire_schema::{
        node::{FieldDef, FieldType, MessageDef},
        types::ScalarType,
    };

    fn fixture_set() -> (PlanSet, usize) {
        let model = TypeModelBuilder::new("Demo.Wire")
            .message(
                MessageDef::new("Leaf")
                    .field(FieldDef::new(1, "Name", FieldType::Scalar(ScalarType::String))),
            )
            .message(
                MessageDef::new("Holder")
                    .field(FieldDef::new(1, "Inner", FieldType::message("Leaf")))
                    .field(
                        FieldDef::new(3, "Counts", FieldType::Scalar(ScalarType::UInt32)).repeated(),
                    ),
            )
            .build()
            .unwrap();

        let resolved = model.resolved();
        let set = PlanSet::build(resolved);
        let holder = resolved.index_of("Holder").unwrap();
        (set, holder)
    }

    #[test]
    fn plans_precompute_tags_and_lookup_slots() {
        let (set, holder) = fixture_set();
        let plan = &set.plans[holder];

        assert_eq!(plan.by_number[&1], 0);
        assert_eq!(plan.by_number[&3], 1);

        let mut expected = Vec::new();
        wire::write_tag(&mut expected, 3, WireType::Varint);
        assert_eq!(plan.ops[1].tag, expected);
        assert_eq!(plan.ops[0].wire, WireType::LengthDelimited);
    }

    #[test]
    fn message_references_compile_to_indices() {
        let (set, holder) = fixture_set();

        let OpKind::Message { index } = set.plans[holder].ops[0].op else {
            panic!("inner field should compile to a message op");
        };
        assert_eq!(set.plans[index].name, "Leaf");
    }

    #[test]
    fn nested_records_round_trip_through_the_plan() {
        let (set, holder) = fixture_set();
        let record = Record::new()
            .with(1, Value::Record(Record::new().with(1, "leaf")))
            .with(3, Value::List(vec![Value::U32(4), Value::U32(0)]));

        let mut buf = Vec::new();
        set.encode(holder, &record, &mut buf).unwrap();
        let decoded = set.decode(holder, &buf).unwrap();

        assert_eq!(decoded, record);
    }

    #[test]
    fn packed_runs_are_accepted_for_repeated_scalars() {
        let (set, holder) = fixture_set();

        let mut run = Vec::new();
        wire::write_varint(&mut run, 8);
        wire::write_varint(&mut run, 9);

        let mut buf = Vec::new();
        wire::write_tag(&mut buf, 3, WireType::LengthDelimited);
        wire::write_len_prefixed(&mut buf, &run);

        let decoded = set.decode(holder, &buf).unwrap();
        assert_eq!(
            decoded.get(3),
            Some(&Value::List(vec![Value::U32(8), Value::U32(9)]))
        );
    }
}
