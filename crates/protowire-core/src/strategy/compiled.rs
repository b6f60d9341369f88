//! Closure-compiled strategy.
//!
//! Build lowers every field into boxed encode and decode closures with
//! tags, routes, and entry defaults resolved up front. Runtime is a
//! straight run over the closure chain with no model lookups left.

use crate::{
    codec::{builtin, scalar, CodecError},
    error::Error,
    strategy::{append, default_for, expect_wire, merge_entry, natural_wire},
    value::{Record, Value},
    wire::{self, WireReader, WireType},
};
use protowire_schema::resolved::{ResolvedField, ResolvedKind, ResolvedMessage, ResolvedModel};
use std::collections::HashMap;

type EncodeFn = Box<dyn Fn(&CompiledSet, &Record, &mut Vec<u8>) -> Result<(), Error> + Send + Sync>;
type DecodeFn = Box<
    dyn Fn(&CompiledSet, &mut WireReader<'_>, WireType, &mut Record) -> Result<(), Error>
        + Send
        + Sync,
>;
type LeafEncodeFn = Box<dyn Fn(&CompiledSet, &Value, &mut Vec<u8>) -> Result<(), Error> + Send + Sync>;
type LeafDecodeFn =
    Box<dyn Fn(&CompiledSet, &mut WireReader<'_>) -> Result<Value, Error> + Send + Sync>;

///
/// CompiledSet
///
/// Index-aligned with `ResolvedModel::messages`; nested message closures
/// carry the target index and re-enter through the set parameter.
///

pub(crate) struct CompiledSet {
    messages: Vec<CompiledMessage>,
}

impl CompiledSet {
    pub(crate) fn build(model: &ResolvedModel) -> Self {
        Self {
            messages: model
                .messages
                .iter()
                .map(|message| CompiledMessage::build(model, message))
                .collect(),
        }
    }

    pub(crate) fn encode(
        &self,
        index: usize,
        record: &Record,
        buf: &mut Vec<u8>,
    ) -> Result<(), Error> {
        for encoder in &self.messages[index].encoders {
            encoder(self, record, buf)?;
        }
        Ok(())
    }

    pub(crate) fn decode(&self, index: usize, payload: &[u8]) -> Result<Record, Error> {
        let message = &self.messages[index];
        let mut reader = WireReader::new(payload);
        let mut record = Record::new();

        while !reader.is_empty() {
            let (number, wire) = reader
                .read_tag()
                .map_err(|e| Error::codec(message.name.as_str(), CodecError::Wire(e)))?;

            match message.decoders.get(&number) {
                Some(decoder) => decoder(self, &mut reader, wire, &mut record)?,
                None => reader
                    .skip(wire)
                    .map_err(|e| Error::codec(message.name.as_str(), CodecError::Wire(e)))?,
            }
        }

        Ok(record)
    }
}

///
/// CompiledMessage
///

struct CompiledMessage {
    name: String,
    encoders: Vec<EncodeFn>,
    decoders: HashMap<u32, DecodeFn>,
}

impl CompiledMessage {
    fn build(model: &ResolvedModel, message: &ResolvedMessage) -> Self {
        let encoders = message
            .fields
            .iter()
            .map(|field| compile_field_encoder(model, message, field))
            .collect();
        let decoders = message
            .fields
            .iter()
            .map(|field| (field.number, compile_field_decoder(model, message, field)))
            .collect();

        Self {
            name: message.name.clone(),
            encoders,
            decoders,
        }
    }
}

fn compile_field_encoder(
    model: &ResolvedModel,
    message: &ResolvedMessage,
    field: &ResolvedField,
) -> EncodeFn {
    let number = field.number;
    let route = format!("{}.{}", message.name, field.name);

    match &field.kind {
        ResolvedKind::Map { key, value, .. } => {
            let key_enc = compile_occurrence(model, key, &route, 1, true);
            let value_enc = compile_occurrence(model, value, &route, 2, true);
            let mut tag = Vec::new();
            wire::write_tag(&mut tag, number, WireType::LengthDelimited);

            Box::new(move |set, record, buf| {
                let Some(value) = record.get(number) else {
                    return Ok(());
                };
                let Value::Map(pairs) = value else {
                    return Err(Error::codec(
                        route.clone(),
                        CodecError::ValueMismatch {
                            expected: "map",
                            actual: value.label(),
                        },
                    ));
                };
                for (entry_key, entry_value) in pairs {
                    let mut entry = Vec::new();
                    key_enc(set, entry_key, &mut entry)?;
                    value_enc(set, entry_value, &mut entry)?;
                    buf.extend_from_slice(&tag);
                    wire::write_len_prefixed(buf, &entry);
                }
                Ok(())
            })
        }
        kind if field.repeated => {
            let element = compile_occurrence(model, kind, &route, number, false);

            Box::new(move |set, record, buf| {
                let Some(value) = record.get(number) else {
                    return Ok(());
                };
                let Value::List(items) = value else {
                    return Err(Error::codec(
                        route.clone(),
                        CodecError::ValueMismatch {
                            expected: "list",
                            actual: value.label(),
                        },
                    ));
                };
                for item in items {
                    element(set, item, buf)?;
                }
                Ok(())
            })
        }
        kind => {
            let single = compile_occurrence(model, kind, &route, number, true);

            Box::new(move |set, record, buf| match record.get(number) {
                Some(value) => single(set, value, buf),
                None => Ok(()),
            })
        }
    }
}

/// One tagged occurrence, lowered to a closure over its leaf codec.
fn compile_occurrence(
    model: &ResolvedModel,
    kind: &ResolvedKind,
    route: &str,
    number: u32,
    elide_defaults: bool,
) -> LeafEncodeFn {
    let route = route.to_string();

    match kind {
        ResolvedKind::Scalar { ty, repr } => {
            let (ty, repr) = (*ty, *repr);
            let mut tag = Vec::new();
            wire::write_tag(&mut tag, number, scalar::wire_type(ty, repr));

            Box::new(move |_, value, buf| {
                if elide_defaults && scalar::is_default(ty, value) {
                    return Ok(());
                }
                buf.extend_from_slice(&tag);
                scalar::encode(buf, ty, repr, value).map_err(|e| Error::codec(route.clone(), e))
            })
        }
        ResolvedKind::Builtin { repr, .. } => {
            let repr = *repr;
            let mut tag = Vec::new();
            wire::write_tag(&mut tag, number, WireType::LengthDelimited);

            Box::new(move |_, value, buf| {
                let payload =
                    builtin::payload(repr, value).map_err(|e| Error::codec(route.clone(), e))?;
                buf.extend_from_slice(&tag);
                wire::write_len_prefixed(buf, &payload);
                Ok(())
            })
        }
        ResolvedKind::Message(name) => {
            let Some(index) = model.index_of(name) else {
                unreachable!("validated message reference")
            };
            let mut tag = Vec::new();
            wire::write_tag(&mut tag, number, WireType::LengthDelimited);

            Box::new(move |set, value, buf| {
                let Value::Record(inner) = value else {
                    return Err(Error::codec(
                        route.clone(),
                        CodecError::ValueMismatch {
                            expected: "record",
                            actual: value.label(),
                        },
                    ));
                };
                let mut inner_buf = Vec::new();
                set.encode(index, inner, &mut inner_buf)?;
                buf.extend_from_slice(&tag);
                wire::write_len_prefixed(buf, &inner_buf);
                Ok(())
            })
        }
        ResolvedKind::Map { .. } => unreachable!("maps are framed by the field compiler"),
    }
}

fn compile_leaf_decoder(model: &ResolvedModel, kind: &ResolvedKind, route: &str) -> LeafDecodeFn {
    let route = route.to_string();

    match kind {
        ResolvedKind::Scalar { ty, repr } => {
            let (ty, repr) = (*ty, *repr);
            Box::new(move |_, reader| {
                scalar::decode(reader, ty, repr).map_err(|e| Error::codec(route.clone(), e))
            })
        }
        ResolvedKind::Builtin { repr, .. } => {
            let repr = *repr;
            Box::new(move |_, reader| {
                let payload = reader
                    .read_len_prefixed()
                    .map_err(|e| Error::codec(route.clone(), CodecError::Wire(e)))?;
                builtin::decode(repr, payload).map_err(|e| Error::codec(route.clone(), e))
            })
        }
        ResolvedKind::Message(name) => {
            let Some(index) = model.index_of(name) else {
                unreachable!("validated message reference")
            };
            Box::new(move |set, reader| {
                let payload = reader
                    .read_len_prefixed()
                    .map_err(|e| Error::codec(route.clone(), CodecError::Wire(e)))?;
                Ok(Value::Record(set.decode(index, payload)?))
            })
        }
        ResolvedKind::Map { .. } => unreachable!("maps are framed by the field compiler"),
    }
}

fn compile_field_decoder(
    model: &ResolvedModel,
    message: &ResolvedMessage,
    field: &ResolvedField,
) -> DecodeFn {
    let number = field.number;
    let route = format!("{}.{}", message.name, field.name);

    match &field.kind {
        ResolvedKind::Map { key, value, .. } => {
            let key_wire = natural_wire(key);
            let value_wire = natural_wire(value);
            let key_dec = compile_leaf_decoder(model, key, &route);
            let value_dec = compile_leaf_decoder(model, value, &route);
            let key_default = default_for(key);
            let value_default = default_for(value);

            Box::new(move |set, reader, wire, record| {
                expect_wire(WireType::LengthDelimited, wire)
                    .map_err(|e| Error::codec(route.clone(), e))?;
                let entry = reader
                    .read_len_prefixed()
                    .map_err(|e| Error::codec(route.clone(), CodecError::Wire(e)))?;

                let mut inner = WireReader::new(entry);
                let mut entry_key = None;
                let mut entry_value = None;

                while !inner.is_empty() {
                    let (slot, slot_wire) = inner
                        .read_tag()
                        .map_err(|e| Error::codec(route.clone(), CodecError::Wire(e)))?;
                    match slot {
                        1 => {
                            expect_wire(key_wire, slot_wire)
                                .map_err(|e| Error::codec(route.clone(), e))?;
                            entry_key = Some(key_dec(set, &mut inner)?);
                        }
                        2 => {
                            expect_wire(value_wire, slot_wire)
                                .map_err(|e| Error::codec(route.clone(), e))?;
                            entry_value = Some(value_dec(set, &mut inner)?);
                        }
                        _ => inner
                            .skip(slot_wire)
                            .map_err(|e| Error::codec(route.clone(), CodecError::Wire(e)))?,
                    }
                }

                merge_entry(
                    record,
                    number,
                    entry_key.unwrap_or_else(|| key_default.clone()),
                    entry_value.unwrap_or_else(|| value_default.clone()),
                );
                Ok(())
            })
        }
        kind if field.repeated => {
            let natural = natural_wire(kind);
            let packable = matches!(kind, ResolvedKind::Scalar { .. });
            let element = compile_leaf_decoder(model, kind, &route);

            Box::new(move |set, reader, wire, record| {
                if wire == natural {
                    let item = element(set, reader)?;
                    append(record, number, item);
                } else if wire == WireType::LengthDelimited && packable {
                    let run = reader
                        .read_len_prefixed()
                        .map_err(|e| Error::codec(route.clone(), CodecError::Wire(e)))?;
                    let mut inner = WireReader::new(run);
                    while !inner.is_empty() {
                        let item = element(set, &mut inner)?;
                        append(record, number, item);
                    }
                } else {
                    return Err(Error::codec(
                        route.clone(),
                        CodecError::WireTypeMismatch {
                            expected: natural,
                            actual: wire,
                        },
                    ));
                }
                Ok(())
            })
        }
        kind => {
            let natural = natural_wire(kind);
            let leaf = compile_leaf_decoder(model, kind, &route);

            Box::new(move |set, reader, wire, record| {
                expect_wire(natural, wire).map_err(|e| Error::codec(route.clone(), e))?;
                let value = leaf(set, reader)?;
                record.set(number, value);
                Ok(())
            })
        }
    }
}

///
/// TESTS
///
