use crate::{
    Error,
    node::{FieldType, MapDef, ModelDef},
    prelude::*,
    resolve::{ResolveError, resolve_builtin, resolve_scalar},
    resolved::{ResolvedField, ResolvedKind, ResolvedMessage, ResolvedModel},
    validate::validate_model,
};
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("{route}: map key cannot be reconciled with its map annotation")]
    AmbiguousMapKey { route: String },

    #[error("{route}: {source}")]
    Resolve {
        route: String,
        source: ResolveError,
    },

    #[error("validation failed: {0}")]
    Validation(ErrorTree),
}

///
/// build_model
///
/// Validate the declared model, resolve every field occurrence through the
/// decision table, synthesize fallback pair messages for ineligible maps,
/// and freeze the result. Every unsupported-format and ambiguous-map error
/// surfaces here, before any bytes are written.
///

pub fn build_model(def: &ModelDef) -> Result<ResolvedModel, Error> {
    validate_model(def).map_err(BuildError::Validation)?;

    let mut pairs = PairTable::default();
    let mut messages = Vec::with_capacity(def.messages.len());

    for message in &def.messages {
        let mut fields = Vec::with_capacity(message.fields.len());

        for field in &message.fields {
            let route = format!("{}.{}", message.name, field.name);
            let level = field.level.unwrap_or(def.default_level);

            let kind = match &field.ty {
                FieldType::Scalar(ty) => ResolvedKind::Scalar {
                    ty: *ty,
                    repr: resolve_scalar(*ty, field.format)
                        .map_err(|source| BuildError::Resolve { route, source })?,
                },
                FieldType::Builtin(kind) => ResolvedKind::Builtin {
                    kind: *kind,
                    repr: resolve_builtin(*kind, level, field.format)
                        .map_err(|source| BuildError::Resolve { route, source })?,
                },
                FieldType::Message(name) => ResolvedKind::Message(name.clone()),
                FieldType::Map(map) => resolve_map(map, level, &route, &mut pairs)?,
            };

            fields.push(ResolvedField {
                number: field.number,
                name: field.name.clone(),
                repeated: field.repeated,
                kind,
            });
        }

        messages.push(ResolvedMessage {
            name: message.name.clone(),
            fields,
            synthetic_pair: false,
        });
    }

    messages.extend(pairs.built);

    Ok(ResolvedModel {
        package: def.package.clone(),
        messages,
    })
}

// Resolve a keyed collection: entries resolve under the field's effective
// level with their dedicated overrides; ineligible keys either fail (explicit
// map annotation) or fall back to a legacy-resolved pair message.
fn resolve_map(
    map: &MapDef,
    level: CompatibilityLevel,
    route: &str,
    pairs: &mut PairTable,
) -> Result<ResolvedKind, Error> {
    let key = resolve_entry(&map.key, level, map.key_format, route)?;
    let value = resolve_entry(&map.value, level, map.value_format, route)?;

    if map_key_eligible(&key) {
        return Ok(ResolvedKind::Map {
            key: Box::new(key),
            value: Box::new(value),
            pair_message: None,
        });
    }

    if map.explicit {
        return Err(BuildError::AmbiguousMapKey {
            route: route.to_string(),
        }
        .into());
    }

    let legacy_key = resolve_entry(&map.key, CompatibilityLevel::Legacy, None, route)?;
    let legacy_value = resolve_entry(&map.value, CompatibilityLevel::Legacy, None, route)?;
    let pair = pairs.intern(&map.key, &map.value, &legacy_key, &legacy_value);

    Ok(ResolvedKind::Map {
        key: Box::new(legacy_key),
        value: Box::new(legacy_value),
        pair_message: Some(pair),
    })
}

fn resolve_entry(
    ty: &FieldType,
    level: CompatibilityLevel,
    format: Option<FormatOverride>,
    route: &str,
) -> Result<ResolvedKind, Error> {
    let kind = match ty {
        FieldType::Scalar(scalar) => ResolvedKind::Scalar {
            ty: *scalar,
            repr: resolve_scalar(*scalar, format).map_err(|source| BuildError::Resolve {
                route: route.to_string(),
                source,
            })?,
        },
        FieldType::Builtin(builtin) => ResolvedKind::Builtin {
            kind: *builtin,
            repr: resolve_builtin(*builtin, level, format).map_err(|source| {
                BuildError::Resolve {
                    route: route.to_string(),
                    source,
                }
            })?,
        },
        FieldType::Message(name) => ResolvedKind::Message(name.clone()),
        // nested maps are rejected during validation
        FieldType::Map(_) => unreachable!("map entries cannot themselves be maps"),
    };

    Ok(kind)
}

const fn map_key_eligible(kind: &ResolvedKind) -> bool {
    match kind {
        ResolvedKind::Scalar { ty, .. } => ty.supports_map_key(),
        _ => false,
    }
}

///
/// PairTable
/// fallback pair messages, interned once per key/value type pair
///

#[derive(Default)]
struct PairTable {
    built: Vec<ResolvedMessage>,
}

impl PairTable {
    fn intern(
        &mut self,
        key_ty: &FieldType,
        value_ty: &FieldType,
        key: &ResolvedKind,
        value: &ResolvedKind,
    ) -> String {
        let name = format!("KeyValuePair_{}_{}", key_ty.label(), value_ty.label());

        if !self.built.iter().any(|m| m.name == name) {
            self.built.push(ResolvedMessage {
                name: name.clone(),
                fields: vec![
                    ResolvedField {
                        number: 1,
                        name: "Key".to_string(),
                        repeated: false,
                        kind: key.clone(),
                    },
                    ResolvedField {
                        number: 2,
                        name: "Value".to_string(),
                        repeated: false,
                        kind: value.clone(),
                    },
                ],
                synthetic_pair: true,
            });
        }

        name
    }
}

///
/// TESTS
///
