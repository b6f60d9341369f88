//! Model validation orchestration and shared helpers.

pub mod naming;

use crate::{
    FIELD_NUMBER_MAX, FIELD_NUMBER_RESERVED,
    error::ErrorTree,
    node::{FieldDef, FieldType, MessageDef, ModelDef},
};
use std::collections::HashSet;

/// Run full model validation in a staged, deterministic order.
pub(crate) fn validate_model(def: &ModelDef) -> Result<(), ErrorTree> {
    let mut errors = ErrorTree::new();

    // Phase 1: validate each message (structural + local invariants).
    for message in &def.messages {
        validate_message(message, &mut errors);
    }

    // Phase 2: enforce model-wide invariants.
    validate_global(def, &mut errors);

    errors.result()
}

fn validate_message(message: &MessageDef, errors: &mut ErrorTree) {
    naming::validate_message_name(&message.name, errors);

    let mut names = HashSet::new();
    let mut numbers = HashSet::new();

    for field in &message.fields {
        let route = format!("{}.{}", message.name, field.name);

        naming::validate_field_name(&field.name, &route, errors);

        if !names.insert(field.name.as_str()) {
            errors.add(&route, "duplicate field name");
        }
        if !numbers.insert(field.number) {
            errors.add(&route, format!("duplicate field number {}", field.number));
        }

        validate_field_number(field, &route, errors);
        validate_field_shape(field, &route, errors);
    }
}

fn validate_field_number(field: &FieldDef, route: &str, errors: &mut ErrorTree) {
    if field.number == 0 || field.number > FIELD_NUMBER_MAX {
        errors.add(
            route,
            format!("field number {} is outside 1..={FIELD_NUMBER_MAX}", field.number),
        );
    } else if FIELD_NUMBER_RESERVED.contains(&field.number) {
        errors.add(
            route,
            format!("field number {} falls in the reserved range", field.number),
        );
    }
}

fn validate_field_shape(field: &FieldDef, route: &str, errors: &mut ErrorTree) {
    match &field.ty {
        FieldType::Map(map) => {
            if field.repeated {
                errors.add(route, "map fields carry their own repetition");
            }
            if matches!(map.key, FieldType::Map(_)) {
                errors.add(route, "map keys cannot be maps");
            }
            if matches!(map.value, FieldType::Map(_)) {
                errors.add(route, "map values cannot be maps");
            }
        }
        FieldType::Message(_) => {
            if field.format.is_some() {
                errors.add(route, "format overrides do not apply to message fields");
            }
        }
        FieldType::Builtin(_) | FieldType::Scalar(_) => {}
    }
}

// Global passes that require a full model view.
fn validate_global(def: &ModelDef, errors: &mut ErrorTree) {
    naming::validate_package(&def.package, errors);

    let mut names = HashSet::new();
    for message in &def.messages {
        if !names.insert(message.name.as_str()) {
            errors.add(&message.name, "duplicate message name");
        }
    }

    for message in &def.messages {
        for field in &message.fields {
            let route = format!("{}.{}", message.name, field.name);
            validate_references(def, &field.ty, &route, errors);
        }
    }
}

fn validate_references(def: &ModelDef, ty: &FieldType, route: &str, errors: &mut ErrorTree) {
    match ty {
        FieldType::Message(name) => {
            if def.get_message(name).is_none() {
                errors.add(route, format!("unknown message reference {name}"));
            }
        }
        FieldType::Map(map) => {
            validate_references(def, &map.key, route, errors);
            validate_references(def, &map.value, route, errors);
        }
        FieldType::Builtin(_) | FieldType::Scalar(_) => {}
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        node::{FieldDef, FieldType, MessageDef, ModelDef},
        types::{BuiltinKind, ScalarType},
    };

    fn model_with(fields: Vec<FieldDef>) -> ModelDef {
        let mut def = ModelDef::new("Demo.Wire");
        let mut message = MessageDef::new("Haz");
        message.fields = fields;
        def.messages.push(message);
        def
    }

    #[test]
    fn valid_model_passes() {
        let def = model_with(vec![
            FieldDef::new(1, "Id", FieldType::Builtin(BuiltinKind::Guid)),
            FieldDef::new(2, "Name", FieldType::Scalar(ScalarType::String)),
        ]);
        assert!(validate_model(&def).is_ok());
    }

    #[test]
    fn duplicate_field_numbers_are_rejected() {
        let def = model_with(vec![
            FieldDef::new(1, "A", FieldType::Scalar(ScalarType::Int32)),
            FieldDef::new(1, "B", FieldType::Scalar(ScalarType::Int32)),
        ]);
        let errors = validate_model(&def).unwrap_err();
        assert!(errors.to_string().contains("duplicate field number 1"));
    }

    #[test]
    fn reserved_and_out_of_range_numbers_are_rejected() {
        let def = model_with(vec![
            FieldDef::new(19_000, "A", FieldType::Scalar(ScalarType::Int32)),
            FieldDef::new(0, "B", FieldType::Scalar(ScalarType::Int32)),
        ]);
        let errors = validate_model(&def).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn unknown_message_reference_is_rejected() {
        let def = model_with(vec![FieldDef::new(1, "Other", FieldType::message("Missing"))]);
        let errors = validate_model(&def).unwrap_err();
        assert!(errors.to_string().contains("unknown message reference"));
    }

    #[test]
    fn nested_maps_are_rejected() {
        let inner = FieldType::map(
            FieldType::Scalar(ScalarType::Int32),
            FieldType::Scalar(ScalarType::Int32),
        );
        let outer = FieldType::map(FieldType::Scalar(ScalarType::Int32), inner);
        let def = model_with(vec![FieldDef::new(1, "Deep", outer)]);
        let errors = validate_model(&def).unwrap_err();
        assert!(errors.to_string().contains("map values cannot be maps"));
    }

    #[test]
    fn bad_identifiers_are_rejected() {
        let def = model_with(vec![FieldDef::new(
            1,
            "9starts_with_digit",
            FieldType::Scalar(ScalarType::Bool),
        )]);
        assert!(validate_model(&def).is_err());
    }
}
