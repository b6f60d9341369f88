//! Proto3 text rendering for a resolved model.
//!
//! Downstream tooling parses this output, so the layout is a contract:
//! header block, one blank line, then message blocks with 3-space indents.

use crate::{
    resolve::scalar_proto_name,
    resolved::{ResolvedField, ResolvedKind, ResolvedModel},
};
use std::fmt::Write;

const BCL_IMPORT: &str = "protobuf-net/bcl.proto";
const BCL_IMPORT_COMMENT: &str = "schema for protobuf-net's handling of core .NET types";

///
/// emit_proto
///

#[must_use]
pub fn emit_proto(model: &ResolvedModel) -> String {
    let mut out = String::new();

    out.push_str("syntax = \"proto3\";\n");
    let _ = writeln!(out, "package {};", model.package);

    for import in collect_imports(model) {
        if import == BCL_IMPORT {
            let _ = writeln!(out, "import \"{import}\"; // {BCL_IMPORT_COMMENT}");
        } else {
            let _ = writeln!(out, "import \"{import}\";");
        }
    }
    out.push('\n');

    for message in &model.messages {
        let _ = writeln!(out, "message {} {{", message.name);
        for field in &message.fields {
            render_field(&mut out, field);
        }
        out.push_str("}\n");
    }

    out
}

// Imports are de-duplicated and ordered by first use across the model.
fn collect_imports(model: &ResolvedModel) -> Vec<&'static str> {
    let mut imports = Vec::new();

    for message in &model.messages {
        for field in &message.fields {
            collect_kind(&field.kind, &mut imports);
        }
    }

    imports
}

fn collect_kind(kind: &ResolvedKind, imports: &mut Vec<&'static str>) {
    match kind {
        ResolvedKind::Builtin { repr, .. } => {
            if let Some(path) = repr.import_path() {
                if !imports.contains(&path) {
                    imports.push(path);
                }
            }
        }
        ResolvedKind::Map { key, value, .. } => {
            collect_kind(key, imports);
            collect_kind(value, imports);
        }
        ResolvedKind::Message(_) | ResolvedKind::Scalar { .. } => {}
    }
}

fn render_field(out: &mut String, field: &ResolvedField) {
    let prefix = if field.repeated { "repeated " } else { "" };

    match &field.kind {
        ResolvedKind::Scalar { ty, repr } => {
            let _ = writeln!(
                out,
                "   {prefix}{} {} = {};",
                scalar_proto_name(*ty, *repr),
                field.name,
                field.number
            );
        }
        ResolvedKind::Builtin { repr, .. } => {
            let _ = writeln!(
                out,
                "   {prefix}{} {} = {};",
                repr.proto_type(),
                field.name,
                field.number
            );
        }
        ResolvedKind::Message(name) => {
            let _ = writeln!(out, "   {prefix}{name} {} = {};", field.name, field.number);
        }
        ResolvedKind::Map {
            pair_message: Some(pair),
            ..
        } => {
            let _ = writeln!(out, "   repeated {pair} {} = {};", field.name, field.number);
        }
        ResolvedKind::Map { key, value, .. } => {
            let _ = writeln!(
                out,
                "   map<{},{}> {} = {};",
                entry_type(key),
                entry_type(value),
                field.name,
                field.number
            );
        }
    }
}

fn entry_type(kind: &ResolvedKind) -> &str {
    match kind {
        ResolvedKind::Scalar { ty, repr } => scalar_proto_name(*ty, *repr),
        ResolvedKind::Builtin { repr, .. } => repr.proto_type(),
        ResolvedKind::Message(name) => name,
        // nested maps are rejected during validation
        ResolvedKind::Map { .. } => unreachable!("map entries cannot themselves be maps"),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        build::build_model,
        node::{FieldDef, FieldType, MessageDef, ModelDef},
        types::{BuiltinKind, FormatOverride},
    };

    fn list_model() -> ModelDef {
        let mut def = ModelDef::new("Demo.Wire");
        let mut message = MessageDef::new("HazLists");
        message.fields = vec![
            FieldDef::new(1, "Whens", FieldType::Builtin(BuiltinKind::Instant))
                .repeated()
                .format(FormatOverride::WellKnown),
            FieldDef::new(2, "HowLongs", FieldType::Builtin(BuiltinKind::Duration))
                .repeated()
                .format(FormatOverride::WellKnown),
        ];
        def.messages.push(message);
        def
    }

    #[test]
    fn well_known_lists_render_with_first_use_imports() {
        let model = build_model(&list_model()).unwrap();
        let text = emit_proto(&model);

        assert_eq!(
            text,
            "syntax = \"proto3\";\n\
             package Demo.Wire;\n\
             import \"google/protobuf/timestamp.proto\";\n\
             import \"google/protobuf/duration.proto\";\n\
             \n\
             message HazLists {\n   \
                repeated .google.protobuf.Timestamp Whens = 1;\n   \
                repeated .google.protobuf.Duration HowLongs = 2;\n\
             }\n"
        );
    }

    #[test]
    fn bcl_import_carries_its_comment() {
        let mut def = ModelDef::new("Demo.Wire");
        let mut message = MessageDef::new("HazGuids");
        message.fields = vec![
            FieldDef::new(1, "Ids", FieldType::Builtin(BuiltinKind::Guid)).repeated(),
        ];
        def.messages.push(message);

        let model = build_model(&def).unwrap();
        let text = emit_proto(&model);

        assert!(text.contains(
            "import \"protobuf-net/bcl.proto\"; // schema for protobuf-net's handling of core .NET types"
        ));
        assert!(text.contains("   repeated .bcl.Guid Ids = 1;"));
    }

    #[test]
    fn fallback_pairs_render_as_named_messages() {
        let mut def = ModelDef::new("Demo.Wire");
        let mut message = MessageDef::new("HazMaps");
        message.fields = vec![FieldDef::new(
            3,
            "ByWhen",
            FieldType::map(
                FieldType::Builtin(BuiltinKind::Instant),
                FieldType::Builtin(BuiltinKind::Instant),
            ),
        )];
        def.messages.push(message);

        let model = build_model(&def).unwrap();
        let text = emit_proto(&model);

        assert!(text.contains("   repeated KeyValuePair_Instant_Instant ByWhen = 3;"));
        assert!(text.contains(
            "message KeyValuePair_Instant_Instant {\n   \
             .bcl.DateTime Key = 1;\n   \
             .bcl.DateTime Value = 2;\n}\n"
        ));
        assert!(!text.contains("map<"));
    }
}
