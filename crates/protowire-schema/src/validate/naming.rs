//! Identifier rules shared by message, field, and package validation.

use crate::{MAX_FIELD_NAME_LEN, MAX_MESSAGE_NAME_LEN, error::ErrorTree};

pub(crate) fn validate_message_name(name: &str, errors: &mut ErrorTree) {
    if !is_ident(name) {
        errors.add(name, "message name is not a valid identifier");
    }
    if name.len() > MAX_MESSAGE_NAME_LEN {
        errors.add(
            name,
            format!("message name exceeds {MAX_MESSAGE_NAME_LEN} characters"),
        );
    }
}

pub(crate) fn validate_field_name(name: &str, route: &str, errors: &mut ErrorTree) {
    if !is_ident(name) {
        errors.add(route, "field name is not a valid identifier");
    }
    if name.len() > MAX_FIELD_NAME_LEN {
        errors.add(
            route,
            format!("field name exceeds {MAX_FIELD_NAME_LEN} characters"),
        );
    }
}

pub(crate) fn validate_package(package: &str, errors: &mut ErrorTree) {
    if package.is_empty() || !package.split('.').all(is_ident) {
        errors.add("package", "package must be a dotted identifier path");
    }
}

// letters, digits, underscores; no leading digit
fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

///
/// TESTS
///
