use crate::prelude::*;

///
/// ResolvedModel
///
/// Output of the build step: every field occurrence carries its resolved
/// representation, fallback pair messages are synthesized and appended, and
/// nothing mutates afterwards.
///

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedModel {
    pub package: String,
    pub messages: Vec<ResolvedMessage>,
}

impl ResolvedModel {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedMessage> {
        self.messages.iter().find(|m| m.name == name)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.name == name)
    }
}

///
/// ResolvedMessage
///

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedMessage {
    pub name: String,
    pub fields: Vec<ResolvedField>,

    /// Synthesized pair message backing an ineligible map.
    pub synthetic_pair: bool,
}

impl ResolvedMessage {
    #[must_use]
    pub fn get_field(&self, number: u32) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.number == number)
    }
}

///
/// ResolvedField
///

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedField {
    pub number: u32,
    pub name: String,
    pub repeated: bool,
    pub kind: ResolvedKind,
}

///
/// ResolvedKind
///

#[derive(Clone, Debug, Serialize)]
pub enum ResolvedKind {
    Builtin {
        kind: BuiltinKind,
        repr: Representation,
    },
    Map {
        key: Box<ResolvedKind>,
        value: Box<ResolvedKind>,
        /// `Some(name)` when the map fell back to a named pair message;
        /// byte layout is unchanged, only schema text differs.
        pair_message: Option<String>,
    },
    Message(String),
    Scalar {
        ty: ScalarType,
        repr: ScalarRepr,
    },
}

impl ResolvedKind {
    /// Representations that frame as a length-delimited submessage.
    #[must_use]
    pub const fn is_message_framed(&self) -> bool {
        match self {
            Self::Builtin { repr, .. } => repr.is_message(),
            Self::Message(_) => true,
            Self::Map { .. } | Self::Scalar { .. } => false,
        }
    }
}
