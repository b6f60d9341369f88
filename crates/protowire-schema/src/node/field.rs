use crate::prelude::*;

///
/// FieldDef
///
/// One declared field: number, identifier, declared type, collection shape,
/// and the per-field knobs the resolver consumes.
///

#[derive(Clone, Debug, Serialize)]
pub struct FieldDef {
    pub number: u32,
    pub name: String,
    pub ty: FieldType,
    pub repeated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatOverride>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<CompatibilityLevel>,
}

impl FieldDef {
    #[must_use]
    pub fn new(number: u32, name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            number,
            name: name.into(),
            ty,
            repeated: false,
            format: None,
            level: None,
        }
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    #[must_use]
    pub fn format(mut self, format: FormatOverride) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn level(mut self, level: CompatibilityLevel) -> Self {
        self.level = Some(level);
        self
    }
}

///
/// FieldType
///

#[derive(Clone, Debug, Serialize)]
pub enum FieldType {
    Builtin(BuiltinKind),
    Map(Box<MapDef>),
    Message(String),
    Scalar(ScalarType),
}

impl FieldType {
    #[must_use]
    pub fn message(name: impl Into<String>) -> Self {
        Self::Message(name.into())
    }

    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map(Box::new(MapDef::new(key, value)))
    }

    /// Display label used when deriving fallback pair message names.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Builtin(kind) => kind.to_string(),
            Self::Scalar(ty) => ty.to_string(),
            Self::Message(name) => name.clone(),
            Self::Map(map) => format!("Map_{}_{}", map.key.label(), map.value.label()),
        }
    }
}

///
/// MapDef
///
/// Key/value declarations for a keyed collection field. Key and value carry
/// their own format overrides; the owning field's override never applies to
/// them.
///

#[derive(Clone, Debug, Serialize)]
pub struct MapDef {
    pub key: FieldType,
    pub value: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_format: Option<FormatOverride>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_format: Option<FormatOverride>,

    /// Explicitly annotated as a map, as opposed to inferred from the
    /// container shape. Explicit maps reject ineligible keys instead of
    /// falling back to a pair message.
    pub explicit: bool,
}

impl MapDef {
    #[must_use]
    pub const fn new(key: FieldType, value: FieldType) -> Self {
        Self {
            key,
            value,
            key_format: None,
            value_format: None,
            explicit: false,
        }
    }

    #[must_use]
    pub const fn key_format(mut self, format: FormatOverride) -> Self {
        self.key_format = Some(format);
        self
    }

    #[must_use]
    pub const fn value_format(mut self, format: FormatOverride) -> Self {
        self.value_format = Some(format);
        self
    }

    #[must_use]
    pub const fn explicit(mut self) -> Self {
        self.explicit = true;
        self
    }
}
