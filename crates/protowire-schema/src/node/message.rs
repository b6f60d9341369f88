use crate::prelude::*;

///
/// MessageDef
///

#[derive(Clone, Debug, Serialize)]
pub struct MessageDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl MessageDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn get_field(&self, number: u32) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.number == number)
    }
}

///
/// ModelDef
///
/// The full declared model handed to the builder: package name, default
/// compatibility level, and the ordered message list.
///

#[derive(Clone, Debug, Serialize)]
pub struct ModelDef {
    pub package: String,
    pub default_level: CompatibilityLevel,
    pub messages: Vec<MessageDef>,
}

impl ModelDef {
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            default_level: CompatibilityLevel::default(),
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn get_message(&self, name: &str) -> Option<&MessageDef> {
        self.messages.iter().find(|m| m.name == name)
    }
}
