//! Field descriptors for the submission forms the client renders.
//!
//! Each form is built from explicit per-field configuration, so two forms
//! sharing a field name (e.g. `tags`) can carry different help text without
//! touching any shared state.

use serde::Serialize;

/// Help text shown under every tag input.
pub const TAGS_HELP_TEXT: &str = "Please type your tags";

/// Input widget kinds understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextArea,
    TagList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help_text: Option<&'static str>,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            help_text: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help_text(mut self, text: &'static str) -> Self {
        self.help_text = Some(text);
        self
    }
}

/// A named, ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSpec {
    pub name: &'static str,
    pub fields: Vec<FormField>,
}

impl FormSpec {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Form for asking a new question.
pub fn main_post_form() -> FormSpec {
    FormSpec {
        name: "main_post",
        fields: vec![
            FormField::new("title", "Title", FieldKind::Text).required(),
            FormField::new("content", "Content", FieldKind::TextArea).required(),
            FormField::new("tags", "Tags", FieldKind::TagList).help_text(TAGS_HELP_TEXT),
        ],
    }
}

/// Form for editing an existing question.
pub fn main_post_revision_form() -> FormSpec {
    FormSpec {
        name: "main_post_revision",
        fields: vec![
            FormField::new("content", "Content", FieldKind::TextArea).required(),
            FormField::new("summary", "Edit summary", FieldKind::Text),
            FormField::new("tags", "Tags", FieldKind::TagList).help_text(TAGS_HELP_TEXT),
        ],
    }
}

/// Form for replying to or editing a reply.
pub fn reply_post_form() -> FormSpec {
    FormSpec {
        name: "reply_post",
        fields: vec![
            FormField::new("content", "Content", FieldKind::TextArea).required(),
            FormField::new("summary", "Edit summary", FieldKind::Text),
        ],
    }
}
