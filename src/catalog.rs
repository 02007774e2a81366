//! Palette of field types a form can be assembled from.
//!
//! The set of types is closed: every consumer matches on [`FieldType`]
//! exhaustively, so adding a variant is a compile error everywhere a
//! mapping has to be extended.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Password,
    Date,
    Checkbox,
    Radio,
    Select,
    File,
}

impl FieldType {
    /// Every field type in palette order.
    pub const ALL: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Email,
        FieldType::Password,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Select,
        FieldType::File,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Select => "select",
            FieldType::File => "file",
        }
    }

    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            FieldType::Text => "Text Input",
            FieldType::Textarea => "Text Area",
            FieldType::Number => "Number Input",
            FieldType::Email => "Email Input",
            FieldType::Password => "Password Input",
            FieldType::Date => "Date Input",
            FieldType::Checkbox => "Checkbox",
            FieldType::Radio => "Radio Buttons",
            FieldType::Select => "Select Dropdown",
            FieldType::File => "File Upload",
        }
    }

    /// Whether instances of this type carry an option list.
    #[must_use]
    pub fn has_options(self) -> bool {
        match self {
            FieldType::Radio | FieldType::Select => true,
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Number
            | FieldType::Email
            | FieldType::Password
            | FieldType::Date
            | FieldType::Checkbox
            | FieldType::File => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownTypeTag(s.to_string()))
    }
}

/// Catalog entry shown in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub type_tag: FieldType,
    #[serde(rename = "defaultLabel")]
    pub default_label: &'static str,
}

const CATALOG: [FieldDescriptor; 10] = [
    descriptor(FieldType::Text),
    descriptor(FieldType::Textarea),
    descriptor(FieldType::Number),
    descriptor(FieldType::Email),
    descriptor(FieldType::Password),
    descriptor(FieldType::Date),
    descriptor(FieldType::Checkbox),
    descriptor(FieldType::Radio),
    descriptor(FieldType::Select),
    descriptor(FieldType::File),
];

const fn descriptor(type_tag: FieldType) -> FieldDescriptor {
    FieldDescriptor {
        type_tag,
        default_label: type_tag.default_label(),
    }
}

/// List the supported field types in palette order.
#[must_use]
pub fn list_field_types() -> &'static [FieldDescriptor] {
    &CATALOG
}

/// Look up the descriptor for a type tag.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownTypeTag`] if `type_tag` is not one of the
/// supported field types.
pub fn describe(type_tag: &str) -> Result<FieldDescriptor, CatalogError> {
    let field_type: FieldType = type_tag.parse()?;
    Ok(descriptor(field_type))
}
