//! In-memory model of a form being assembled.
//!
//! A [`FormDocument`] is owned by a single editing session. Fields are kept
//! in placement order, which is also the column order of the compiled table.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::catalog::FieldType;

/// Identifier of a placed field, unique for the lifetime of its document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    fn generate(field_type: FieldType) -> Self {
        Self(format!("{}-{}", field_type, Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One choice of a radio or select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    /// Build an option whose value is derived from its label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: storage_name(label),
        }
    }
}

/// A configured entry of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInstance {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub name: String,
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

/// Partial update of a field's editable attributes. `None` leaves the
/// attribute untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldUpdate {
    pub label: Option<String>,
    pub name: Option<String>,
    pub placeholder: Option<String>,
}

/// Partial update of a single option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OptionUpdate {
    pub label: Option<String>,
    pub value: Option<String>,
}

/// Derive a storage identifier from a display label: lowercase, with every
/// run of whitespace replaced by a single underscore.
#[must_use]
pub fn storage_name(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_space = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    out
}

fn default_placeholder(label: &str) -> String {
    format!("Enter {}", label.to_lowercase())
}

fn default_options() -> Vec<FieldOption> {
    vec![
        FieldOption {
            label: "Option 1".into(),
            value: "option1".into(),
        },
        FieldOption {
            label: "Option 2".into(),
            value: "option2".into(),
        },
    ]
}

/// A form under construction.
///
/// Deserialized documents are checked: option lists appear exactly on radio
/// and select fields, and field ids do not repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentParts")]
pub struct FormDocument {
    #[serde(rename = "formName")]
    form_name: String,
    #[serde(rename = "formElements")]
    fields: Vec<FieldInstance>,
}

#[derive(Deserialize)]
struct DocumentParts {
    #[serde(rename = "formName", default)]
    form_name: String,
    #[serde(rename = "formElements", default)]
    fields: Vec<FieldInstance>,
}

impl TryFrom<DocumentParts> for FormDocument {
    type Error = String;

    fn try_from(parts: DocumentParts) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::new();
        for field in &parts.fields {
            if field.options.is_some() != field.field_type.has_options() {
                return Err(format!(
                    "field {}: options are only allowed on radio and select fields, and required there",
                    field.id
                ));
            }
            if !seen.insert(&field.id) {
                return Err(format!("duplicate field id {}", field.id));
            }
        }
        Ok(Self {
            form_name: parts.form_name,
            fields: parts.fields,
        })
    }
}

impl FormDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn form_name(&self) -> &str {
        &self.form_name
    }

    pub fn set_form_name(&mut self, name: impl Into<String>) {
        self.form_name = name.into();
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldInstance] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, id: &FieldId) -> Option<&FieldInstance> {
        self.fields.iter().find(|f| &f.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Append a new field of `field_type` with catalog defaults.
    pub fn place(&mut self, field_type: FieldType) -> &FieldInstance {
        let label = field_type.default_label();
        let instance = FieldInstance {
            id: FieldId::generate(field_type),
            field_type,
            label: label.to_string(),
            name: storage_name(label),
            placeholder: default_placeholder(label),
            options: field_type.has_options().then(default_options),
        };
        self.fields.push(instance);
        &self.fields[self.fields.len() - 1]
    }

    /// Merge `changes` into the field with `id`. Unknown ids are ignored.
    ///
    /// Changing the label does not re-derive name or placeholder.
    pub fn update(&mut self, id: &FieldId, changes: FieldUpdate) {
        let Some(field) = self.field_mut(id) else {
            return;
        };
        if let Some(label) = changes.label {
            field.label = label;
        }
        if let Some(name) = changes.name {
            field.name = name;
        }
        if let Some(placeholder) = changes.placeholder {
            field.placeholder = placeholder;
        }
    }

    /// Remove the field with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: &FieldId) {
        self.fields.retain(|f| &f.id != id);
    }

    /// Append `Option {n+1}` to the field's option list, where `n` is the
    /// current number of options. Labels are not renumbered after removals,
    /// so they can repeat.
    pub fn add_option(&mut self, id: &FieldId) {
        if let Some(options) = self.options_mut(id) {
            let n = options.len() + 1;
            options.push(FieldOption {
                label: format!("Option {n}"),
                value: format!("option{n}"),
            });
        }
    }

    pub fn remove_option(&mut self, id: &FieldId, index: usize) {
        if let Some(options) = self.options_mut(id) {
            if index < options.len() {
                options.remove(index);
            }
        }
    }

    pub fn update_option(&mut self, id: &FieldId, index: usize, changes: OptionUpdate) {
        let Some(option) = self.options_mut(id).and_then(|o| o.get_mut(index)) else {
            return;
        };
        if let Some(label) = changes.label {
            option.label = label;
        }
        if let Some(value) = changes.value {
            option.value = value;
        }
    }

    /// Reset to an empty, unnamed document. Called after a successful submit.
    pub fn clear(&mut self) {
        self.form_name.clear();
        self.fields.clear();
    }

    /// Wire representation used by the create-form endpoint.
    #[must_use]
    pub fn to_submission(&self) -> FormSubmission {
        FormSubmission {
            form_name: self.form_name.clone(),
            form_elements: self
                .fields
                .iter()
                .map(|f| SubmittedElement {
                    field_type: f.field_type.to_string(),
                    name: f.name.clone(),
                    label: Some(f.label.clone()),
                })
                .collect(),
        }
    }

    fn field_mut(&mut self, id: &FieldId) -> Option<&mut FieldInstance> {
        self.fields.iter_mut().find(|f| &f.id == id)
    }

    fn options_mut(&mut self, id: &FieldId) -> Option<&mut Vec<FieldOption>> {
        self.field_mut(id).and_then(|f| f.options.as_mut())
    }
}

/// A form as posted by a client. Element types are free strings; types
/// outside the catalog still compile, to the default column type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    #[serde(rename = "formName", default)]
    pub form_name: String,
    #[serde(rename = "formElements", default)]
    pub form_elements: Vec<SubmittedElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedElement {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
