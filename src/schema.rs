//! Compilation of form definitions into relational table definitions.
//!
//! Compilation is pure. The resulting [`TableDefinition`] is rendered to
//! `CREATE TABLE` text per SQL dialect and executed by a
//! [`crate::storage::FormStorage`] backend.
//!
//! Table and column names are taken verbatim from the form. They are neither
//! quoted, escaped, nor deduplicated here; a definition the engine cannot
//! accept is rejected by the engine. The one exception is the statement
//! separator: a name containing `;` is always rejected, so a definition
//! renders to exactly one `CREATE TABLE`. See [`validate_identifiers`] for
//! the opt-in strict check applied by the service layer.

use regex::Regex;
use std::sync::OnceLock;

use crate::catalog::FieldType;
use crate::document::{FormDocument, FormSubmission};
use crate::error::SchemaError;

/// Length of variable-length string columns.
pub const VARCHAR_LEN: u16 = 255;

/// Name of the synthetic primary key column.
pub const ID_COLUMN: &str = "id";

/// Fixed domain for checkbox and radio columns. This does not follow the
/// options configured on the field.
pub const CHOICE_DOMAIN: [&str; 2] = ["option1", "option2"];

const STATEMENT_SEPARATOR: char = ';';

/// SQL flavour used when rendering a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
    Postgres,
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            other => Err(format!("unknown SQL dialect: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-incrementing integer primary key.
    Serial,
    VarChar(u16),
    Integer,
    Date,
    /// String restricted to a fixed set of values.
    Enum(Vec<String>),
}

impl ColumnType {
    /// Column type for a field type. `None` stands for a type outside the
    /// catalog, which maps to the same default as free-text fields.
    #[must_use]
    pub fn for_field(field_type: Option<FieldType>) -> Self {
        let Some(field_type) = field_type else {
            return ColumnType::VarChar(VARCHAR_LEN);
        };
        match field_type {
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Email
            | FieldType::Password
            | FieldType::Select
            | FieldType::File => ColumnType::VarChar(VARCHAR_LEN),
            FieldType::Number => ColumnType::Integer,
            FieldType::Date => ColumnType::Date,
            FieldType::Checkbox | FieldType::Radio => {
                ColumnType::Enum(CHOICE_DOMAIN.iter().map(|v| (*v).to_string()).collect())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    fn render(&self, dialect: Dialect) -> String {
        let name = &self.name;
        match (&self.column_type, dialect) {
            (ColumnType::Serial, Dialect::MySql) => format!("{name} INT AUTO_INCREMENT PRIMARY KEY"),
            (ColumnType::Serial, Dialect::Sqlite) => {
                format!("{name} INTEGER PRIMARY KEY AUTOINCREMENT")
            }
            (ColumnType::Serial, Dialect::Postgres) => format!("{name} SERIAL PRIMARY KEY"),
            (ColumnType::VarChar(len), _) => format!("{name} VARCHAR({len})"),
            (ColumnType::Integer, Dialect::MySql) => format!("{name} INT"),
            (ColumnType::Integer, _) => format!("{name} INTEGER"),
            (ColumnType::Date, _) => format!("{name} DATE"),
            (ColumnType::Enum(values), Dialect::MySql) => {
                format!("{name} ENUM({})", quoted_list(values))
            }
            (ColumnType::Enum(values), _) => format!(
                "{name} VARCHAR({VARCHAR_LEN}) CHECK ({name} IN ({}))",
                quoted_list(values)
            ),
        }
    }
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A table to be created for a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Render as a `CREATE TABLE` statement.
    #[must_use]
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| c.render(dialect))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE {} ({columns})", self.name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check that [`TableDefinition::to_sql`] yields a single statement.
    ///
    /// Identifiers are the only unquoted text taken from the form; enum
    /// values are always rendered as escaped literals.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] for the first name that
    /// contains a statement separator.
    pub fn ensure_single_statement(&self) -> Result<(), SchemaError> {
        match std::iter::once(&self.name)
            .chain(self.columns.iter().map(|c| &c.name))
            .find(|name| name.contains(STATEMENT_SEPARATOR))
        {
            Some(name) => Err(SchemaError::InvalidIdentifier(name.clone())),
            None => Ok(()),
        }
    }
}

fn build<'a, I>(form_name: &str, fields: I) -> Result<TableDefinition, SchemaError>
where
    I: ExactSizeIterator<Item = (&'a str, Option<FieldType>)>,
{
    if form_name.trim().is_empty() {
        return Err(SchemaError::InvalidDocument("form name is required"));
    }
    if fields.len() == 0 {
        return Err(SchemaError::InvalidDocument("form has no fields"));
    }
    let mut columns = Vec::with_capacity(fields.len() + 1);
    columns.push(ColumnDefinition {
        name: ID_COLUMN.to_string(),
        column_type: ColumnType::Serial,
    });
    for (name, field_type) in fields {
        if name.trim().is_empty() {
            return Err(SchemaError::InvalidDocument("every field needs a name"));
        }
        columns.push(ColumnDefinition {
            name: name.to_string(),
            column_type: ColumnType::for_field(field_type),
        });
    }
    let table = TableDefinition {
        name: form_name.to_string(),
        columns,
    };
    table.ensure_single_statement()?;
    Ok(table)
}

/// Compile an in-memory form document.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidDocument`] if the form name is blank, the
/// form has no fields, or a field has a blank name, and
/// [`SchemaError::InvalidIdentifier`] if a name contains `;`.
pub fn compile(document: &FormDocument) -> Result<TableDefinition, SchemaError> {
    let table = build(
        document.form_name(),
        document
            .fields()
            .iter()
            .map(|f| (f.name.as_str(), Some(f.field_type))),
    )?;
    tracing::debug!(table = %table.name, columns = table.columns.len(), "compiled form document");
    Ok(table)
}

/// Compile a form as posted by a client. Element types outside the catalog
/// compile to the default string column.
///
/// # Errors
///
/// Same as [`compile`].
pub fn compile_submission(submission: &FormSubmission) -> Result<TableDefinition, SchemaError> {
    let fields = submission.form_elements.iter().map(|e| {
        let field_type = e.field_type.parse::<FieldType>().ok();
        if field_type.is_none() {
            tracing::debug!(field_type = %e.field_type, name = %e.name, "unrecognized field type, using default column type");
        }
        (e.name.as_str(), field_type)
    });
    let table = build(&submission.form_name, fields)?;
    tracing::debug!(table = %table.name, columns = table.columns.len(), "compiled form submission");
    Ok(table)
}

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("valid identifier pattern"))
}

/// Check that the table name and every column name are plain SQL
/// identifiers and that column names do not repeat.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidIdentifier`] naming the first offending
/// identifier.
pub fn validate_identifiers(table: &TableDefinition) -> Result<(), SchemaError> {
    let re = identifier_re();
    if !re.is_match(&table.name) {
        return Err(SchemaError::InvalidIdentifier(table.name.clone()));
    }
    let mut seen = std::collections::HashSet::new();
    for column in &table.columns {
        if !re.is_match(&column.name) || !seen.insert(column.name.to_ascii_lowercase()) {
            return Err(SchemaError::InvalidIdentifier(column.name.clone()));
        }
    }
    Ok(())
}
