//! Survey form builder backend.
//!
//! Administrators assemble forms from a fixed palette of field types; each
//! submitted form becomes a freshly created database table. Users log in
//! with a role that decides whether they land on the form builder or on the
//! plain landing page.

pub mod access;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod schema;
pub mod server;
pub mod service;
pub mod storage;

pub use access::{Destination, Role, route_for};
pub use catalog::{FieldDescriptor, FieldType, describe, list_field_types};
pub use document::{FieldId, FieldInstance, FieldOption, FormDocument, FormSubmission};
pub use error::FormError;
pub use schema::{Dialect, TableDefinition, compile, compile_submission};
pub use service::FormService;
