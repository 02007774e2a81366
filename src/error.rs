//! Domain error types for the form builder service
//!
//! Errors are structured internally for logging/debugging. Credential
//! failures are reported to clients with one generic message; storage
//! engine failures are passed through with the engine's own text.

use thiserror::Error;

/// Top-level service error type
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown field type: {0}")]
    UnknownTypeTag(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid form: {0}")]
    InvalidDocument(&'static str),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email and wrong password are deliberately the same variant.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    DuplicateOrConstraintViolation(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Engine(#[source] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Constraint(String),

    /// Statement refused before it was sent to the engine.
    #[error("{0}")]
    Rejected(#[from] SchemaError),

    #[error("Database error: {0}")]
    Engine(#[source] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl From<sqlx::Error> for StorageError {
    /// Statements rejected by the database keep the engine's message; any
    /// other failure (pool, I/O, protocol) is an engine error.
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => StorageError::Constraint(db.message().to_string()),
            other => StorageError::Engine(other),
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => {
                AuthError::DuplicateOrConstraintViolation(db.message().to_string())
            }
            other => AuthError::Engine(other),
        }
    }
}

impl FormError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            FormError::Catalog(_) => 400,
            FormError::Schema(_) => 400,

            FormError::Auth(AuthError::InvalidCredentials) => 401,
            FormError::Auth(AuthError::DuplicateOrConstraintViolation(_)) => 400,
            FormError::Auth(AuthError::UnknownRole(_)) => 400,
            FormError::Auth(_) => 500,

            FormError::Storage(StorageError::Rejected(_)) => 400,
            FormError::Storage(_) => 500,
            FormError::Config(_) => 500,
            FormError::BadRequest(_) => 400,
        }
    }

    /// Client-facing message
    pub fn client_message(&self) -> String {
        match self {
            FormError::Auth(AuthError::InvalidCredentials) => "Invalid email or password".into(),
            FormError::Auth(AuthError::DuplicateOrConstraintViolation(msg)) => {
                format!("User registration failed: {msg}")
            }
            FormError::Auth(AuthError::Hash(_)) => "Service temporarily unavailable".into(),
            FormError::Auth(AuthError::Engine(e)) => format!("Database error: {e}"),
            FormError::Auth(e @ AuthError::UnknownRole(_)) => e.to_string(),

            FormError::Schema(e) => e.to_string(),
            FormError::Catalog(e) => e.to_string(),

            FormError::Storage(StorageError::Constraint(msg)) => {
                format!("Error creating table: {msg}")
            }
            FormError::Storage(StorageError::Engine(e)) => format!("Error creating table: {e}"),
            FormError::Storage(StorageError::Rejected(e)) => e.to_string(),

            FormError::Config(_) => "Service temporarily unavailable".into(),
            FormError::BadRequest(msg) => msg.clone(),
        }
    }

    /// Short machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            FormError::Catalog(_) => "unknown_type",
            FormError::Schema(SchemaError::InvalidDocument(_)) => "invalid_document",
            FormError::Schema(SchemaError::InvalidIdentifier(_)) => "invalid_identifier",
            FormError::Auth(AuthError::InvalidCredentials) => "invalid_credentials",
            FormError::Auth(AuthError::DuplicateOrConstraintViolation(_)) => "constraint_violation",
            FormError::Auth(AuthError::UnknownRole(_)) => "unknown_role",
            FormError::Auth(_) => "engine_error",
            FormError::Storage(StorageError::Constraint(_)) => "constraint_violation",
            FormError::Storage(StorageError::Engine(_)) => "engine_error",
            FormError::Storage(StorageError::Rejected(_)) => "invalid_identifier",
            FormError::Config(_) => "config_error",
            FormError::BadRequest(_) => "bad_request",
        }
    }
}
