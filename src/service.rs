//! Boundary operations: registration, login and form table creation.
//!
//! Validation happens here, before anything reaches the database. Database
//! failures are returned unchanged and never retried.

use std::error::Error;

use crate::access::{Destination, Role, route_for};
use crate::auth::{self, CredentialStore, UserId};
use crate::config::Config;
use crate::document::{FormDocument, FormSubmission};
use crate::error::{FormError, SchemaError};
use crate::schema::{self, TableDefinition};
use crate::storage::{self, DynStorage};

/// Result of a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: Role,
    pub destination: Destination,
}

/// Process-wide handles shared by all requests.
#[derive(Clone)]
pub struct FormService {
    credentials: CredentialStore,
    storage: DynStorage,
    strict_identifiers: bool,
}

impl FormService {
    pub fn new(credentials: CredentialStore, storage: DynStorage) -> Self {
        Self {
            credentials,
            storage,
            strict_identifiers: false,
        }
    }

    #[must_use]
    pub fn with_strict_identifiers(mut self, strict: bool) -> Self {
        self.strict_identifiers = strict;
        self
    }

    /// Connect to both databases named in `cfg`.
    ///
    /// # Errors
    ///
    /// Returns an error if either database cannot be opened. Callers treat
    /// this as fatal.
    pub async fn open(cfg: &Config) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let storage = storage::open(&cfg.db_path).await?;
        let accounts = auth::open(&cfg.auth_db_path).await?;
        let hasher = cfg.argon2.hasher()?;
        tracing::info!(db = %cfg.db_path, auth_db = %cfg.auth_db_path, "databases opened");
        Ok(Self::new(CredentialStore::new(accounts, hasher), storage)
            .with_strict_identifiers(cfg.strict_identifiers))
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    #[must_use]
    pub fn storage(&self) -> &DynStorage {
        &self.storage
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// [`FormError::BadRequest`] for missing fields, `UnknownRole` for a role
    /// other than `admin`/`user`, otherwise the credential store's error.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<UserId, FormError> {
        if [username, email, password, role].iter().any(|v| v.trim().is_empty()) {
            return Err(FormError::BadRequest("Please fill in all fields".into()));
        }
        let role: Role = role.parse()?;
        let id = self
            .credentials
            .register(username, email, password, role)
            .await
            .inspect_err(|e| tracing::info!(error = %e, "registration failed"))?;
        Ok(id)
    }

    /// Verify credentials and pick the view the user lands on.
    ///
    /// # Errors
    ///
    /// [`crate::error::AuthError::InvalidCredentials`] for an unknown email
    /// or a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, FormError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(FormError::BadRequest("Please fill in all fields".into()));
        }
        let role = self
            .credentials
            .verify(email, password)
            .await
            .inspect_err(|e| tracing::info!(error = %e, "login failed"))?;
        Ok(LoginOutcome {
            role,
            destination: route_for(role.as_str()),
        })
    }

    /// Compile a posted form and create its table.
    ///
    /// # Errors
    ///
    /// [`SchemaError`] when the form is rejected before reaching the
    /// database, otherwise the engine's error.
    pub async fn create_form(
        &self,
        submission: &FormSubmission,
    ) -> Result<TableDefinition, FormError> {
        let table = schema::compile_submission(submission)?;
        self.create_table(table).await
    }

    /// Compile and create the table for an in-memory document, clearing the
    /// document on success. The document is left untouched on failure.
    ///
    /// # Errors
    ///
    /// Same as [`FormService::create_form`].
    pub async fn submit_document(
        &self,
        document: &mut FormDocument,
    ) -> Result<TableDefinition, FormError> {
        let table = schema::compile(document)?;
        let table = self.create_table(table).await?;
        document.clear();
        Ok(table)
    }

    async fn create_table(&self, table: TableDefinition) -> Result<TableDefinition, FormError> {
        if self.strict_identifiers {
            schema::validate_identifiers(&table).map_err(|e: SchemaError| {
                tracing::info!(error = %e, "form rejected by identifier policy");
                e
            })?;
        }
        match self.storage.create_table(&table).await {
            Ok(()) => {
                tracing::info!(table = %table.name, columns = table.columns.len(), "form table created");
                Ok(table)
            }
            Err(e) => {
                tracing::error!(table = %table.name, error = %e, "error creating table");
                Err(e.into())
            }
        }
    }

    /// Close both connection pools.
    pub async fn close(&self) {
        self.storage.close().await;
        self.credentials.accounts().close().await;
    }
}
