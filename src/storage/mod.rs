//! Relational engine that receives the compiled form tables.

use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;

use crate::error::StorageError;
use crate::schema::{Dialect, TableDefinition};

#[async_trait]
pub trait FormStorage: Send + Sync {
    /// SQL dialect the engine speaks
    fn dialect(&self) -> Dialect;

    /// Execute a single statement and return the number of affected rows
    async fn execute(&self, statement: &str) -> Result<u64, StorageError>;

    /// Create the table described by `table`. Existing tables are never
    /// altered; creating a table that already exists is an engine error.
    /// Definitions that would render to more than one statement are refused
    /// without touching the engine.
    async fn create_table(&self, table: &TableDefinition) -> Result<(), StorageError> {
        table.ensure_single_statement()?;
        let ddl = table.to_sql(self.dialect());
        tracing::debug!(%ddl, "creating form table");
        self.execute(&ddl).await?;
        Ok(())
    }

    /// Check whether a table named `name` exists
    async fn table_exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Column names of table `name` in declaration order
    async fn table_columns(&self, name: &str) -> Result<Vec<String>, StorageError>;

    /// Close the underlying connection pool
    async fn close(&self);
}

pub type DynStorage = Arc<dyn FormStorage>;

#[cfg(feature = "postgres")]
pub mod postgres;
pub mod sqlite;

/// Create a storage backend from a connection URI.
pub async fn open(uri: &str) -> Result<DynStorage, Box<dyn Error + Send + Sync>> {
    if uri.starts_with("sqlite:") {
        Ok(Arc::new(sqlite::SqliteStorage::new(uri).await?))
    } else if uri.starts_with("postgres:") {
        #[cfg(feature = "postgres")]
        {
            Ok(Arc::new(postgres::PostgresStorage::new(uri).await?))
        }
        #[cfg(not(feature = "postgres"))]
        {
            Err("postgres backend not enabled".into())
        }
    } else {
        Err(format!("unknown storage backend: {uri}").into())
    }
}
