use super::FormStorage;
use crate::error::StorageError;
use crate::schema::Dialect;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};
use std::error::Error;

#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    #[tracing::instrument(skip_all)]
    /// Create a new Postgres storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails.
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let pool = PgPoolOptions::new().max_connections(5).connect(uri).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl FormStorage for PostgresStorage {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    #[tracing::instrument(skip_all)]
    async fn execute(&self, statement: &str) -> Result<u64, StorageError> {
        let result = sqlx::query(statement).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    // Unquoted identifiers are folded to lower case by Postgres.
    async fn table_exists(&self, name: &str) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM pg_tables WHERE tablename = $1")
            .bind(name.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn table_columns(&self, name: &str) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(
            "SELECT column_name FROM information_schema.columns WHERE table_name = $1 ORDER BY ordinal_position",
        )
        .bind(name.to_lowercase())
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|r| r.try_get::<String, _>("column_name").map_err(StorageError::Engine))
            .collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
