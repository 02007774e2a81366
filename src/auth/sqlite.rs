use super::common::sql::USERS_TABLE_SQLITE;
use super::{AccountStore, NewAccount, UserAccount, UserId, async_trait};
use crate::access::Role;
use crate::error::AuthError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::error::Error;
use std::str::FromStr;

#[derive(Clone)]
pub struct SqliteAccounts {
    pool: SqlitePool,
}

impl SqliteAccounts {
    /// Create a new `SQLite` account store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| {
                format!(
                    "Invalid SQLite account database URI '{}': {}

Please ensure the URI is in the correct format:
- File database: sqlite:///path/to/auth.db
- In-memory database: sqlite::memory:
- Relative path: sqlite://relative/path.db",
                    path, e
                )
            })?
            .create_if_missing(true);

        // every connection to an in-memory database is a separate database
        let max_connections = if path.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                format!(
                    "Failed to connect to SQLite account database '{}': {}

Possible causes:
- Parent directory does not exist and cannot be created
- Permission denied accessing the database file or directory
- Database file is corrupted or not a valid SQLite database
- Database is locked by another process",
                    path, e
                )
            })?;

        sqlx::query(USERS_TABLE_SQLITE)
            .execute(&pool)
            .await
            .map_err(|e| {
                format!("Failed to create users table in SQLite account database '{}': {}", path, e)
            })?;

        Ok(Self { pool })
    }
}

fn account_from_row(row: &SqliteRow) -> Result<UserAccount, AuthError> {
    let role: String = row.try_get("user_type").map_err(AuthError::Engine)?;
    let role = Role::from_str(&role)
        .map_err(|e| AuthError::Engine(sqlx::Error::Decode(Box::new(e))))?;
    Ok(UserAccount {
        id: UserId(row.try_get("id").map_err(AuthError::Engine)?),
        username: row.try_get("username").map_err(AuthError::Engine)?,
        email: row.try_get("email").map_err(AuthError::Engine)?,
        password_hash: row.try_get("password_hash").map_err(AuthError::Engine)?,
        role,
        created_at: row.try_get("created_at").map_err(AuthError::Engine)?,
    })
}

#[async_trait]
impl AccountStore for SqliteAccounts {
    async fn insert_account(&self, account: NewAccount) -> Result<UserId, AuthError> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, user_type, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(UserId(result.last_insert_rowid()))
    }

    async fn lookup_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, user_type, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AuthError::Engine)?;
        row.as_ref().map(account_from_row).transpose()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
