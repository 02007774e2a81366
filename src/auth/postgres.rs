use super::common::sql::USERS_TABLE_POSTGRES;
use super::{AccountStore, NewAccount, UserAccount, UserId, async_trait};
use crate::access::Role;
use crate::error::AuthError;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::error::Error;
use std::str::FromStr;

#[derive(Clone)]
pub struct PostgresAccounts {
    pool: PgPool,
}

impl PostgresAccounts {
    /// Create a new Postgres account store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let pool = PgPoolOptions::new().max_connections(5).connect(uri).await?;
        sqlx::query(USERS_TABLE_POSTGRES).execute(&pool).await?;
        Ok(Self { pool })
    }
}

fn account_from_row(row: &PgRow) -> Result<UserAccount, AuthError> {
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
impl AccountStore for PostgresAccounts {
    async fn insert_account(&self, account: NewAccount) -> Result<UserId, AuthError> {
        let row = sqlx::query(
            "INSERT INTO users (username, email, password_hash, user_type, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(chrono::Utc::now().timestamp())
        .fetch_one(&self.pool)
        .await?;
        let id: i64 = row.try_get(0).map_err(AuthError::Engine)?;
        Ok(UserId(id))
    }

    async fn lookup_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, user_type, created_at FROM users WHERE email = $1",
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
