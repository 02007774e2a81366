//! User accounts and credential verification.
//!
//! [`AccountStore`] is the storage capability (insert and look up rows);
//! [`CredentialStore`] layers hashing on top and implements registration and
//! login.

use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::access::Role;
use crate::error::AuthError;

mod common;
pub mod hasher;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod sqlite;

pub use hasher::{Argon2Hasher, CredentialHasher};

/// Database id of a registered account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row to insert for a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A stored account.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: i64,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Rejections by the database (such as a duplicate
    /// email) surface as [`AuthError::DuplicateOrConstraintViolation`].
    async fn insert_account(&self, account: NewAccount) -> Result<UserId, AuthError>;

    /// Find the account registered under `email`.
    async fn lookup_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError>;

    /// Close the underlying connection pool.
    async fn close(&self);
}

pub type DynAccounts = Arc<dyn AccountStore>;

/// Create an account store from a connection URI.
pub async fn open(uri: &str) -> Result<DynAccounts, Box<dyn Error + Send + Sync>> {
    if uri.starts_with("sqlite:") {
        Ok(Arc::new(sqlite::SqliteAccounts::new(uri).await?))
    } else if uri.starts_with("postgres:") {
        #[cfg(feature = "postgres")]
        {
            Ok(Arc::new(postgres::PostgresAccounts::new(uri).await?))
        }
        #[cfg(not(feature = "postgres"))]
        {
            Err("postgres backend not enabled".into())
        }
    } else {
        Err(format!("unknown account store backend: {uri}").into())
    }
}

/// Compared against when the email is unknown, so both failure paths do the
/// same amount of hashing work.
const DUMMY_CREDENTIAL: &str = "formwright-dummy-credential";

/// Registration and login on top of an [`AccountStore`].
#[derive(Clone)]
pub struct CredentialStore {
    accounts: DynAccounts,
    hasher: Arc<dyn CredentialHasher>,
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialStore {
    pub fn new(accounts: DynAccounts, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            accounts,
            hasher,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    #[must_use]
    pub fn accounts(&self) -> &DynAccounts {
        &self.accounts
    }

    /// Hash `password` and store a new account.
    ///
    /// # Errors
    ///
    /// [`AuthError::DuplicateOrConstraintViolation`] if the database rejects
    /// the insert, [`AuthError::Hash`] or [`AuthError::Engine`] otherwise.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserId, AuthError> {
        let password_hash = self.hash(password).await?;
        let id = self
            .accounts
            .insert_account(NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role,
            })
            .await?;
        tracing::info!(user_id = %id, %role, "registered account");
        Ok(id)
    }

    /// Check `password` for the account registered under `email` and return
    /// its role.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] when the email is unknown or the
    /// password does not match; the two cases are indistinguishable.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Role, AuthError> {
        let account = self.accounts.lookup_by_email(email).await?;
        let (stored_hash, role) = match account {
            Some(account) => (account.password_hash, Some(account.role)),
            None => (self.dummy_hash().await?.to_string(), None),
        };
        let matches = self.check(password, stored_hash).await?;
        match role {
            Some(role) if matches => Ok(role),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn dummy_hash(&self) -> Result<&str, AuthError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hash(DUMMY_CREDENTIAL))
            .await?;
        Ok(hash.as_str())
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
    }

    async fn check(&self, password: &str, stored_hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))
    }
}
