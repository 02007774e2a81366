//! SQL schemas shared by the account store implementations.

/// SQL schemas for the users table.
pub mod sql {
    /// Accounts keyed by an integer id; `email` is the lookup key.
    pub const USERS_TABLE_SQLITE: &str = "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            user_type TEXT NOT NULL CHECK (user_type IN ('admin', 'user')),
            created_at INTEGER NOT NULL
        )";

    #[cfg(feature = "postgres")]
    pub const USERS_TABLE_POSTGRES: &str = "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            user_type TEXT NOT NULL CHECK (user_type IN ('admin', 'user')),
            created_at BIGINT NOT NULL
        )";
}
