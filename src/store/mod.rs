//! Credential store backed by a single `SQLite` table.
//!
//! The store only ever inserts and reads users. Uniqueness of the identifier
//! is enforced by the `UNIQUE` constraint, so a racing duplicate insert fails
//! atomically without touching the existing row.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Connection, Row, SqlitePool,
};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info_span, Instrument};
use utoipa::ToSchema;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("identifier already registered")]
    DuplicateIdentifier,
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Full user row, only used inside the auth flow.
#[derive(Clone)]
pub struct User {
    pub id: i64,
    pub identifier: String,
    pub password_hash: String,
    pub created_at: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("password_hash", &"***")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Public projection of a user, without the password hash.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub identifier: String,
    pub created_at: String,
}

#[derive(Clone, Debug)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open a pool for the given DSN, e.g. `sqlite://auth.db?mode=rwc`.
    ///
    /// # Errors
    /// Returns an error if the DSN is invalid or the database cannot be opened.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(dsn)
            .with_context(|| format!("Invalid database DSN: {dsn}"))?;

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        Ok(Self::from_pool(pool))
    }

    /// Single-connection in-memory store. Every connection to `:memory:` is a
    /// separate database, so the pool must never open a second one.
    ///
    /// # Errors
    /// Returns an error if `SQLite` cannot be opened or the schema fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply the schema. Safe to run on every start.
    ///
    /// # Errors
    /// Returns an error if the schema statement fails.
    pub async fn migrate(&self) -> Result<()> {
        let span = info_span!("db.query", db.system = "sqlite", db.operation = "CREATE");
        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("Failed to apply schema")?;
        Ok(())
    }

    /// Insert a new user and return its id.
    ///
    /// # Errors
    /// `DuplicateIdentifier` if the identifier exists, `Unavailable` otherwise.
    pub async fn create_user(&self, identifier: &str, password_hash: &str) -> Result<i64, StoreError> {
        let query = "INSERT INTO users (identifier, password_hash) VALUES (?1, ?2)";
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(identifier)
            .bind(password_hash)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateIdentifier),
            Err(err) => Err(StoreError::Unavailable(err)),
        }
    }

    /// Exact-match lookup; callers pass the already normalized identifier.
    ///
    /// # Errors
    /// `Unavailable` if the query fails.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, StoreError> {
        let query =
            "SELECT id, identifier, password_hash, created_at FROM users WHERE identifier = ?1";
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            identifier: row.get("identifier"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }

    /// Newest users first. Debug listing only.
    ///
    /// # Errors
    /// `Unavailable` if the query fails.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        let query = "SELECT id, identifier, created_at FROM users ORDER BY id DESC";
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserSummary {
                id: row.get("id"),
                identifier: row.get("identifier"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// # Errors
    /// Returns the underlying error if a connection cannot be acquired or pinged.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let span = info_span!("db.ping", db.system = "sqlite", db.operation = "PING");
        async {
            let mut conn = self.pool.acquire().await?;
            conn.ping().await
        }
        .instrument(span)
        .await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
