//! Repository Module
//!
//! Query layer over the SurrealDB tables. Every repository receives the
//! database handle explicitly; there is no global connection.

// Accounts
pub mod admin;
pub mod buyer;
pub mod shipper;

// Orders
pub mod fulfillment;
pub mod order;

// Messaging
pub mod message;
pub mod notice;

// Re-exports
pub use admin::AdminRepository;
pub use buyer::BuyerRepository;
pub use fulfillment::{FulfillmentRepository, ShipperWrite, TransitionCommit};
pub use message::MessageRepository;
pub use notice::NoticeRepository;
pub use order::OrderRepository;
pub use shipper::ShipperRepository;

use serde::Serialize;
use shared::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// A guarded write found the record changed since it was read
    #[error("Stale write: {0}")]
    Stale(String),

    /// Transaction lost to a concurrent writer; safe to run again
    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl RepoError {
    /// Classify a raw database message: optimistic-transaction conflicts
    /// become [`RepoError::Conflict`], everything else [`RepoError::Database`]
    pub fn from_db_message(msg: String) -> Self {
        if is_write_conflict(&msg) {
            RepoError::Conflict(msg)
        } else {
            RepoError::Database(msg)
        }
    }

    /// Whether re-reading and re-running the write may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepoError::Stale(_) | RepoError::Conflict(_))
    }
}

fn is_write_conflict(msg: &str) -> bool {
    msg.contains("can be retried") || msg.contains("read or write conflict")
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::from_db_message(err.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Validation(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Stale(msg) => {
                AppError::with_message(ErrorCode::OrderTransitionRejected, msg)
            }
            RepoError::Conflict(msg) | RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Serialize a record for `CONTENT`, dropping its `id` (the key is passed
/// separately through `type::thing`).
pub(crate) fn record_content<T: Serialize>(record: &T) -> RepoResult<serde_json::Value> {
    let mut value = serde_json::to_value(record)?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Insert `record` under `table:key`
    pub async fn create_record<T: Serialize>(
        &self,
        table: &'static str,
        key: &str,
        record: &T,
    ) -> RepoResult<()> {
        let content = record_content(record)?;
        self.db
            .query("CREATE type::thing($table, $key) CONTENT $content")
            .bind(("table", table))
            .bind(("key", key.to_string()))
            .bind(("content", content))
            .await?
            .check()?;
        Ok(())
    }
}
