//! Database Module
//!
//! Embedded SurrealDB: RocksDB on disk, or the in-memory engine for tests.
//! The schema in `schema.surql` is applied on every start (all statements are
//! `IF NOT EXISTS`).

pub mod models;
pub mod repository;
pub mod seed;

use crate::core::Config;
use shared::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const SCHEMA: &str = include_str!("schema.surql");

/// Database service - owns the SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) a RocksDB-backed database at `path`
    pub async fn open(path: impl AsRef<Path>, ns: &str, database: &str) -> Result<Self, AppError> {
        let path = path.as_ref();
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %path.display(), "Database opened (RocksDB)");
        Self::prepare(db, ns, database).await
    }

    /// Start an in-memory database
    pub async fn memory(ns: &str, database: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to start in-memory database: {e}")))?;
        tracing::info!("Database opened (in-memory)");
        Self::prepare(db, ns, database).await
    }

    /// Open the database the config points at
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        if config.db_in_memory {
            Self::memory(&config.db_namespace, &config.db_database).await
        } else {
            std::fs::create_dir_all(&config.work_dir).map_err(|e| {
                AppError::database(format!("Failed to create work dir {}: {e}", config.work_dir))
            })?;
            Self::open(
                config.database_path(),
                &config.db_namespace,
                &config.db_database,
            )
            .await
        }
    }

    async fn prepare(db: Surreal<Db>, ns: &str, database: &str) -> Result<Self, AppError> {
        db.use_ns(ns)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select ns/db: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|r| r.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }

    /// Cheap round trip used by the health check
    pub async fn ping(&self) -> bool {
        self.db.query("RETURN true").await.is_ok()
    }
}
