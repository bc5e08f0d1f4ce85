//! Shipper Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::ShipperRow;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "shipper";

#[derive(Clone)]
pub struct ShipperRepository {
    base: BaseRepository,
}

impl ShipperRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ShipperRow>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('shipper', $id)")
            .bind(("id", id.to_string()))
            .await?;
        let rows: Vec<ShipperRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<ShipperRow>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM shipper WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_lowercase()))
            .await?;
        let rows: Vec<ShipperRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Create a shipper account
    pub async fn create(&self, shipper: &ShipperRow) -> RepoResult<()> {
        if self.find_by_email(&shipper.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Shipper '{}' already exists",
                shipper.email
            )));
        }
        self.base.create_record(TABLE, &shipper.id, shipper).await
    }
}
