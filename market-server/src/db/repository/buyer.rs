//! Buyer Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::BuyerRow;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "buyer";

#[derive(Clone)]
pub struct BuyerRepository {
    base: BaseRepository,
}

impl BuyerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<BuyerRow>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('buyer', $id)")
            .bind(("id", id.to_string()))
            .await?;
        let rows: Vec<BuyerRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Batch lookup, used to attach buyer identity to conversation lists
    pub async fn find_many(&self, ids: &[String]) -> RepoResult<Vec<BuyerRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM buyer WHERE record::id(id) IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?;
        Ok(result.take(0)?)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<BuyerRow>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM buyer WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_lowercase()))
            .await?;
        let rows: Vec<BuyerRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(&self, buyer: &BuyerRow) -> RepoResult<()> {
        if self.find_by_email(&buyer.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Buyer '{}' already exists",
                buyer.email
            )));
        }
        self.base.create_record(TABLE, &buyer.id, buyer).await
    }
}
