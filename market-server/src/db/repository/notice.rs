//! Notice Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Notice;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "notice";

#[derive(Clone)]
pub struct NoticeRepository {
    base: BaseRepository,
}

impl NoticeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append a notice under its own id
    pub async fn create(&self, notice: &Notice) -> RepoResult<()> {
        self.base.create_record(TABLE, &notice.id, notice).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Notice>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('notice', $id)")
            .bind(("id", id.to_string()))
            .await?;
        let notices: Vec<Notice> = result.take(0)?;
        Ok(notices.into_iter().next())
    }

    /// Which of `ids` already exist
    pub async fn existing_ids(&self, ids: &[String]) -> RepoResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE record::id(id) FROM notice WHERE record::id(id) IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Set `is_read = true`. Returns the updated notice; idempotent.
    pub async fn mark_read(&self, id: &str) -> RepoResult<Notice> {
        let mut notice = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Notice {} not found", id)))?;
        if notice.is_read {
            return Ok(notice);
        }
        self.base
            .db()
            .query("UPDATE notice SET is_read = true WHERE id = type::thing('notice', $id) RETURN NONE")
            .bind(("id", id.to_string()))
            .await?
            .check()?;
        notice.is_read = true;
        Ok(notice)
    }

    /// Notices for one buyer, newest first
    pub async fn find_by_buyer(&self, buyer_id: &str) -> RepoResult<Vec<Notice>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM notice WHERE buyer_id = $buyer ORDER BY created_at DESC, id DESC",
            )
            .bind(("buyer", buyer_id.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Notices attached to one order, oldest first
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<Notice>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM notice WHERE order_id = $order ORDER BY created_at ASC",
            )
            .bind(("order", order_id.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Remove a notice (maintenance / tests)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE type::thing('notice', $id)")
            .bind(("id", id.to_string()))
            .await?
            .check()?;
        Ok(())
    }
}
