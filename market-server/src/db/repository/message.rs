//! Chat Message Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::ChatMessage;
use shared::Address;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "message";

#[derive(Clone)]
pub struct MessageRepository {
    base: BaseRepository,
}

impl MessageRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        self.base.create_record(TABLE, &message.id, message).await
    }

    /// Messages between one buyer and one admin, oldest first
    pub async fn find_between(&self, buyer_id: &str, admin: &Address) -> RepoResult<Vec<ChatMessage>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM message \
                 WHERE buyer_id = $buyer AND (sender = $admin OR receiver = $admin) \
                 ORDER BY timestamp ASC",
            )
            .bind(("buyer", buyer_id.to_string()))
            .bind(("admin", admin.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Every buyer↔admin message of one buyer, oldest first
    pub async fn find_by_buyer(&self, buyer_id: &str) -> RepoResult<Vec<ChatMessage>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM message WHERE buyer_id = $buyer ORDER BY timestamp ASC",
            )
            .bind(("buyer", buyer_id.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Messages sent or received by an admin, newest first
    pub async fn find_involving(&self, admin: &Address) -> RepoResult<Vec<ChatMessage>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM message \
                 WHERE sender = $admin OR receiver = $admin ORDER BY timestamp DESC",
            )
            .bind(("admin", admin.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Messages received by an admin, newest first
    pub async fn find_received(&self, admin: &Address) -> RepoResult<Vec<ChatMessage>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM message WHERE receiver = $admin ORDER BY timestamp DESC",
            )
            .bind(("admin", admin.to_string()))
            .await?;
        Ok(result.take(0)?)
    }
}
