//! Admin Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::AdminRow;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "admin";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All admins, oldest account first (the first one is the default chat partner)
    pub async fn find_all(&self) -> RepoResult<Vec<AdminRow>> {
        let rows: Vec<AdminRow> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM admin ORDER BY created_at ASC, id ASC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<AdminRow>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('admin', $id)")
            .bind(("id", id.to_string()))
            .await?;
        let rows: Vec<AdminRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<AdminRow>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM admin WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_lowercase()))
            .await?;
        let rows: Vec<AdminRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(&self, admin: &AdminRow) -> RepoResult<()> {
        if self.find_by_email(&admin.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Admin '{}' already exists",
                admin.email
            )));
        }
        self.base.create_record(TABLE, &admin.id, admin).await
    }
}
