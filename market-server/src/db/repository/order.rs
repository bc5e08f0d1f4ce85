//! Order Repository

use super::{BaseRepository, RepoResult, record_content};
use crate::db::models::Order;
use shared::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a new order and bump each product's `sold` counter in one
    /// transaction. Fails if the order code is already taken (unique index).
    pub async fn insert(&self, order: &Order) -> RepoResult<()> {
        let content = record_content(order)?;
        let items: Vec<serde_json::Value> = order
            .items
            .iter()
            .map(|i| serde_json::json!({ "product_id": i.product_id, "quantity": i.quantity }))
            .collect();

        self.base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                CREATE type::thing('orders', $id) CONTENT $order;
                FOR $item IN $items {
                    UPDATE product SET sold = (sold OR 0) + $item.quantity
                        WHERE id = type::thing('product', $item.product_id);
                };
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("id", order.id.clone()))
            .bind(("order", content))
            .bind(("items", items))
            .await?
            .check()?;
        Ok(())
    }

    /// Whether an order with this code exists
    pub async fn code_exists(&self, code: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE code FROM orders WHERE code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let codes: Vec<String> = result.take(0)?;
        Ok(!codes.is_empty())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('orders', $id)")
            .bind(("id", id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Every taken code starting with `prefix`
    pub async fn codes_with_prefix(&self, prefix: &str) -> RepoResult<Vec<String>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE code FROM orders WHERE string::starts_with(code, $prefix)")
            .bind(("prefix", prefix.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// All orders of one buyer, newest first
    pub async fn find_by_buyer(&self, buyer_id: &str) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM orders WHERE buyer_id = $buyer ORDER BY created_at DESC",
            )
            .bind(("buyer", buyer_id.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Every order, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM orders ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders in any of `statuses`, oldest first
    pub async fn find_by_status(&self, statuses: &[OrderStatus]) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM orders WHERE status IN $statuses ORDER BY created_at ASC",
            )
            .bind(("statuses", statuses.to_vec()))
            .await?;
        Ok(result.take(0)?)
    }
}
