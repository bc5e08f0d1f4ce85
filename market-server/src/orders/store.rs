//! OrderStore - 订单创建与查询
//!
//! Owns the Order aggregate. Creation allocates the human code through an
//! insert that the unique index on `orders.code` either accepts or rejects;
//! a rejected insert is checked against the index and retried with a fresh
//! candidate. When random candidates keep colliding the store reads the
//! taken codes and inserts one of the remaining free ones, so a conflict
//! only surfaces once the whole code space is used.

use super::code::CodeAllocator;
use crate::core::Config;
use crate::db::models::{Order, OrderItem, ShippingInfo};
use crate::db::repository::{BuyerRepository, OrderRepository};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, parse_id, validate_amount,
    validate_required_text,
};
use shared::models::{OrderBuckets, OrderCreate};
use shared::util::{new_record_key, now_millis};
use shared::{AppError, AppResult, ErrorCode, OrderStatus};
use std::collections::HashSet;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderStore {
    orders: OrderRepository,
    buyers: BuyerRepository,
    codes: CodeAllocator,
    max_attempts: u32,
}

impl OrderStore {
    pub fn new(db: Surreal<Db>, config: &Config) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            buyers: BuyerRepository::new(db),
            codes: CodeAllocator::new(config.order_code_prefix.clone()),
            max_attempts: config.order_code_max_attempts.max(1),
        }
    }

    /// Create a `pending` order with a freshly allocated unique code
    pub async fn create_order(&self, input: OrderCreate) -> AppResult<Order> {
        let buyer_id = parse_id(&input.buyer_id, "userId")?;
        validate_items(&input.items)?;
        validate_shipping(&input.shipping)?;
        validate_amount(input.fee, "fee")?;
        validate_amount(input.total_price, "total_price")?;

        if self.buyers.find_by_id(&buyer_id).await?.is_none() {
            return Err(AppError::new(ErrorCode::BuyerNotFound).with_detail("userId", buyer_id));
        }

        let now = now_millis();
        let mut conflicts = 0u32;
        let mut failures = 0u32;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            // random draws first; once they keep colliding, pick from what is left
            let code = if conflicts < self.max_attempts {
                self.codes.candidate()
            } else {
                match self.free_code().await? {
                    Some(code) => code,
                    None => {
                        tracing::warn!(prefix = %self.codes.prefix(), attempt, "Order code space is full");
                        return Err(AppError::new(ErrorCode::OrderCodeExhausted)
                            .with_detail("attempts", attempt)
                            .with_detail("prefix", self.codes.prefix()));
                    }
                }
            };

            let order = Order {
                id: new_record_key(),
                buyer_id: buyer_id.clone(),
                code,
                items: input.items.clone(),
                status: OrderStatus::Pending,
                shipping: input.shipping.clone(),
                fee: input.fee,
                total_price: input.total_price,
                created_at: now,
                updated_at: now,
            };

            let err = match self.orders.insert(&order).await {
                Ok(()) => {
                    tracing::info!(
                        order_id = %order.id,
                        code = %order.code,
                        buyer_id = %order.buyer_id,
                        items = order.items.len(),
                        attempt,
                        "Order created"
                    );
                    return Ok(order);
                }
                Err(e) => e,
            };

            if matches!(self.orders.code_exists(&order.code).await, Ok(true)) {
                conflicts += 1;
                tracing::debug!(code = %order.code, attempt, "Order code taken, retrying");
                continue;
            }

            failures += 1;
            if failures >= self.max_attempts {
                tracing::error!(attempts = attempt, error = %err, "Order creation failed");
                return Err(err.into());
            }
            tracing::warn!(code = %order.code, attempt, error = %err, "Order insert failed, retrying");
            tokio::time::sleep(Duration::from_millis(5 * failures as u64)).await;
        }
    }

    /// A free code picked from the remainder of the space
    async fn free_code(&self) -> AppResult<Option<String>> {
        let taken: HashSet<String> = self
            .orders
            .codes_with_prefix(self.codes.prefix())
            .await?
            .into_iter()
            .collect();
        Ok(self.codes.pick_free(&taken))
    }

    pub async fn get(&self, order_id: &str) -> AppResult<Order> {
        let order_id = parse_id(order_id, "orderId")?;
        self.orders
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("orderId", order_id))
    }

    /// A buyer's orders partitioned into one bucket per status
    pub async fn list_for_buyer(&self, buyer_id: &str) -> AppResult<OrderBuckets> {
        let buyer_id = parse_id(buyer_id, "userId")?;
        let orders = self.orders.find_by_buyer(&buyer_id).await?;
        Ok(orders.into_iter().collect())
    }

    /// Every order, newest first
    pub async fn list_all(&self) -> AppResult<Vec<Order>> {
        Ok(self.orders.find_all().await?)
    }

    /// Orders a shipper may still accept, oldest first
    pub async fn list_awaiting_pickup(&self) -> AppResult<Vec<Order>> {
        let statuses: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(OrderStatus::awaiting_pickup)
            .collect();
        Ok(self.orders.find_by_status(&statuses).await?)
    }
}

fn validate_items(items: &[OrderItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for (i, item) in items.iter().enumerate() {
        validate_required_text(&item.product_id, "productId", MAX_NAME_LEN)
            .map_err(|e| e.with_detail("index", i))?;
        if item.quantity == 0 {
            return Err(AppError::validation("quantity must be at least 1")
                .with_detail("field", "quantity")
                .with_detail("index", i));
        }
        validate_amount(item.price, "price").map_err(|e| e.with_detail("index", i))?;
    }
    Ok(())
}

fn validate_shipping(shipping: &ShippingInfo) -> AppResult<()> {
    validate_required_text(&shipping.full_name, "name", MAX_NAME_LEN)?;
    validate_required_text(&shipping.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&shipping.address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(&shipping.payment_method, "paymentMethod", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}
