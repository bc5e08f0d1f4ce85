//! Order Model

use crate::order::OrderStatus;
use serde::{Deserialize, Serialize};

/// Line item, frozen at order creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(alias = "productId")]
    pub product_id: String,
    pub quantity: u32,
    /// Unit price at the time of purchase
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub buyer_id: String,
    /// Human-readable code, e.g. `ORD042`
    pub code: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub shipping: ShippingInfo,
    pub fee: f64,
    pub total_price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub buyer_id: String,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingInfo,
    pub fee: f64,
    pub total_price: f64,
}

/// A buyer's orders partitioned by status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBuckets {
    pub pending: Vec<Order>,
    pub resolved: Vec<Order>,
    pub processing: Vec<Order>,
    pub delivered: Vec<Order>,
    pub cancelled: Vec<Order>,
}

impl OrderBuckets {
    pub fn bucket_mut(&mut self, status: OrderStatus) -> &mut Vec<Order> {
        match status {
            OrderStatus::Pending => &mut self.pending,
            OrderStatus::Resolved => &mut self.resolved,
            OrderStatus::Processing => &mut self.processing,
            OrderStatus::Delivered => &mut self.delivered,
            OrderStatus::Cancelled => &mut self.cancelled,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
            + self.resolved.len()
            + self.processing.len()
            + self.delivered.len()
            + self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Order> for OrderBuckets {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        let mut buckets = Self::default();
        for order in iter {
            buckets.bucket_mut(order.status).push(order);
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.into(),
            buyer_id: "b".into(),
            code: "ORD001".into(),
            items: vec![],
            status,
            shipping: ShippingInfo {
                full_name: "A".into(),
                phone: "1".into(),
                address: "x".into(),
                payment_method: "cod".into(),
            },
            fee: 0.0,
            total_price: 0.0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_buckets_partition() {
        let orders: Vec<Order> = OrderStatus::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| order(&i.to_string(), *s))
            .chain(std::iter::once(order("extra", OrderStatus::Pending)))
            .collect();

        let buckets: OrderBuckets = orders.into_iter().collect();
        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets.pending.len(), 2);
        assert_eq!(buckets.resolved.len(), 1);
        assert_eq!(buckets.cancelled.len(), 1);
    }
}
