//! Notice Model

use crate::order::OrderStatus;
use serde::{Deserialize, Serialize};

/// One-way notification addressed to a buyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub buyer_id: String,
    pub order_id: String,
    /// Order code at the time the notice was written
    #[serde(default)]
    pub order_code: String,
    pub title: String,
    pub message: String,
    /// Order status snapshot
    #[serde(rename = "type")]
    pub kind: OrderStatus,
    pub is_read: bool,
    pub created_at: i64,
}

/// Create notice payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeCreate {
    pub buyer_id: String,
    pub order_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: OrderStatus,
}
