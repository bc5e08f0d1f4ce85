//! Shipper row

use super::account::default_active;
use serde::{Deserialize, Serialize};
use shared::models::{ShipperAssignment, ShipperProfile};

/// Shipper document. `assigned_orders` is embedded; `revision` is bumped on
/// every write to it and guards concurrent transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipperRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub assigned_orders: Vec<ShipperAssignment>,
    #[serde(default)]
    pub revision: u64,
}

impl ShipperRow {
    pub fn profile(&self) -> ShipperProfile {
        ShipperProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            is_active: self.is_active,
            assigned_orders: self.assigned_orders.clone(),
        }
    }

    pub fn assignment(&self, order_id: &str) -> Option<&ShipperAssignment> {
        self.assigned_orders.iter().find(|a| a.order_id == order_id)
    }
}
