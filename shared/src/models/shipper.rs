//! Shipper Model

use crate::order::AssignmentStatus;
use serde::{Deserialize, Serialize};

/// One order picked up by a shipper
///
/// The order reference is serialized as `sellers`, the field name the
/// shipper app reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipperAssignment {
    #[serde(rename = "sellers")]
    pub order_id: String,
    pub status: AssignmentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Shipper response (without password)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipperProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub is_active: bool,
    pub assigned_orders: Vec<ShipperAssignment>,
}

/// A shipper's assignments partitioned by assignment status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentBuckets {
    pub processing: Vec<ShipperAssignment>,
    pub delivered: Vec<ShipperAssignment>,
    pub cancelled: Vec<ShipperAssignment>,
}

impl FromIterator<ShipperAssignment> for AssignmentBuckets {
    fn from_iter<I: IntoIterator<Item = ShipperAssignment>>(iter: I) -> Self {
        let mut buckets = Self::default();
        for a in iter {
            match a.status {
                AssignmentStatus::Processing => buckets.processing.push(a),
                AssignmentStatus::Delivered => buckets.delivered.push(a),
                AssignmentStatus::Cancelled => buckets.cancelled.push(a),
            }
        }
        buckets
    }
}
