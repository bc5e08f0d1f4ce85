//! 订单状态机
//!
//! Order and shipper-assignment statuses plus the transition graph that the
//! fulfillment coordinator enforces.

mod status;

pub use status::{AssignmentStatus, OrderStatus};
