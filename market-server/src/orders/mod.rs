//! 订单模块
//!
//! - [`OrderStore`] - 订单创建、订单号分配、查询
//! - [`FulfillmentCoordinator`] - 履约状态机 (shipper / admin transitions)
//! - [`CodeAllocator`] - `ORD` + 3 位数字的订单号候选

pub mod code;
pub mod fulfillment;
pub mod store;

pub use code::CodeAllocator;
pub use fulfillment::{FulfillmentCoordinator, Transition, TransitionOutcome, transition_notice_id};
pub use store::OrderStore;
