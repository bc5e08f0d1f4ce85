//! Shipper API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/shipper | GET | 待取件订单 |
//! | /api/shipper_status/{shipperId} | GET | 配送员任务, 按状态分组 |
//! | /api/shipper_accept | PATCH | 接单 |
//! | /api/shipper_complete | PATCH | 送达 |
//! | /api/shipper_cancel | PATCH | 配送取消 |

mod handler;

pub use handler::ShipperTransitionRequest;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/shipper", get(handler::awaiting_pickup))
        .route("/api/shipper_status/{shipper_id}", get(handler::status))
        .route("/api/shipper_accept", patch(handler::accept))
        .route("/api/shipper_complete", patch(handler::complete))
        .route("/api/shipper_cancel", patch(handler::cancel))
}
