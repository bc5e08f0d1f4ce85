//! Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/sellers | POST | 下单 |
//! | /api/seller | GET | 全部订单 (客服视图) |
//! | /api/seller/{userId} | GET | 买家订单, 按状态分组 |
//! | /api/orders/{orderId} | GET | 订单详情 |
//! | /api/orders/{orderId}/resolve | PATCH | 客服确认 (pending → resolved) |
//! | /api/orders/{orderId}/confirm | PATCH | 管理员直接完成 |
//! | /api/orders/{orderId}/cancel | PATCH | 管理员直接取消 |

mod handler;

pub use handler::CreateOrderRequest;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/sellers", post(handler::create))
        .route("/api/seller", get(handler::list_all))
        .route("/api/seller/{user_id}", get(handler::list_for_buyer))
        .route("/api/orders/{order_id}", get(handler::get_by_id))
        .route("/api/orders/{order_id}/resolve", patch(handler::resolve))
        .route("/api/orders/{order_id}/confirm", patch(handler::confirm))
        .route("/api/orders/{order_id}/cancel", patch(handler::cancel))
}
