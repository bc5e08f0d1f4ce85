//! API 路由模块
//!
//! # 结构
//!
//! - [`orders`] - 下单、订单查询、管理员状态迁移
//! - [`shipper`] - 配送员接单 / 送达 / 取消
//! - [`notices`] - 买家通知
//! - [`chat`] - 聊天历史 + `/socket` 实时通道
//! - [`auth`] - 账号密码校验
//! - [`health`] - 健康检查

pub mod extract;

pub mod auth;
pub mod chat;
pub mod health;
pub mod notices;
pub mod orders;
pub mod shipper;

pub use extract::ValidatedJson;

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(orders::router())
        .merge(shipper::router())
        .merge(notices::router())
        .merge(chat::router())
        .merge(auth::router())
        .merge(health::router())
}

/// Fully configured application: routes, middleware and state
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    build_router()
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
