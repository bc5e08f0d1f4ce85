//! Auth API 模块
//!
//! Credential check only: a successful login returns the account profile.

mod handler;

pub use handler::LoginRequest;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/admin/login", post(handler::admin_login))
        .route("/login_shipper", post(handler::shipper_login))
}
