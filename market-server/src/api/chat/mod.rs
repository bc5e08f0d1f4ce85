//! Chat history API 模块
//!
//! Read-only views over persisted messages; live traffic goes through
//! `GET /socket`.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::realtime::ws;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/socket", get(ws::handle_socket))
        .route("/api/conversations/{admin_id}", get(handler::conversations))
        .route("/api/messages/{user_id}", get(handler::messages))
        .route("/api/recent-messages/{admin_id}", get(handler::recent_messages))
}
