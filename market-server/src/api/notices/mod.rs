//! Notice API 模块

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/notice/{user_id}", get(handler::list))
        .route("/notice/read/{id}", patch(handler::mark_read))
        .route("/api/notices", post(handler::create))
}
