//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 存活 + 数据库 ping |
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "database": "ok", "connections": 3 }
//! ```

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::DbService;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    database: &'static str,
    /// 当前实时连接数
    connections: usize,
}

async fn health(State(state): State<ServerState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = DbService { db: state.get_db() }.ping().await;
    let (code, status) = if db_ok {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!("Health check: database ping failed");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: if db_ok { "ok" } else { "error" },
            connections: state.hub.rooms().connection_count(),
        }),
    )
}
