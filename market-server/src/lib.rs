//! Market Server - 电商订单履约 + 客服聊天服务
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 下单、订单号分配、履约状态机
//! - **通知** (`notices`): 买家单向通知
//! - **实时通道** (`realtime`): WebSocket 聊天与推送
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): Argon2 账号密码校验
//! - **HTTP API** (`api`): REST 接口
//!
//! # 模块结构
//!
//! ```text
//! market-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── auth/          # 密码校验
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、校验
//! ├── db/            # 数据库层 (schema, repositories, seed)
//! ├── orders/        # OrderStore + FulfillmentCoordinator
//! ├── notices/       # NotificationService
//! └── realtime/      # RealtimeHub + /socket
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notices;
pub mod orders;
pub mod realtime;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use notices::NotificationService;
pub use orders::{FulfillmentCoordinator, OrderStore};
pub use realtime::RealtimeHub;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// Start logging as configured. Returns the file appender guard, if any;
/// hold it until exit.
pub fn setup_environment(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    )
}
