//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`ApiResponse`] - re-exported from `shared::error`
//! - 日志初始化
//! - 输入校验

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
