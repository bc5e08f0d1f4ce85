use thiserror::Error;

/// 启动与运行期错误 (不经过 HTTP 层)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("端口绑定失败: {0}")]
    Bind(#[source] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

impl From<shared::AppError> for ServerError {
    fn from(err: shared::AppError) -> Self {
        ServerError::Database(err.message)
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
