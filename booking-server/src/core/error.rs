use axum::response::{IntoResponse, Response};
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::StorageError;

/// 服务器启动/运行期错误
///
/// 请求级错误走 [`AppError`]，这里只覆盖启动、监听和关闭阶段。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("存储初始化失败: {0}")]
    Storage(#[from] StorageError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

impl From<ServerError> for AppError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Config(msg) => AppError::with_message(ErrorCode::ConfigError, msg),
            ServerError::Storage(e) => e.into(),
            ServerError::Io(e) => AppError::internal(e.to_string()),
            ServerError::Internal(e) => {
                // 记录内部错误但不暴露详细信息
                tracing::error!(error = ?e, "Internal server error");
                AppError::internal("An internal error occurred")
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
