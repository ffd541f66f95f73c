//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - 日志、输入校验、时钟

pub mod clock;
pub mod logger;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
