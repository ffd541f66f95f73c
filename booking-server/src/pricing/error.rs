use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Pricing errors
///
/// 计价错误总是同步返回给调用方，不做零价兜底。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// 选座引用了不存在 / 停用的桌台或座位，或重复选座
    #[error("Invalid seat selection: {0}")]
    InvalidSelection(String),

    /// 数据一致性问题 (如分组座位数超过桌台容量)，属于调用方的 bug
    #[error("Pricing invariant violated: {0}")]
    InternalInvariant(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidSelection(msg) => {
                AppError::with_message(ErrorCode::InvalidSeatSelection, msg)
            }
            PricingError::InternalInvariant(msg) => {
                tracing::error!(error = %msg, "Pricing invariant violated");
                AppError::with_message(ErrorCode::InvariantViolation, msg)
            }
        }
    }
}
