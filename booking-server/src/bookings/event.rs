use serde::{Deserialize, Serialize};
use shared::models::BookingStatus;

/// Who initiated a cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    /// 顾客只能取消待付款的预订
    Customer,
    /// 管理员可取消任何非终态预订
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingEventKind {
    Created,
    Confirmed,
    Cancelled,
    Expired,
    Updated,
    Deleted,
}

/// Lifecycle notification, published after the transaction commits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEvent {
    pub kind: BookingEventKind,
    pub booking_id: String,
    /// 事件发生后的状态 (Deleted 为删除前状态)
    pub status: BookingStatus,
    pub seat_count: usize,
    pub timestamp: i64,
}
