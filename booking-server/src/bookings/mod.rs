//! Booking lifecycle
//!
//! ```text
//! create_booking ──▶ pending_payment ──confirm_payment──▶ confirmed
//!                         │
//!                         ├──cancel_booking──▶ cancelled        (释放座位)
//!                         └──expire_booking──▶ payment_timeout  (释放座位)
//! ```
//!
//! 所有状态变更都是 "仅当当前状态为 X 时才转换" 的单事务操作，
//! 状态与占座在同一个 redb 写事务中提交。

mod error;
mod event;
mod manager;
pub mod stats;
pub mod sweeper;

pub use error::{BookingError, BookingResult};
pub use event::{BookingEvent, BookingEventKind, CancelledBy};
pub use manager::BookingManager;
