use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{BookingStatus, SelectedSeat};
use thiserror::Error;

use crate::db::StorageError;
use crate::pricing::PricingError;

/// Booking lifecycle errors
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Booking {0} not found")]
    NotFound(String),

    /// 提交时座位已被其他预订占用，整单失败
    #[error("{} seat(s) already taken by another booking", .0.len())]
    SeatConflict(Vec<SelectedSeat>),

    #[error("Cannot {action} booking {booking_id} in status {status}")]
    InvalidState {
        booking_id: String,
        status: BookingStatus,
        action: &'static str,
    },

    #[error("Payment deadline for booking {booking_id} has passed")]
    DeadlineExpired { booking_id: String, deadline: i64 },

    #[error("No seats selected")]
    EmptySelection,

    #[error("{0}")]
    Validation(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl From<AppError> for BookingError {
    fn from(err: AppError) -> Self {
        BookingError::Validation(err.message)
    }
}

fn conflicts_value(seats: &[SelectedSeat]) -> Value {
    Value::Array(
        seats
            .iter()
            .map(|s| json!({ "table_id": s.table_id, "seat_number": s.seat_number }))
            .collect(),
    )
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::Storage(e) => e.into(),
            BookingError::Pricing(e) => e.into(),
            BookingError::NotFound(id) => {
                AppError::with_message(ErrorCode::BookingNotFound, message)
                    .with_detail("booking_id", id)
            }
            BookingError::SeatConflict(seats) => {
                AppError::with_message(ErrorCode::SeatConflict, message)
                    .with_detail("conflicts", conflicts_value(&seats))
            }
            BookingError::InvalidState {
                booking_id, status, ..
            } => AppError::with_message(ErrorCode::BookingInvalidState, message)
                .with_detail("booking_id", booking_id)
                .with_detail("status", status.as_str()),
            BookingError::DeadlineExpired {
                booking_id,
                deadline,
            } => AppError::with_message(ErrorCode::PaymentDeadlineExpired, message)
                .with_detail("booking_id", booking_id)
                .with_detail("payment_deadline", deadline),
            BookingError::EmptySelection => {
                AppError::with_message(ErrorCode::EmptySeatSelection, message)
            }
            BookingError::Validation(msg) => AppError::validation(msg),
        }
    }
}
