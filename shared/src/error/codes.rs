//! Unified error codes for the booking server
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Booking errors
//! - 7xxx: Table / zone errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 4xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 4001,
    /// One or more seats were claimed by another booking first
    SeatConflict = 4002,
    /// Booking is not in a state that allows the operation
    BookingInvalidState = 4003,
    /// Payment deadline has passed
    PaymentDeadlineExpired = 4004,
    /// Seat selection references unknown / inactive tables or seats
    InvalidSeatSelection = 4005,
    /// Seat selection is empty
    EmptySeatSelection = 4006,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Zone not found
    ZoneNotFound = 7101,
    /// Zone code already exists
    ZoneAlreadyExists = 7103,
    /// Zone still has tables
    ZoneHasTables = 7104,
    /// Table still has held seats
    SeatOccupied = 7105,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Data consistency invariant violated
    InvariantViolation = 9003,
    /// Configuration error
    ConfigError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Success",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",

            // Booking
            Self::BookingNotFound => "Booking not found",
            Self::SeatConflict => "Seats were booked by someone else, please reselect",
            Self::BookingInvalidState => "Booking status does not allow this operation",
            Self::PaymentDeadlineExpired => "Payment deadline has expired",
            Self::InvalidSeatSelection => "Invalid seat selection",
            Self::EmptySeatSelection => "No seats selected",

            // Table
            Self::TableNotFound => "Table not found",
            Self::ZoneNotFound => "Zone not found",
            Self::ZoneAlreadyExists => "Zone already exists",
            Self::ZoneHasTables => "Zone still has tables",
            Self::SeatOccupied => "Table has booked seats",

            // System
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::InvariantViolation => "Data consistency error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            // Booking
            4001 => Ok(ErrorCode::BookingNotFound),
            4002 => Ok(ErrorCode::SeatConflict),
            4003 => Ok(ErrorCode::BookingInvalidState),
            4004 => Ok(ErrorCode::PaymentDeadlineExpired),
            4005 => Ok(ErrorCode::InvalidSeatSelection),
            4006 => Ok(ErrorCode::EmptySeatSelection),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7101 => Ok(ErrorCode::ZoneNotFound),
            7103 => Ok(ErrorCode::ZoneAlreadyExists),
            7104 => Ok(ErrorCode::ZoneHasTables),
            7105 => Ok(ErrorCode::SeatOccupied),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::InvariantViolation),
            9004 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
