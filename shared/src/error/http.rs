//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::BookingNotFound
            | Self::TableNotFound
            | Self::ZoneNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::SeatConflict
            | Self::BookingInvalidState
            | Self::ZoneAlreadyExists
            | Self::ZoneHasTables
            | Self::SeatOccupied => StatusCode::CONFLICT,

            // 410 Gone (payment window closed)
            Self::PaymentDeadlineExpired => StatusCode::GONE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::InvariantViolation
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
