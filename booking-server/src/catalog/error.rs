use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::StorageError;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Zone {0} not found")]
    ZoneNotFound(String),

    #[error("Zone {0} already exists")]
    ZoneAlreadyExists(String),

    #[error("Zone {zone} still has {count} table(s)")]
    ZoneHasTables { zone: String, count: usize },

    #[error("Table {0} not found")]
    TableNotFound(i64),

    #[error("Table {table_id} still has {held} held seat(s)")]
    SeatOccupied { table_id: i64, held: usize },

    #[error("{0}")]
    Validation(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::Storage(e) => e.into(),
            CatalogError::ZoneNotFound(id) => {
                AppError::with_message(ErrorCode::ZoneNotFound, message).with_detail("zone_id", id)
            }
            CatalogError::ZoneAlreadyExists(id) => {
                AppError::with_message(ErrorCode::ZoneAlreadyExists, message)
                    .with_detail("zone_id", id)
            }
            CatalogError::ZoneHasTables { zone, count } => {
                AppError::with_message(ErrorCode::ZoneHasTables, message)
                    .with_detail("zone_id", zone)
                    .with_detail("table_count", count)
            }
            CatalogError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message)
                    .with_detail("table_id", id)
            }
            CatalogError::SeatOccupied { table_id, held } => {
                AppError::with_message(ErrorCode::SeatOccupied, message)
                    .with_detail("table_id", table_id)
                    .with_detail("held_seats", held)
            }
            CatalogError::Validation(msg) => AppError::validation(msg),
        }
    }
}

impl From<AppError> for CatalogError {
    fn from(err: AppError) -> Self {
        CatalogError::Validation(err.message)
    }
}
