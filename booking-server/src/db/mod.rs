//! redb-based storage layer for zones, tables and bookings
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `zones` | `zone_id` | `ZonePolicy` | 区域价格策略 |
//! | `dining_tables` | `table_id` | `DiningTable` | 桌台 (不含座位状态) |
//! | `seat_holds` | `(table_id, seat_number)` | `booking_id` | 座位占用 (唯一写入点) |
//! | `bookings` | `booking_id` | `BookingRecord` | 预订记录 |
//! | `pending_payments` | `booking_id` | `deadline` | 待付款索引 (超时扫描) |
//! | `counters` | `name` | `u64` | ID 计数器 |
//!
//! # Atomicity
//!
//! redb 同一时刻只允许一个写事务。占座 (检查 + 写入) 与状态变更 + 释放座位
//! 都在单个写事务里完成，因此天然是原子的 check-and-set。
//!
//! 座位的 `is_booked` 不单独存储，读取时由 `seat_holds` 合成。

mod bookings;
mod tables;
mod zones;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition,
    WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Zone policies: key = zone_id, value = JSON-serialized ZonePolicy
const ZONES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("zones");

/// Dining tables: key = table_id, value = JSON-serialized DiningTable (seats stripped)
const DINING_TABLES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("dining_tables");

/// Seat holds: key = (table_id, seat_number), value = booking_id
const SEAT_HOLDS_TABLE: TableDefinition<(i64, u32), &str> = TableDefinition::new("seat_holds");

/// Bookings: key = booking_id, value = JSON-serialized BookingRecord
const BOOKINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("bookings");

/// Pending payment index: key = booking_id, value = payment deadline (Unix millis)
const PENDING_PAYMENTS_TABLE: TableDefinition<&str, i64> =
    TableDefinition::new("pending_payments");

/// Counters: key = counter name, value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const TABLE_ID_KEY: &str = "table_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Storage error occurred");
        AppError::with_message(ErrorCode::DatabaseError, err.to_string())
    }
}

/// Booking storage backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Open or create the database at the given path
    ///
    /// redb 默认 `Durability::Immediate`，`commit()` 返回即已落盘。
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ZONES_TABLE)?;
            let _ = write_txn.open_table(DINING_TABLES_TABLE)?;
            let _ = write_txn.open_table(SEAT_HOLDS_TABLE)?;
            let _ = write_txn.open_table(BOOKINGS_TABLE)?;
            let _ = write_txn.open_table(PENDING_PAYMENTS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// 阻塞直到其他写事务结束。
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction (consistent snapshot)
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    // ========== Counters ==========

    /// Increment and return the next table id (within transaction)
    pub fn next_table_id(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table
            .get(TABLE_ID_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(TABLE_ID_KEY, next)?;
        Ok(next as i64)
    }

    /// Raise the table id counter so that `id` is never handed out again
    pub fn bump_table_id(&self, txn: &WriteTransaction, id: i64) -> StorageResult<()> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table
            .get(TABLE_ID_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let id = u64::try_from(id).unwrap_or(0);
        if id > current {
            table.insert(TABLE_ID_KEY, id)?;
        }
        Ok(())
    }
}

// ========== JSON helpers ==========

fn encode<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read every JSON value from a string-keyed table
fn read_all_str<T, R>(table: &R) -> StorageResult<Vec<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    let mut out = Vec::new();
    for result in table.iter()? {
        let (_key, value) = result?;
        out.push(decode(value.value())?);
    }
    Ok(out)
}
