//! Booking record and pending payment index persistence

use redb::{ReadableTable, WriteTransaction};
use shared::models::{BookingRecord, DiningTable, ZonePolicy};

use super::{
    BOOKINGS_TABLE, PENDING_PAYMENTS_TABLE, Storage, StorageResult, decode, encode, read_all_str,
};

fn sort_newest_first(records: &mut [BookingRecord]) {
    records.sort_by(|a, b| {
        b.booking_date
            .cmp(&a.booking_date)
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl Storage {
    // ========== Bookings ==========

    /// Get a booking by id
    pub fn get_booking(&self, booking_id: &str) -> StorageResult<Option<BookingRecord>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(BOOKINGS_TABLE)?;
        let record = table
            .get(booking_id)?
            .map(|guard| decode(guard.value()))
            .transpose()?;
        Ok(record)
    }

    /// Get a booking by id (within transaction)
    pub fn get_booking_txn(
        &self,
        txn: &WriteTransaction,
        booking_id: &str,
    ) -> StorageResult<Option<BookingRecord>> {
        let table = txn.open_table(BOOKINGS_TABLE)?;
        let record = table
            .get(booking_id)?
            .map(|guard| decode(guard.value()))
            .transpose()?;
        Ok(record)
    }

    /// List all bookings, newest first
    pub fn list_bookings(&self) -> StorageResult<Vec<BookingRecord>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(BOOKINGS_TABLE)?;
        let mut records: Vec<BookingRecord> = read_all_str(&table)?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Zones, tables and bookings from a single read transaction
    pub fn read_dashboard(
        &self,
    ) -> StorageResult<(Vec<ZonePolicy>, Vec<DiningTable>, Vec<BookingRecord>)> {
        let read_txn = self.begin_read()?;
        let (tables, zones) = Self::read_catalog_in(&read_txn)?;
        let bookings = read_txn.open_table(BOOKINGS_TABLE)?;
        let mut records: Vec<BookingRecord> = read_all_str(&bookings)?;
        sort_newest_first(&mut records);
        Ok((zones, tables, records))
    }

    /// Insert or replace a booking
    pub fn put_booking(&self, txn: &WriteTransaction, record: &BookingRecord) -> StorageResult<()> {
        let mut table = txn.open_table(BOOKINGS_TABLE)?;
        let value = encode(record)?;
        table.insert(record.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Remove a booking, returns whether it existed
    pub fn remove_booking(&self, txn: &WriteTransaction, booking_id: &str) -> StorageResult<bool> {
        let mut table = txn.open_table(BOOKINGS_TABLE)?;
        let removed = table.remove(booking_id)?.is_some();
        Ok(removed)
    }

    // ========== Pending Payment Index ==========

    /// Track a booking awaiting payment
    pub fn insert_pending(
        &self,
        txn: &WriteTransaction,
        booking_id: &str,
        deadline: i64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PENDING_PAYMENTS_TABLE)?;
        table.insert(booking_id, deadline)?;
        Ok(())
    }

    /// Stop tracking a booking (confirmed / cancelled / expired / deleted)
    pub fn remove_pending(&self, txn: &WriteTransaction, booking_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(PENDING_PAYMENTS_TABLE)?;
        table.remove(booking_id)?;
        Ok(())
    }

    /// Booking ids whose payment deadline is strictly before `now`
    pub fn due_pending(&self, now: i64) -> StorageResult<Vec<String>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(PENDING_PAYMENTS_TABLE)?;
        let mut due = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            if value.value() < now {
                due.push(key.value().to_string());
            }
        }
        Ok(due)
    }

    /// Number of bookings awaiting payment
    pub fn pending_count(&self) -> StorageResult<u64> {
        use redb::ReadableTableMetadata;
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(PENDING_PAYMENTS_TABLE)?;
        Ok(table.len()?)
    }
}
