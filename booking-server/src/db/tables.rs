//! Dining table and seat hold persistence

use redb::{ReadTransaction, ReadableTable, WriteTransaction};
use shared::models::{DiningTable, Seat, ZonePolicy};
use std::collections::HashSet;

use super::{
    DINING_TABLES_TABLE, SEAT_HOLDS_TABLE, Storage, StorageResult, ZONES_TABLE, decode, encode,
    read_all_str,
};

/// Fill `seats` from the held seat set
fn with_seats(mut table: DiningTable, held: &HashSet<(i64, u32)>) -> DiningTable {
    table.seats = (1..=table.capacity)
        .map(|n| Seat {
            seat_number: n,
            is_booked: held.contains(&(table.id, n)),
        })
        .collect();
    table
}

fn read_held<R>(holds: &R) -> StorageResult<HashSet<(i64, u32)>>
where
    R: ReadableTable<(i64, u32), &'static str>,
{
    let mut held = HashSet::new();
    for result in holds.iter()? {
        let (key, _value) = result?;
        held.insert(key.value());
    }
    Ok(held)
}

fn read_tables<R>(tables: &R, held: &HashSet<(i64, u32)>) -> StorageResult<Vec<DiningTable>>
where
    R: ReadableTable<i64, &'static [u8]>,
{
    let mut out = Vec::new();
    for result in tables.iter()? {
        let (_key, value) = result?;
        let table: DiningTable = decode(value.value())?;
        out.push(with_seats(table, held));
    }
    Ok(out)
}

impl Storage {
    // ========== Dining Tables ==========

    /// Get a table with live seat status
    pub fn get_table(&self, table_id: i64) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.begin_read()?;
        let tables = read_txn.open_table(DINING_TABLES_TABLE)?;
        let holds = read_txn.open_table(SEAT_HOLDS_TABLE)?;
        let table: Option<DiningTable> = tables
            .get(table_id)?
            .map(|guard| decode(guard.value()))
            .transpose()?;
        let Some(table) = table else {
            return Ok(None);
        };
        let held = read_held(&holds)?;
        Ok(Some(with_seats(table, &held)))
    }

    /// Get a table with live seat status (within transaction)
    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
    ) -> StorageResult<Option<DiningTable>> {
        let tables = txn.open_table(DINING_TABLES_TABLE)?;
        let table: Option<DiningTable> = tables
            .get(table_id)?
            .map(|guard| decode(guard.value()))
            .transpose()?;
        let Some(table) = table else {
            return Ok(None);
        };
        let holds = txn.open_table(SEAT_HOLDS_TABLE)?;
        let held = read_held(&holds)?;
        Ok(Some(with_seats(table, &held)))
    }

    /// List all tables ordered by id, seats reflect current holds
    pub fn list_tables(&self) -> StorageResult<Vec<DiningTable>> {
        // 同一个读事务内读取桌台和占座，保证快照一致
        let read_txn = self.begin_read()?;
        let tables = read_txn.open_table(DINING_TABLES_TABLE)?;
        let holds = read_txn.open_table(SEAT_HOLDS_TABLE)?;
        let held = read_held(&holds)?;
        read_tables(&tables, &held)
    }

    /// List all tables (within transaction)
    pub fn list_tables_txn(&self, txn: &WriteTransaction) -> StorageResult<Vec<DiningTable>> {
        let held = {
            let holds = txn.open_table(SEAT_HOLDS_TABLE)?;
            read_held(&holds)?
        };
        let tables = txn.open_table(DINING_TABLES_TABLE)?;
        read_tables(&tables, &held)
    }

    /// Tables and zone policies from a single read transaction
    pub fn read_catalog(&self) -> StorageResult<(Vec<DiningTable>, Vec<ZonePolicy>)> {
        let read_txn = self.begin_read()?;
        Self::read_catalog_in(&read_txn)
    }

    pub(crate) fn read_catalog_in(
        read_txn: &ReadTransaction,
    ) -> StorageResult<(Vec<DiningTable>, Vec<ZonePolicy>)> {
        let tables = read_txn.open_table(DINING_TABLES_TABLE)?;
        let holds = read_txn.open_table(SEAT_HOLDS_TABLE)?;
        let zones = read_txn.open_table(ZONES_TABLE)?;
        let held = read_held(&holds)?;
        Ok((read_tables(&tables, &held)?, read_all_str(&zones)?))
    }

    /// Tables and zone policies as seen by a write transaction
    pub fn read_catalog_txn(
        &self,
        txn: &WriteTransaction,
    ) -> StorageResult<(Vec<DiningTable>, Vec<ZonePolicy>)> {
        let tables = self.list_tables_txn(txn)?;
        let zones = self.list_zones_txn(txn)?;
        Ok((tables, zones))
    }

    /// Insert or replace a table (seat status is never persisted here)
    pub fn put_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<()> {
        let mut stored = table.clone();
        stored.seats.clear();
        let value = encode(&stored)?;
        let mut tables = txn.open_table(DINING_TABLES_TABLE)?;
        tables.insert(table.id, value.as_slice())?;
        Ok(())
    }

    /// Remove a table, returns whether it existed
    pub fn remove_table(&self, txn: &WriteTransaction, table_id: i64) -> StorageResult<bool> {
        let mut tables = txn.open_table(DINING_TABLES_TABLE)?;
        let removed = tables.remove(table_id)?.is_some();
        Ok(removed)
    }

    // ========== Seat Holds ==========

    /// Current holder of a seat (within transaction)
    pub fn get_hold_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        seat_number: u32,
    ) -> StorageResult<Option<String>> {
        let holds = txn.open_table(SEAT_HOLDS_TABLE)?;
        let holder = holds
            .get((table_id, seat_number))?
            .map(|guard| guard.value().to_string());
        Ok(holder)
    }

    /// Record that `booking_id` holds a seat
    pub fn insert_hold(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        seat_number: u32,
        booking_id: &str,
    ) -> StorageResult<()> {
        let mut holds = txn.open_table(SEAT_HOLDS_TABLE)?;
        holds.insert((table_id, seat_number), booking_id)?;
        Ok(())
    }

    /// Release a seat only if it is held by `booking_id`
    ///
    /// 返回是否实际释放
    pub fn release_hold(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        seat_number: u32,
        booking_id: &str,
    ) -> StorageResult<bool> {
        let mut holds = txn.open_table(SEAT_HOLDS_TABLE)?;
        let owned = holds
            .get((table_id, seat_number))?
            .is_some_and(|guard| guard.value() == booking_id);
        if owned {
            holds.remove((table_id, seat_number))?;
        }
        Ok(owned)
    }

    /// Number of held seats on a table (within transaction)
    pub fn held_seat_count_txn(&self, txn: &WriteTransaction, table_id: i64) -> StorageResult<usize> {
        let holds = txn.open_table(SEAT_HOLDS_TABLE)?;
        let mut count = 0;
        for result in holds.range((table_id, 0u32)..=(table_id, u32::MAX))? {
            result?;
            count += 1;
        }
        Ok(count)
    }

    /// All held seats
    pub fn held_seats(&self) -> StorageResult<HashSet<(i64, u32)>> {
        let read_txn = self.begin_read()?;
        let holds = read_txn.open_table(SEAT_HOLDS_TABLE)?;
        read_held(&holds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TABLE_CAPACITY;

    fn table(id: i64, zone: &str) -> DiningTable {
        DiningTable {
            id,
            zone: zone.to_string(),
            name: format!("{zone}{id}"),
            capacity: TABLE_CAPACITY,
            is_active: true,
            x: 0,
            y: 0,
            seats: Vec::new(),
        }
    }

    #[test]
    fn test_seats_are_synthesized_from_holds() {
        let storage = Storage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_table(&txn, &table(1, "A")).unwrap();
        storage.put_table(&txn, &table(2, "A")).unwrap();
        storage.insert_hold(&txn, 1, 3, "bk-1").unwrap();
        storage.insert_hold(&txn, 1, 4, "bk-1").unwrap();
        txn.commit().unwrap();

        let t1 = storage.get_table(1).unwrap().unwrap();
        assert_eq!(t1.seats.len(), 9);
        assert!(t1.seats[2].is_booked);
        assert!(t1.seats[3].is_booked);
        assert!(t1.is_seat_booked(4));
        assert_eq!(t1.seats.iter().filter(|s| !s.is_booked).count(), 7);

        let t2 = storage.get_table(2).unwrap().unwrap();
        assert!(t2.seats.iter().all(|s| !s.is_booked));

        let all = storage.list_tables().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, 1);
    }

    #[test]
    fn test_put_table_does_not_persist_seat_status() {
        let storage = Storage::open_in_memory().unwrap();
        let mut t = table(1, "A");
        t.seats = vec![Seat {
            seat_number: 1,
            is_booked: true,
        }];

        let txn = storage.begin_write().unwrap();
        storage.put_table(&txn, &t).unwrap();
        txn.commit().unwrap();

        let loaded = storage.get_table(1).unwrap().unwrap();
        assert!(loaded.seats.iter().all(|s| !s.is_booked));
    }

    #[test]
    fn test_release_hold_only_by_owner() {
        let storage = Storage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.insert_hold(&txn, 5, 3, "bk-1").unwrap();
        assert!(!storage.release_hold(&txn, 5, 3, "bk-2").unwrap());
        assert_eq!(
            storage.get_hold_txn(&txn, 5, 3).unwrap().as_deref(),
            Some("bk-1")
        );
        assert!(storage.release_hold(&txn, 5, 3, "bk-1").unwrap());
        assert!(storage.get_hold_txn(&txn, 5, 3).unwrap().is_none());
        txn.commit().unwrap();
    }

    #[test]
    fn test_held_seat_count_is_per_table() {
        let storage = Storage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.insert_hold(&txn, 1, 1, "bk-1").unwrap();
        storage.insert_hold(&txn, 1, 9, "bk-1").unwrap();
        storage.insert_hold(&txn, 2, 1, "bk-2").unwrap();
        assert_eq!(storage.held_seat_count_txn(&txn, 1).unwrap(), 2);
        assert_eq!(storage.held_seat_count_txn(&txn, 2).unwrap(), 1);
        assert_eq!(storage.held_seat_count_txn(&txn, 3).unwrap(), 0);
        txn.commit().unwrap();

        assert_eq!(storage.held_seats().unwrap().len(), 3);
    }
}
