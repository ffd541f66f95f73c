//! Zone policy persistence

use redb::{ReadableTable, WriteTransaction};
use shared::models::ZonePolicy;

use super::{Storage, StorageResult, ZONES_TABLE, decode, encode, read_all_str};

impl Storage {
    /// Get a zone by id
    pub fn get_zone(&self, zone_id: &str) -> StorageResult<Option<ZonePolicy>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ZONES_TABLE)?;
        let zone = table
            .get(zone_id)?
            .map(|guard| decode(guard.value()))
            .transpose()?;
        Ok(zone)
    }

    /// Get a zone by id (within transaction)
    pub fn get_zone_txn(
        &self,
        txn: &WriteTransaction,
        zone_id: &str,
    ) -> StorageResult<Option<ZonePolicy>> {
        let table = txn.open_table(ZONES_TABLE)?;
        let zone = table
            .get(zone_id)?
            .map(|guard| decode(guard.value()))
            .transpose()?;
        Ok(zone)
    }

    /// List all zones ordered by id
    pub fn list_zones(&self) -> StorageResult<Vec<ZonePolicy>> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ZONES_TABLE)?;
        read_all_str(&table)
    }

    /// List all zones (within transaction)
    pub fn list_zones_txn(&self, txn: &WriteTransaction) -> StorageResult<Vec<ZonePolicy>> {
        let table = txn.open_table(ZONES_TABLE)?;
        read_all_str(&table)
    }

    /// Insert or replace a zone
    pub fn put_zone(&self, txn: &WriteTransaction, zone: &ZonePolicy) -> StorageResult<()> {
        let mut table = txn.open_table(ZONES_TABLE)?;
        let value = encode(zone)?;
        table.insert(zone.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Remove a zone, returns whether it existed
    pub fn remove_zone(&self, txn: &WriteTransaction, zone_id: &str) -> StorageResult<bool> {
        let mut table = txn.open_table(ZONES_TABLE)?;
        let removed = table.remove(zone_id)?.is_some();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn zone(id: &str) -> ZonePolicy {
        ZonePolicy {
            id: id.to_string(),
            name: format!("Zone {id}"),
            description: None,
            is_active: true,
            allow_individual_seat_booking: true,
            seat_price: Decimal::from(150),
            table_price: Decimal::from(1200),
        }
    }

    #[test]
    fn test_zone_crud() {
        let storage = Storage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_zone(&txn, &zone("B")).unwrap();
        storage.put_zone(&txn, &zone("A")).unwrap();
        txn.commit().unwrap();

        let zones = storage.list_zones().unwrap();
        let ids: Vec<_> = zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(storage.get_zone("A").unwrap(), Some(zone("A")));
        assert!(storage.get_zone("Z").unwrap().is_none());

        let txn = storage.begin_write().unwrap();
        assert!(storage.remove_zone(&txn, "A").unwrap());
        assert!(!storage.remove_zone(&txn, "A").unwrap());
        txn.commit().unwrap();

        assert_eq!(storage.list_zones().unwrap().len(), 1);
    }

    #[test]
    fn test_uncommitted_zone_not_visible() {
        let storage = Storage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.put_zone(&txn, &zone("A")).unwrap();
        assert!(storage.get_zone_txn(&txn, "A").unwrap().is_some());
        txn.abort().unwrap();

        assert!(storage.get_zone("A").unwrap().is_none());
    }
}
