//! Catalog administration
//!
//! 每个写操作是一个 redb 写事务。桌台的座位状态只读，
//! 由预订流程通过占座表维护。

use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TABLE_CAPACITY, TablePosition, ZoneCreate,
    ZonePolicy, ZoneUpdate,
};

use super::{CatalogError, CatalogResult, CatalogSnapshot};
use crate::db::{Storage, StorageError};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_non_negative,
    validate_optional_text, validate_required_text,
};

#[derive(Debug, Clone)]
pub struct CatalogService {
    storage: Storage,
}

impl CatalogService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Consistent snapshot of tables (with live seats) and zone policies
    pub fn snapshot(&self) -> CatalogResult<CatalogSnapshot> {
        let (tables, zones) = self.storage.read_catalog()?;
        Ok(CatalogSnapshot::from_parts(tables, zones))
    }

    // ========== Zones ==========

    pub fn list_zones(&self) -> CatalogResult<Vec<ZonePolicy>> {
        Ok(self.storage.list_zones()?)
    }

    pub fn get_zone(&self, zone_id: &str) -> CatalogResult<ZonePolicy> {
        self.storage
            .get_zone(zone_id)?
            .ok_or_else(|| CatalogError::ZoneNotFound(zone_id.to_string()))
    }

    pub fn create_zone(&self, payload: ZoneCreate) -> CatalogResult<ZonePolicy> {
        let id = payload.id.trim().to_string();
        validate_required_text(&id, "id", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        validate_non_negative(payload.seat_price, "seat_price")?;
        validate_non_negative(payload.table_price, "table_price")?;

        let zone = ZonePolicy {
            id,
            name: payload.name.trim().to_string(),
            description: payload.description,
            is_active: payload.is_active.unwrap_or(true),
            allow_individual_seat_booking: payload.allow_individual_seat_booking.unwrap_or(true),
            seat_price: payload.seat_price,
            table_price: payload.table_price,
        };

        let txn = self.storage.begin_write()?;
        if self.storage.get_zone_txn(&txn, &zone.id)?.is_some() {
            return Err(CatalogError::ZoneAlreadyExists(zone.id));
        }
        self.storage.put_zone(&txn, &zone)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(zone_id = %zone.id, "Zone created");
        Ok(zone)
    }

    pub fn update_zone(&self, zone_id: &str, payload: ZoneUpdate) -> CatalogResult<ZonePolicy> {
        if let Some(name) = &payload.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        if let Some(price) = payload.seat_price {
            validate_non_negative(price, "seat_price")?;
        }
        if let Some(price) = payload.table_price {
            validate_non_negative(price, "table_price")?;
        }

        let txn = self.storage.begin_write()?;
        let mut zone = self
            .storage
            .get_zone_txn(&txn, zone_id)?
            .ok_or_else(|| CatalogError::ZoneNotFound(zone_id.to_string()))?;

        if let Some(name) = payload.name {
            zone.name = name.trim().to_string();
        }
        if let Some(description) = payload.description {
            zone.description = Some(description);
        }
        if let Some(active) = payload.is_active {
            zone.is_active = active;
        }
        if let Some(allow) = payload.allow_individual_seat_booking {
            zone.allow_individual_seat_booking = allow;
        }
        if let Some(price) = payload.seat_price {
            zone.seat_price = price;
        }
        if let Some(price) = payload.table_price {
            zone.table_price = price;
        }

        self.storage.put_zone(&txn, &zone)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(zone_id = %zone.id, is_active = zone.is_active, "Zone updated");
        Ok(zone)
    }

    /// Delete a zone; refused while any table still belongs to it
    pub fn delete_zone(&self, zone_id: &str) -> CatalogResult<()> {
        let txn = self.storage.begin_write()?;
        if self.storage.get_zone_txn(&txn, zone_id)?.is_none() {
            return Err(CatalogError::ZoneNotFound(zone_id.to_string()));
        }
        let count = self
            .storage
            .list_tables_txn(&txn)?
            .iter()
            .filter(|t| t.zone == zone_id)
            .count();
        if count > 0 {
            return Err(CatalogError::ZoneHasTables {
                zone: zone_id.to_string(),
                count,
            });
        }
        self.storage.remove_zone(&txn, zone_id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(zone_id = %zone_id, "Zone deleted");
        Ok(())
    }

    // ========== Tables ==========

    pub fn list_tables(&self) -> CatalogResult<Vec<DiningTable>> {
        Ok(self.storage.list_tables()?)
    }

    pub fn list_tables_in_zone(&self, zone_id: &str) -> CatalogResult<Vec<DiningTable>> {
        if self.storage.get_zone(zone_id)?.is_none() {
            return Err(CatalogError::ZoneNotFound(zone_id.to_string()));
        }
        Ok(self
            .storage
            .list_tables()?
            .into_iter()
            .filter(|t| t.zone == zone_id)
            .collect())
    }

    pub fn get_table(&self, table_id: i64) -> CatalogResult<DiningTable> {
        self.storage
            .get_table(table_id)?
            .ok_or(CatalogError::TableNotFound(table_id))
    }

    /// Create a table at the end of a zone
    ///
    /// ID 取全局递增计数，名称为 `{zone}{n}`，n = 该区域现有桌台数 + 1
    pub fn create_table(&self, payload: DiningTableCreate) -> CatalogResult<DiningTable> {
        let txn = self.storage.begin_write()?;
        if self.storage.get_zone_txn(&txn, &payload.zone)?.is_none() {
            return Err(CatalogError::ZoneNotFound(payload.zone));
        }

        let in_zone = self
            .storage
            .list_tables_txn(&txn)?
            .iter()
            .filter(|t| t.zone == payload.zone)
            .count();
        let id = self.storage.next_table_id(&txn)?;
        let table = DiningTable {
            id,
            name: format!("{}{}", payload.zone, in_zone + 1),
            zone: payload.zone,
            capacity: TABLE_CAPACITY,
            is_active: true,
            x: payload.x,
            y: payload.y,
            seats: Vec::new(),
        };
        self.storage.put_table(&txn, &table)?;
        let created = self
            .storage
            .get_table_txn(&txn, id)?
            .ok_or(CatalogError::TableNotFound(id))?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_id = id, name = %created.name, zone = %created.zone, "Table created");
        Ok(created)
    }

    pub fn update_table(
        &self,
        table_id: i64,
        payload: DiningTableUpdate,
    ) -> CatalogResult<DiningTable> {
        if let Some(name) = &payload.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }

        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, table_id)?
            .ok_or(CatalogError::TableNotFound(table_id))?;

        if let Some(zone) = payload.zone {
            if self.storage.get_zone_txn(&txn, &zone)?.is_none() {
                return Err(CatalogError::ZoneNotFound(zone));
            }
            table.zone = zone;
        }
        if let Some(name) = payload.name {
            table.name = name.trim().to_string();
        }
        if let Some(active) = payload.is_active {
            table.is_active = active;
        }

        self.storage.put_table(&txn, &table)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_id, "Table updated");
        Ok(table)
    }

    /// Move a table on the layout grid; pricing and availability are untouched
    pub fn reposition_table(
        &self,
        table_id: i64,
        position: TablePosition,
    ) -> CatalogResult<DiningTable> {
        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, table_id)?
            .ok_or(CatalogError::TableNotFound(table_id))?;
        table.x = position.x;
        table.y = position.y;
        self.storage.put_table(&txn, &table)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::debug!(table_id, x = position.x, y = position.y, "Table repositioned");
        Ok(table)
    }

    pub fn toggle_table_active(&self, table_id: i64) -> CatalogResult<DiningTable> {
        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, table_id)?
            .ok_or(CatalogError::TableNotFound(table_id))?;
        table.is_active = !table.is_active;
        self.storage.put_table(&txn, &table)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_id, is_active = table.is_active, "Table active flag toggled");
        Ok(table)
    }

    /// Delete a table; refused while any of its seats is held
    pub fn delete_table(&self, table_id: i64) -> CatalogResult<()> {
        let txn = self.storage.begin_write()?;
        if self.storage.get_table_txn(&txn, table_id)?.is_none() {
            return Err(CatalogError::TableNotFound(table_id));
        }
        let held = self.storage.held_seat_count_txn(&txn, table_id)?;
        if held > 0 {
            return Err(CatalogError::SeatOccupied { table_id, held });
        }
        self.storage.remove_table(&txn, table_id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_id, "Table deleted");
        Ok(())
    }

    pub(crate) fn storage(&self) -> &Storage {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn service() -> CatalogService {
        CatalogService::new(Storage::open_in_memory().unwrap())
    }

    fn zone_payload(id: &str) -> ZoneCreate {
        ZoneCreate {
            id: id.to_string(),
            name: format!("Zone {id}"),
            description: None,
            is_active: None,
            allow_individual_seat_booking: None,
            seat_price: Decimal::from(150),
            table_price: Decimal::from(1200),
        }
    }

    fn table_payload(zone: &str) -> DiningTableCreate {
        DiningTableCreate {
            zone: zone.to_string(),
            x: 0,
            y: 0,
        }
    }

    #[test]
    fn test_create_zone_defaults_and_duplicate() {
        let svc = service();
        let zone = svc.create_zone(zone_payload("A")).unwrap();
        assert!(zone.is_active);
        assert!(zone.allow_individual_seat_booking);

        let err = svc.create_zone(zone_payload("A")).unwrap_err();
        assert!(matches!(err, CatalogError::ZoneAlreadyExists(_)));
    }

    #[test]
    fn test_create_zone_rejects_negative_price() {
        let svc = service();
        let mut payload = zone_payload("A");
        payload.table_price = Decimal::from(-5);
        assert!(matches!(
            svc.create_zone(payload).unwrap_err(),
            CatalogError::Validation(_)
        ));
    }

    #[test]
    fn test_update_zone_partial() {
        let svc = service();
        svc.create_zone(zone_payload("C")).unwrap();

        let zone = svc
            .update_zone(
                "C",
                ZoneUpdate {
                    allow_individual_seat_booking: Some(false),
                    table_price: Some(Decimal::from(1800)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!zone.allow_individual_seat_booking);
        assert_eq!(zone.table_price, Decimal::from(1800));
        assert_eq!(zone.seat_price, Decimal::from(150));

        assert!(matches!(
            svc.update_zone("Z", ZoneUpdate::default()).unwrap_err(),
            CatalogError::ZoneNotFound(_)
        ));
    }

    #[test]
    fn test_table_ids_and_names() {
        let svc = service();
        svc.create_zone(zone_payload("A")).unwrap();
        svc.create_zone(zone_payload("B")).unwrap();

        let a1 = svc.create_table(table_payload("A")).unwrap();
        let b1 = svc.create_table(table_payload("B")).unwrap();
        let a2 = svc.create_table(table_payload("A")).unwrap();

        assert_eq!((a1.id, a1.name.as_str()), (1, "A1"));
        assert_eq!((b1.id, b1.name.as_str()), (2, "B1"));
        assert_eq!((a2.id, a2.name.as_str()), (3, "A2"));
        assert_eq!(a1.seats.len(), TABLE_CAPACITY as usize);
        assert_eq!(svc.list_tables_in_zone("A").unwrap().len(), 2);
    }

    #[test]
    fn test_create_table_unknown_zone() {
        let svc = service();
        assert!(matches!(
            svc.create_table(table_payload("X")).unwrap_err(),
            CatalogError::ZoneNotFound(_)
        ));
    }

    #[test]
    fn test_delete_zone_with_tables_refused() {
        let svc = service();
        svc.create_zone(zone_payload("A")).unwrap();
        let table = svc.create_table(table_payload("A")).unwrap();

        assert!(matches!(
            svc.delete_zone("A").unwrap_err(),
            CatalogError::ZoneHasTables { count: 1, .. }
        ));

        svc.delete_table(table.id).unwrap();
        svc.delete_zone("A").unwrap();
        assert!(svc.list_zones().unwrap().is_empty());
    }

    #[test]
    fn test_delete_table_with_held_seats_refused() {
        let svc = service();
        svc.create_zone(zone_payload("A")).unwrap();
        let table = svc.create_table(table_payload("A")).unwrap();

        let txn = svc.storage().begin_write().unwrap();
        svc.storage().insert_hold(&txn, table.id, 4, "bk-1").unwrap();
        txn.commit().unwrap();

        assert!(matches!(
            svc.delete_table(table.id).unwrap_err(),
            CatalogError::SeatOccupied { held: 1, .. }
        ));
    }

    #[test]
    fn test_reposition_only_moves() {
        let svc = service();
        svc.create_zone(zone_payload("A")).unwrap();
        let table = svc.create_table(table_payload("A")).unwrap();

        let moved = svc
            .reposition_table(table.id, TablePosition { x: 4, y: 7 })
            .unwrap();
        assert_eq!((moved.x, moved.y), (4, 7));
        assert_eq!(moved.zone, table.zone);
        assert_eq!(moved.name, table.name);
        assert_eq!(moved.is_active, table.is_active);
    }

    #[test]
    fn test_toggle_active() {
        let svc = service();
        svc.create_zone(zone_payload("A")).unwrap();
        let table = svc.create_table(table_payload("A")).unwrap();

        assert!(!svc.toggle_table_active(table.id).unwrap().is_active);
        assert!(svc.toggle_table_active(table.id).unwrap().is_active);
        assert!(matches!(
            svc.toggle_table_active(999).unwrap_err(),
            CatalogError::TableNotFound(999)
        ));
    }

    #[test]
    fn test_snapshot_prices_current_policy() {
        let svc = service();
        svc.create_zone(zone_payload("A")).unwrap();
        let table = svc.create_table(table_payload("A")).unwrap();

        let selected: Vec<_> = (1..=2)
            .map(|n| shared::models::SelectedSeat::new(table.id, n))
            .collect();
        let snapshot = svc.snapshot().unwrap();
        assert_eq!(snapshot.total(&selected).unwrap(), Decimal::from(300));
        assert_eq!(snapshot.zone_of(table.id), Some("A"));
    }
}
