//! Deterministic demo data
//!
//! 三个区域 (A / B / C)，每区 3 张桌台，不含任何预订。
//! 只在区域表为空时写入，重复调用无副作用。

use rust_decimal::Decimal;
use shared::models::{DiningTable, TABLE_CAPACITY, ZonePolicy};

use crate::db::{Storage, StorageError, StorageResult};

const TABLES_PER_ZONE: i64 = 3;

/// (id, name, description, allow_individual_seat_booking, seat_price, table_price)
const DEMO_ZONES: &[(&str, &str, &str, bool, i64, i64)] = &[
    ("A", "Zone A", "Front row, individual seats allowed", true, 150, 1200),
    ("B", "Zone B", "Middle section, individual seats allowed", true, 180, 1500),
    ("C", "Zone C", "Private tables, whole-table booking only", false, 200, 1800),
];

pub fn demo_zones() -> Vec<ZonePolicy> {
    DEMO_ZONES
        .iter()
        .map(|&(id, name, description, individual, seat, table)| ZonePolicy {
            id: id.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            is_active: true,
            allow_individual_seat_booking: individual,
            seat_price: Decimal::from(seat),
            table_price: Decimal::from(table),
        })
        .collect()
}

pub fn demo_tables() -> Vec<DiningTable> {
    let mut tables = Vec::new();
    let mut next_id = 1;
    for (row, zone) in DEMO_ZONES.iter().map(|z| z.0).enumerate() {
        for n in 1..=TABLES_PER_ZONE {
            tables.push(DiningTable {
                id: next_id,
                zone: zone.to_string(),
                name: format!("{zone}{n}"),
                capacity: TABLE_CAPACITY,
                is_active: true,
                x: (n - 1) as i32 * 2,
                y: row as i32 * 2,
                seats: Vec::new(),
            });
            next_id += 1;
        }
    }
    tables
}

/// Write the demo catalog if the store has no zones yet
///
/// 返回是否写入了数据
pub fn seed_if_empty(storage: &Storage) -> StorageResult<bool> {
    let txn = storage.begin_write()?;
    if !storage.list_zones_txn(&txn)?.is_empty() {
        return Ok(false);
    }

    for zone in demo_zones() {
        storage.put_zone(&txn, &zone)?;
    }
    let tables = demo_tables();
    for table in &tables {
        storage.put_table(&txn, table)?;
    }
    if let Some(max_id) = tables.iter().map(|t| t.id).max() {
        storage.bump_table_id(&txn, max_id)?;
    }
    txn.commit().map_err(StorageError::from)?;

    tracing::info!(
        zones = DEMO_ZONES.len(),
        tables = tables.len(),
        "Demo catalog seeded"
    );
    Ok(true)
}
