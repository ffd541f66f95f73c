//! Dashboard statistics
//!
//! 区域统计是动态映射 (zone id → 座位数)，新增区域自动出现，计数为 0。

use shared::models::{BookingRecord, BookingStatus, DashboardSummary, DiningTable, ZonePolicy};
use std::collections::BTreeMap;

use crate::db::{Storage, StorageResult};

/// Build the summary from already-loaded data
pub fn summarize(
    zones: &[ZonePolicy],
    tables: &[DiningTable],
    bookings: &[BookingRecord],
) -> DashboardSummary {
    let mut seats_by_zone: BTreeMap<String, usize> =
        zones.iter().map(|z| (z.id.clone(), 0)).collect();

    let mut confirmed_bookings = 0;
    let mut pending_bookings = 0;
    let mut confirmed_seats = 0;

    for booking in bookings {
        match booking.status {
            BookingStatus::Confirmed => {
                confirmed_bookings += 1;
                confirmed_seats += booking.seat_count();
                for seat in &booking.seats {
                    // 已删除的区域仍按下单时的区域编码计数
                    *seats_by_zone.entry(seat.zone.clone()).or_default() += 1;
                }
            }
            BookingStatus::Pending | BookingStatus::PendingPayment => pending_bookings += 1,
            BookingStatus::Cancelled | BookingStatus::PaymentTimeout => {}
        }
    }

    DashboardSummary {
        total_zones: zones.len(),
        active_zones: zones.iter().filter(|z| z.is_active).count(),
        total_tables: tables.len(),
        confirmed_bookings,
        pending_bookings,
        confirmed_seats,
        seats_by_zone,
    }
}

/// 区域、桌台、预订在同一个读事务内读取，统计结果是一致快照
pub fn dashboard_summary(storage: &Storage) -> StorageResult<DashboardSummary> {
    let (zones, tables, bookings) = storage.read_dashboard()?;
    Ok(summarize(&zones, &tables, &bookings))
}
