//! Seat grouping by table

use shared::models::SelectedSeat;
use std::collections::HashSet;

use super::{PricingError, PricingResult, TableCatalog};

/// Seats selected on one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGroup {
    pub table_id: i64,
    pub table_name: String,
    pub zone: String,
    pub capacity: u32,
    /// 按选择顺序
    pub seats: Vec<u32>,
}

impl TableGroup {
    pub fn seat_count(&self) -> u32 {
        self.seats.len() as u32
    }
}

/// Group selected seats by table, in first-seen table order
///
/// - 重复的 (table_id, seat_number) 直接拒绝
/// - 桌台不存在或已停用 → `InvalidSelection`
/// - 座位号不在 1..=capacity → `InvalidSelection`
///
/// 不检查座位是否已被占用：下单时以写事务内的原子检查为准，
/// 预览另用 [`ensure_unbooked`]。
pub fn group_by_table(
    selected: &[SelectedSeat],
    catalog: &TableCatalog,
) -> PricingResult<Vec<TableGroup>> {
    let mut seen: HashSet<(i64, u32)> = HashSet::with_capacity(selected.len());
    let mut groups: Vec<TableGroup> = Vec::new();

    for seat in selected {
        if !seen.insert((seat.table_id, seat.seat_number)) {
            return Err(PricingError::InvalidSelection(format!(
                "Seat {} on table {} selected more than once",
                seat.seat_number, seat.table_id
            )));
        }

        let table = catalog.get(&seat.table_id).ok_or_else(|| {
            PricingError::InvalidSelection(format!("Table {} does not exist", seat.table_id))
        })?;
        if !table.is_active {
            return Err(PricingError::InvalidSelection(format!(
                "Table {} is not active",
                table.name
            )));
        }
        if !table.has_seat(seat.seat_number) {
            return Err(PricingError::InvalidSelection(format!(
                "Seat {} does not exist on table {}",
                seat.seat_number, table.name
            )));
        }

        match groups.iter_mut().find(|g| g.table_id == seat.table_id) {
            Some(group) => group.seats.push(seat.seat_number),
            None => groups.push(TableGroup {
                table_id: table.id,
                table_name: table.name.clone(),
                zone: table.zone.clone(),
                capacity: table.capacity,
                seats: vec![seat.seat_number],
            }),
        }
    }

    Ok(groups)
}

/// Reject selections that touch a seat already booked in `catalog`
///
/// 只用于价格预览；调用前应先通过 [`group_by_table`] 校验。
pub fn ensure_unbooked(selected: &[SelectedSeat], catalog: &TableCatalog) -> PricingResult<()> {
    let booked: Vec<String> = selected
        .iter()
        .filter_map(|seat| {
            let table = catalog.get(&seat.table_id)?;
            table
                .is_seat_booked(seat.seat_number)
                .then(|| format!("{}-{}", table.name, seat.seat_number))
        })
        .collect();

    if booked.is_empty() {
        Ok(())
    } else {
        Err(PricingError::InvalidSelection(format!(
            "Seats already booked: {}",
            booked.join(", ")
        )))
    }
}
