//! Price Calculator
//!
//! 整桌 / 按座计价规则：
//!
//! | 条件 | price_type | final_price | discount |
//! |------|-----------|-------------|----------|
//! | 区域禁止单座预订，或选满整桌 | table | table_price | n × seat_price - table_price |
//! | 其他 | seat | n × seat_price | 0 |
//!
//! 整桌折扣不做下限截断：`table_price` 高于单座总价时折扣为负，
//! 并记录 warn 日志，便于发现区域价格配置错误。

use rust_decimal::prelude::*;
use shared::models::{PriceBreakdown, PriceLine, PriceType, SelectedSeat, ZonePolicy};

use super::{
    PricingError, PricingResult, TableCatalog, TableGroup, ZonePolicies, group_by_table,
};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

#[inline]
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Price the seats selected on one table
///
/// `policy` 为 `None` 或区域已停用时返回 `InvalidSelection`。
pub fn price_group(group: &TableGroup, policy: Option<&ZonePolicy>) -> PricingResult<PriceLine> {
    let policy = policy.ok_or_else(|| {
        PricingError::InvalidSelection(format!(
            "Zone {} has no pricing policy (table {})",
            group.zone, group.table_name
        ))
    })?;
    if !policy.is_active {
        return Err(PricingError::InvalidSelection(format!(
            "Zone {} is not open for booking",
            policy.id
        )));
    }

    let n = group.seat_count();
    if n > group.capacity {
        return Err(PricingError::InternalInvariant(format!(
            "Table {} has {} seats selected but capacity is {}",
            group.table_name, n, group.capacity
        )));
    }

    let is_full_table = n == group.capacity;
    let original = Decimal::from(n)
        .checked_mul(policy.seat_price)
        .map(round_money)
        .ok_or_else(|| {
            PricingError::InternalInvariant(format!(
                "Seat total overflows on table {} ({} x {})",
                group.table_name, n, policy.seat_price
            ))
        })?;

    let (price_type, final_price) = if !policy.allow_individual_seat_booking || is_full_table {
        (PriceType::Table, round_money(policy.table_price))
    } else {
        (PriceType::Seat, original)
    };
    let discount = original.checked_sub(final_price).ok_or_else(|| {
        PricingError::InternalInvariant(format!(
            "Discount overflows on table {}",
            group.table_name
        ))
    })?;

    if discount < Decimal::ZERO {
        tracing::warn!(
            zone = %policy.id,
            table = %group.table_name,
            seat_count = n,
            table_price = %policy.table_price,
            seat_total = %original,
            "Whole-table price exceeds per-seat total, discount is negative"
        );
    }

    Ok(PriceLine {
        table_id: group.table_id,
        table_name: group.table_name.clone(),
        zone: group.zone.clone(),
        seat_count: n,
        is_full_table,
        original_price: original,
        final_price,
        discount,
        price_type,
    })
}

/// Full price breakdown for a selection
///
/// 纯函数：相同输入总是得到相同输出。
pub fn calculate_detailed_price(
    selected: &[SelectedSeat],
    catalog: &TableCatalog,
    policies: &ZonePolicies,
) -> PricingResult<PriceBreakdown> {
    let groups = group_by_table(selected, catalog)?;

    let lines = groups
        .iter()
        .map(|group| price_group(group, policies.get(&group.zone)))
        .collect::<PricingResult<Vec<_>>>()?;

    let total_original_price = checked_total(lines.iter().map(|l| l.original_price))?;
    let total_final_price = checked_total(lines.iter().map(|l| l.final_price))?;
    let total_discount = total_original_price
        .checked_sub(total_final_price)
        .ok_or_else(|| PricingError::InternalInvariant("Total discount overflows".to_string()))?;

    Ok(PriceBreakdown {
        lines,
        total_original_price,
        total_final_price,
        total_discount,
    })
}

/// `Decimal` 的 `Sum` 溢出时会 panic，这里逐项 checked_add
fn checked_total(mut values: impl Iterator<Item = Decimal>) -> PricingResult<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| PricingError::InternalInvariant("Price total overflows".to_string()))
    })
}

/// Total amount payable for a selection
pub fn calculate_total_price(
    selected: &[SelectedSeat],
    catalog: &TableCatalog,
    policies: &ZonePolicies,
) -> PricingResult<Decimal> {
    Ok(calculate_detailed_price(selected, catalog, policies)?.total_final_price)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shared::models::{DiningTable, TABLE_CAPACITY};

    fn table(id: i64, zone: &str, name: &str) -> DiningTable {
        DiningTable {
            id,
            zone: zone.to_string(),
            name: name.to_string(),
            capacity: TABLE_CAPACITY,
            is_active: true,
            x: 0,
            y: 0,
            seats: Vec::new(),
        }
    }

    fn policy(id: &str, individual: bool, seat: i64, table: i64) -> ZonePolicy {
        ZonePolicy {
            id: id.to_string(),
            name: format!("Zone {id}"),
            description: None,
            is_active: true,
            allow_individual_seat_booking: individual,
            seat_price: Decimal::from(seat),
            table_price: Decimal::from(table),
        }
    }

    /// A1, A2 in zone A; B1 in zone B; C1 in zone C
    pub(crate) fn catalog() -> TableCatalog {
        [
            table(1, "A", "A1"),
            table(2, "A", "A2"),
            table(3, "B", "B1"),
            table(4, "C", "C1"),
        ]
        .into_iter()
        .map(|t| (t.id, t))
        .collect()
    }

    pub(crate) fn policies() -> ZonePolicies {
        [
            policy("A", true, 150, 1200),
            policy("B", true, 180, 1500),
            policy("C", false, 200, 1800),
        ]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect()
    }

    fn seats(table_id: i64, numbers: impl IntoIterator<Item = u32>) -> Vec<SelectedSeat> {
        numbers
            .into_iter()
            .map(|n| SelectedSeat::new(table_id, n))
            .collect()
    }

    #[test]
    fn test_scenario_a_partial_seats() {
        let breakdown =
            calculate_detailed_price(&seats(1, [1, 2, 3]), &catalog(), &policies()).unwrap();

        let line = &breakdown.lines[0];
        assert_eq!(line.price_type, PriceType::Seat);
        assert_eq!(line.original_price, Decimal::from(450));
        assert_eq!(line.final_price, Decimal::from(450));
        assert_eq!(line.discount, Decimal::ZERO);
        assert!(!line.is_full_table);
    }

    #[test]
    fn test_scenario_b_full_table() {
        let breakdown =
            calculate_detailed_price(&seats(1, 1..=9), &catalog(), &policies()).unwrap();

        let line = &breakdown.lines[0];
        assert_eq!(line.price_type, PriceType::Table);
        assert_eq!(line.original_price, Decimal::from(1350));
        assert_eq!(line.final_price, Decimal::from(1200));
        assert_eq!(line.discount, Decimal::from(150));
        assert!(line.is_full_table);
    }

    #[test]
    fn test_scenario_c_forced_table_negative_discount() {
        let breakdown = calculate_detailed_price(&seats(4, [1]), &catalog(), &policies()).unwrap();

        let line = &breakdown.lines[0];
        assert_eq!(line.price_type, PriceType::Table);
        assert_eq!(line.final_price, Decimal::from(1800));
        assert_eq!(line.original_price, Decimal::from(200));
        assert_eq!(line.discount, Decimal::from(-1600));
        assert!(!line.is_full_table);
    }

    #[test]
    fn test_full_table_independent_of_seat_order() {
        let forward = calculate_detailed_price(&seats(2, 1..=9), &catalog(), &policies()).unwrap();
        let reversed =
            calculate_detailed_price(&seats(2, (1..=9).rev()), &catalog(), &policies()).unwrap();
        assert_eq!(forward.total_final_price, reversed.total_final_price);
        assert_eq!(reversed.lines[0].price_type, PriceType::Table);
    }

    #[test]
    fn test_partial_pricing_for_every_k() {
        for k in 1..TABLE_CAPACITY {
            let line = &calculate_detailed_price(&seats(3, 1..=k), &catalog(), &policies())
                .unwrap()
                .lines[0];
            assert_eq!(line.price_type, PriceType::Seat, "k = {k}");
            assert_eq!(line.final_price, Decimal::from(180 * k as i64));
            assert_eq!(line.discount, Decimal::ZERO);
        }
    }

    #[test]
    fn test_forced_zone_always_table_price() {
        for k in 1..=TABLE_CAPACITY {
            let line = &calculate_detailed_price(&seats(4, 1..=k), &catalog(), &policies())
                .unwrap()
                .lines[0];
            assert_eq!(line.price_type, PriceType::Table);
            assert_eq!(line.final_price, Decimal::from(1800));
        }
    }

    #[test]
    fn test_sum_law_across_tables() {
        let mut selected = seats(1, 1..=9);
        selected.extend(seats(3, [4, 5]));
        selected.extend(seats(4, [9]));

        let b = calculate_detailed_price(&selected, &catalog(), &policies()).unwrap();
        assert_eq!(b.lines.len(), 3);

        let final_sum: Decimal = b.lines.iter().map(|l| l.final_price).sum();
        assert_eq!(b.total_final_price, final_sum);
        assert_eq!(
            b.total_discount,
            b.total_original_price - b.total_final_price
        );
        // 1200 + 360 + 1800
        assert_eq!(b.total_final_price, Decimal::from(3360));
        assert_eq!(
            calculate_total_price(&selected, &catalog(), &policies()).unwrap(),
            Decimal::from(3360)
        );
    }

    #[test]
    fn test_repeatable_output() {
        let mut selected = seats(2, [7, 1, 4]);
        selected.extend(seats(4, [2]));
        let first = calculate_detailed_price(&selected, &catalog(), &policies()).unwrap();
        let second = calculate_detailed_price(&selected, &catalog(), &policies()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_policy_is_invalid_selection() {
        let mut catalog = catalog();
        catalog.insert(9, table(9, "VIP", "VIP1"));
        let err = calculate_detailed_price(&seats(9, [1]), &catalog, &policies()).unwrap_err();
        assert!(matches!(err, PricingError::InvalidSelection(_)));
    }

    #[test]
    fn test_inactive_zone_is_invalid_selection() {
        let mut policies = policies();
        policies.get_mut("B").unwrap().is_active = false;
        let err = calculate_detailed_price(&seats(3, [1]), &catalog(), &policies).unwrap_err();
        assert!(matches!(err, PricingError::InvalidSelection(_)));
    }

    #[test]
    fn test_oversized_group_is_invariant_error() {
        let group = TableGroup {
            table_id: 1,
            table_name: "A1".to_string(),
            zone: "A".to_string(),
            capacity: TABLE_CAPACITY,
            seats: (1..=10).collect(),
        };
        let err = price_group(&group, policies().get("A")).unwrap_err();
        assert!(matches!(err, PricingError::InternalInvariant(_)));
    }

    #[test]
    fn test_empty_selection_prices_zero() {
        let b = calculate_detailed_price(&[], &catalog(), &policies()).unwrap();
        assert!(b.lines.is_empty());
        assert_eq!(b.total_final_price, Decimal::ZERO);
    }

    #[test]
    fn test_huge_seat_price_is_error_not_panic() {
        let mut policies = policies();
        policies.get_mut("A").unwrap().seat_price = Decimal::MAX / Decimal::from(2);
        let err =
            calculate_detailed_price(&seats(1, [1, 2, 3]), &catalog(), &policies).unwrap_err();
        assert!(matches!(err, PricingError::InternalInvariant(_)));
    }

    #[test]
    fn test_total_overflow_across_tables_is_error() {
        let mut policies = policies();
        // 单桌不溢出，两桌相加溢出
        policies.get_mut("A").unwrap().table_price = Decimal::MAX;
        let mut selected = seats(1, 1..=9);
        selected.extend(seats(2, 1..=9));
        let err = calculate_detailed_price(&selected, &catalog(), &policies).unwrap_err();
        assert!(matches!(err, PricingError::InternalInvariant(_)));
    }

    #[test]
    fn test_fractional_prices_round_to_cents() {
        let mut policies = policies();
        policies.get_mut("A").unwrap().seat_price = Decimal::new(33_335, 3); // 33.335
        let line = &calculate_detailed_price(&seats(1, [1]), &catalog(), &policies)
            .unwrap()
            .lines[0];
        assert_eq!(line.final_price, Decimal::new(3334, 2));
    }
}
