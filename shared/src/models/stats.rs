//! Dashboard statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dashboard summary (管理后台概览)
///
/// `seats_by_zone` 以区域编码为键，包含所有区域 (含新增区域)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_zones: usize,
    pub active_zones: usize,
    pub total_tables: usize,
    pub confirmed_bookings: usize,
    pub pending_bookings: usize,
    /// 已确认预订占用的座位数
    pub confirmed_seats: usize,
    pub seats_by_zone: BTreeMap<String, usize>,
}
