//! Zone Policy Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Zone pricing policy (区域：A / B / C / VIP 等)
///
/// `table_price` 通常小于 `TABLE_CAPACITY × seat_price` (整桌优惠)，
/// 但计价引擎不依赖这个假设。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePolicy {
    /// 区域编码 ("A", "B", "VIP")
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 停用的区域不对顾客开放
    pub is_active: bool,
    /// false = 只能整桌预订
    pub allow_individual_seat_booking: bool,
    /// 单座价格
    pub seat_price: Decimal,
    /// 整桌价格
    pub table_price: Decimal,
}

/// Create zone payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneCreate {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub allow_individual_seat_booking: Option<bool>,
    pub seat_price: Decimal,
    pub table_price: Decimal,
}

/// Update zone payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub allow_individual_seat_booking: Option<bool>,
    pub seat_price: Option<Decimal>,
    pub table_price: Option<Decimal>,
}
