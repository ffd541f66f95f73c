//! Price breakdown returned by the pricing engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::booking::SelectedSeat;

/// 计价方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    /// 按座位计价
    Seat,
    /// 整桌计价
    Table,
}

/// Per-table line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    pub table_id: i64,
    pub table_name: String,
    pub zone: String,
    pub seat_count: u32,
    pub is_full_table: bool,
    /// seat_count × seat_price
    pub original_price: Decimal,
    pub final_price: Decimal,
    /// original_price - final_price (可能为负，表示整桌价配置高于单座总价)
    pub discount: Decimal,
    pub price_type: PriceType,
}

/// Full price breakdown for a selection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub lines: Vec<PriceLine>,
    pub total_original_price: Decimal,
    pub total_final_price: Decimal,
    pub total_discount: Decimal,
}

/// Price preview request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePreviewRequest {
    pub seats: Vec<SelectedSeat>,
}
