//! Dining Table Model

use serde::{Deserialize, Serialize};

/// 每张桌台固定 9 个座位
pub const TABLE_CAPACITY: u32 = 9;

/// Dining table entity (桌台)
///
/// `seats` 是实时视图：存储层只保存桌台本身，
/// 座位的 `is_booked` 在读取时由占座表合成。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    /// 所属区域编码
    pub zone: String,
    /// 显示名称 (区域 + 序号，如 "A1")
    pub name: String,
    pub capacity: u32,
    pub is_active: bool,
    /// 布局坐标，仅供布局编辑器使用
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub seats: Vec<Seat>,
}

impl DiningTable {
    /// Whether the seat is held by a live booking in this view
    pub fn is_seat_booked(&self, seat_number: u32) -> bool {
        self.seats
            .iter()
            .any(|s| s.seat_number == seat_number && s.is_booked)
    }

    /// Whether `seat_number` is a valid slot on this table
    pub fn has_seat(&self, seat_number: u32) -> bool {
        (1..=self.capacity).contains(&seat_number)
    }
}

/// Seat slot on a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub seat_number: u32,
    pub is_booked: bool,
}

/// Create dining table payload
///
/// 名称和 ID 由服务端分配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub zone: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub name: Option<String>,
    pub zone: Option<String>,
    pub is_active: Option<bool>,
}

/// Reposition payload (layout only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TablePosition {
    pub x: i32,
    pub y: i32,
}
