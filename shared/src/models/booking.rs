//! Booking Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Booking status (预订状态)
///
/// ```text
/// pending_payment ──confirm──▶ confirmed
///        │
///        ├──cancel──▶ cancelled
///        └──expire──▶ payment_timeout
/// ```
///
/// `pending` 是旧数据遗留的状态：非终态，只能由管理员取消。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    PendingPayment,
    Confirmed,
    Cancelled,
    PaymentTimeout,
}

impl BookingStatus {
    /// 终态：状态不可再变更
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::Cancelled | Self::PaymentTimeout
        )
    }

    /// Whether this booking still holds its seats
    pub fn holds_seats(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::PendingPayment | Self::Confirmed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PendingPayment => "pending_payment",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::PaymentTimeout => "payment_timeout",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "pending_payment" => Ok(Self::PendingPayment),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "payment_timeout" => Ok(Self::PaymentTimeout),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// A seat chosen by the customer (re-validated at commit time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedSeat {
    pub table_id: i64,
    pub seat_number: u32,
}

impl SelectedSeat {
    pub fn new(table_id: i64, seat_number: u32) -> Self {
        Self {
            table_id,
            seat_number,
        }
    }
}

/// Seat held by a booking
///
/// `zone` 在下单时冗余保存，之后桌台换区不影响历史记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSeat {
    pub table_id: i64,
    pub seat_number: u32,
    pub zone: String,
}

/// Booking record (预订记录)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub seats: Vec<BookingSeat>,
    /// 下单时计算一次，之后不再重算
    pub total_price: Decimal,
    pub status: BookingStatus,
    /// 创建时间 (Unix millis)
    pub booking_date: i64,
    #[serde(default)]
    pub payment_proof: Option<String>,
    /// 仅 `pending_payment` 状态下存在 (Unix millis)
    #[serde(default)]
    pub payment_deadline: Option<i64>,
    #[serde(default)]
    pub updated_at: i64,
}

impl BookingRecord {
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }
}

/// Customer info submitted with a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    #[serde(flatten)]
    pub customer: CustomerInfo,
    pub seats: Vec<SelectedSeat>,
}

/// Update booking payload (details only, never status / seats / total)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Confirm payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirm {
    /// 付款凭证引用 (上传后的文件名或 URL)
    pub payment_proof: String,
}

/// Booking list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    /// 匹配姓名 / 电话 / 预订号 (不区分大小写)
    pub search: Option<String>,
}

impl BookingFilter {
    pub fn matches(&self, record: &BookingRecord) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.customer_name.to_lowercase().contains(&term)
                    || record.phone.to_lowercase().contains(&term)
                    || record.id.to_lowercase().contains(&term)
            }
        }
    }
}
