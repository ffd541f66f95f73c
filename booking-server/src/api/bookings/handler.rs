//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{BookingCreate, BookingFilter, BookingRecord, BookingUpdate, PaymentConfirm};

use crate::bookings::CancelledBy;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/bookings - 预订列表 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<BookingFilter>,
) -> AppResult<Json<Vec<BookingRecord>>> {
    let bookings = state.bookings.list_bookings(&filter)?;
    Ok(Json(bookings))
}

/// GET /api/bookings/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookingRecord>> {
    let booking = state.bookings.get_booking(&id)?;
    Ok(Json(booking))
}

/// POST /api/bookings - 计价并原子占座
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<BookingRecord>> {
    let booking = state
        .bookings
        .create_booking(payload.customer, payload.seats)?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id - 修改顾客信息
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingUpdate>,
) -> AppResult<Json<BookingRecord>> {
    let booking = state.bookings.update_booking_details(&id, payload)?;
    Ok(Json(booking))
}

/// DELETE /api/bookings/:id - 删除预订并释放座位 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookingRecord>> {
    let booking = state.bookings.delete_booking(&id)?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/confirm - 提交付款凭证
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentConfirm>,
) -> AppResult<Json<BookingRecord>> {
    let booking = state
        .bookings
        .confirm_payment(&id, &payload.payment_proof)?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
pub struct CancelQuery {
    #[serde(default = "default_cancelled_by")]
    pub by: CancelledBy,
}

fn default_cancelled_by() -> CancelledBy {
    CancelledBy::Customer
}

/// POST /api/bookings/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<CancelQuery>,
) -> AppResult<Json<BookingRecord>> {
    let booking = state.bookings.cancel_booking(&id, query.by)?;
    Ok(Json(booking))
}

#[derive(Debug, Serialize)]
pub struct SweepResult {
    pub expired: Vec<String>,
    pub count: usize,
}

/// POST /api/bookings/sweep - 立即执行一次超时扫描
pub async fn sweep(State(state): State<ServerState>) -> AppResult<Json<SweepResult>> {
    let expired: Vec<String> = state
        .bookings
        .sweep_expired()?
        .into_iter()
        .map(|r| r.id)
        .collect();
    Ok(Json(SweepResult {
        count: expired.len(),
        expired,
    }))
}

#[derive(Debug, Serialize)]
pub struct SweepStatus {
    pub pending_payments: u64,
    pub payment_window_secs: u64,
    pub sweep_interval_secs: u64,
    /// 服务器当前时间 (Unix millis)
    pub server_time: i64,
}

/// GET /api/bookings/sweep - 待付款数量与扫描参数
pub async fn sweep_status(State(state): State<ServerState>) -> AppResult<Json<SweepStatus>> {
    Ok(Json(SweepStatus {
        pending_payments: state.storage.pending_count()?,
        payment_window_secs: state.config.payment_window_secs,
        sweep_interval_secs: state.config.expiry_sweep_interval().as_secs(),
        server_time: state.bookings.now_millis(),
    }))
}
