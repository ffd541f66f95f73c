//! Dashboard API Handlers

use axum::{Json, extract::State};
use shared::models::DashboardSummary;

use crate::bookings::stats;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/dashboard - 区域 / 预订统计
pub async fn summary(State(state): State<ServerState>) -> AppResult<Json<DashboardSummary>> {
    let summary = stats::dashboard_summary(&state.storage)?;
    Ok(Json(summary))
}
