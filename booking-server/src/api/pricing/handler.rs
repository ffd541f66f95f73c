//! Pricing API Handlers

use axum::{Json, extract::State};
use shared::models::{PriceBreakdown, PricePreviewRequest};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/pricing/preview - 价格预览 (无副作用，不占座)
///
/// 选中已被占用的座位返回 4005；预览与下单之间的竞争仍由下单时的原子检查处理。
pub async fn preview(
    State(state): State<ServerState>,
    Json(payload): Json<PricePreviewRequest>,
) -> AppResult<Json<PriceBreakdown>> {
    let snapshot = state.catalog.snapshot()?;
    let breakdown = snapshot.preview(&payload.seats)?;
    Ok(Json(breakdown))
}
