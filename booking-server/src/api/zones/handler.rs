//! Zone API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, ZoneCreate, ZonePolicy, ZoneUpdate};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/zones - 获取所有区域
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ZonePolicy>>> {
    let zones = state.catalog.list_zones()?;
    Ok(Json(zones))
}

/// GET /api/zones/:id - 获取单个区域
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ZonePolicy>> {
    let zone = state.catalog.get_zone(&id)?;
    Ok(Json(zone))
}

/// GET /api/zones/:id/tables - 获取区域内的桌台 (含实时座位状态)
pub async fn list_tables(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.catalog.list_tables_in_zone(&id)?;
    Ok(Json(tables))
}

/// POST /api/zones - 创建区域
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ZoneCreate>,
) -> AppResult<Json<ZonePolicy>> {
    let zone = state.catalog.create_zone(payload)?;
    Ok(Json(zone))
}

/// PUT /api/zones/:id - 更新区域
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ZoneUpdate>,
) -> AppResult<Json<ZonePolicy>> {
    let zone = state.catalog.update_zone(&id, payload)?;
    Ok(Json(zone))
}

/// DELETE /api/zones/:id - 删除区域 (仍有桌台时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.catalog.delete_zone(&id)?;
    Ok(Json(ApiResponse::ok()))
}
