//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TablePosition};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/tables - 获取所有桌台 (`seats[].is_booked` 为实时状态)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.catalog.list_tables()?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = state.catalog.get_table(id)?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.catalog.create_table(payload)?;
    Ok(Json(table))
}

/// PUT /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.catalog.update_table(id, payload)?;
    Ok(Json(table))
}

/// PUT /api/tables/:id/position - 仅修改布局坐标
pub async fn reposition(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(position): Json<TablePosition>,
) -> AppResult<Json<DiningTable>> {
    let table = state.catalog.reposition_table(id, position)?;
    Ok(Json(table))
}

/// PUT /api/tables/:id/toggle-active
pub async fn toggle_active(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = state.catalog.toggle_table_active(id)?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台 (有占座时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.catalog.delete_table(id)?;
    Ok(Json(ApiResponse::ok()))
}
