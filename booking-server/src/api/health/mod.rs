//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 健康检查 (含数据库探测) |
//! | /api/health-check | GET | 同上，前端维护页探测用 |
//!
//! ```json
//! { "status": "healthy", "version": "0.1.0", "database": "ok", "pending_payments": 2 }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/health-check", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    /// ok | error
    database: &'static str,
    /// 待付款预订数 (数据库不可用时缺省)
    #[serde(skip_serializing_if = "Option::is_none")]
    pending_payments: Option<u64>,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let (status, database, pending_payments) = match state.storage.pending_count() {
        Ok(count) => ("healthy", "ok", Some(count)),
        Err(e) => {
            tracing::error!(error = %e, "Health check database probe failed");
            ("degraded", "error", None)
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        pending_payments,
    })
}
