//! Dashboard API 模块 (管理后台概览)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/dashboard", get(handler::summary))
}
