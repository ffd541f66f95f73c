//! Booking API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/bookings | GET | 列表 (`?status=&search=`) |
//! | /api/bookings | POST | 下单占座 (冲突 409) |
//! | /api/bookings/{id} | GET / PUT / DELETE | 查询 / 修改顾客信息 / 删除 |
//! | /api/bookings/{id}/confirm | POST | 提交付款凭证 (超时 410) |
//! | /api/bookings/{id}/cancel | POST | 取消 (`?by=admin`) |
//! | /api/bookings/sweep | GET / POST | 查看 / 触发超时扫描 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/sweep",
            get(handler::sweep_status).post(handler::sweep),
        )
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/confirm", post(handler::confirm))
        .route("/{id}/cancel", post(handler::cancel))
}
