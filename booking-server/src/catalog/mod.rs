//! Zone / table catalog
//!
//! - [`CatalogService`] - 区域策略与桌台的管理操作
//! - [`CatalogSnapshot`] - 计价用的一致性快照
//! - [`seed`] - 确定性演示数据

mod error;
pub mod seed;
mod service;
mod snapshot;

pub use error::{CatalogError, CatalogResult};
pub use service::CatalogService;
pub use snapshot::CatalogSnapshot;
