//! Booking Server - 餐厅座位预订服务
//!
//! # 架构概述
//!
//! - **计价引擎** (`pricing`): 整桌 / 按座计价，纯函数
//! - **存储** (`db`): 嵌入式 redb，单写事务实现原子占座
//! - **目录** (`catalog`): 区域价格策略与桌台管理
//! - **预订** (`bookings`): 预订状态机、付款时限与超时扫描
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务、错误
//! ├── db/            # redb 存储层
//! ├── catalog/       # 区域 / 桌台
//! ├── pricing/       # 计价引擎
//! ├── bookings/      # 预订生命周期
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验、时钟
//! ```

pub mod api;
pub mod bookings;
pub mod catalog;
pub mod core;
pub mod db;
pub mod pricing;
pub mod utils;

// Re-export 公共类型
pub use bookings::{BookingError, BookingEvent, BookingManager, CancelledBy};
pub use catalog::{CatalogService, CatalogSnapshot};
pub use core::{Config, Server, ServerError, ServerState};
pub use db::Storage;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env、创建工作目录并初始化日志
///
/// 生产环境输出 JSON 日志。
pub fn setup_environment() -> core::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}
