use std::sync::Arc;

use crate::bookings::BookingManager;
use crate::bookings::sweeper::ExpirySweeper;
use crate::catalog::{CatalogService, seed};
use crate::core::{BackgroundTasks, Config, Result, TaskKind};
use crate::db::Storage;
use crate::utils::Clock;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 通过 axum `State` 显式传给每个 handler，不存在模块级单例。
/// 所有字段都是 Arc / 可廉价 Clone 的句柄。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | storage | Storage | redb 存储 |
/// | catalog | CatalogService | 区域 / 桌台管理 |
/// | bookings | Arc<BookingManager> | 预订状态机与占座 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub storage: Storage,
    pub catalog: CatalogService,
    pub bookings: Arc<BookingManager>,
}

impl ServerState {
    pub fn new(config: Config, storage: Storage) -> Self {
        let bookings = BookingManager::new(storage.clone(), config.payment_window_millis());
        Self::from_parts(config, storage, bookings)
    }

    /// Build state with an injected clock (tests)
    pub fn with_clock(config: Config, storage: Storage, clock: Arc<dyn Clock>) -> Self {
        let bookings =
            BookingManager::with_clock(storage.clone(), config.payment_window_millis(), clock);
        Self::from_parts(config, storage, bookings)
    }

    fn from_parts(config: Config, storage: Storage, bookings: BookingManager) -> Self {
        Self {
            catalog: CatalogService::new(storage.clone()),
            config,
            storage,
            bookings: Arc::new(bookings),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/booking.redb)
    /// 3. 演示数据 (仅 `SEED_DEMO_DATA=true` 且空库)
    pub fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let storage = Storage::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Booking database opened");

        if config.seed_demo_data && seed::seed_if_empty(&storage)? {
            tracing::info!("Demo catalog written to empty database");
        }

        Ok(Self::new(config.clone(), storage))
    }

    /// 启动后台任务
    ///
    /// - 付款超时扫描 (Periodic)
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let sweeper = ExpirySweeper::new(
            self.bookings.as_ref().clone(),
            self.config.expiry_sweep_interval(),
        );
        let token = tasks.shutdown_token();
        tasks.spawn("expiry_sweeper", TaskKind::Periodic, sweeper.run(token));
    }
}
