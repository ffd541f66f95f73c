use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，设置后按天滚动写文件 |
/// | PAYMENT_WINDOW_SECS | 1200 | 付款时限(秒) |
/// | EXPIRY_SWEEP_INTERVAL_SECS | 30 | 超时扫描间隔(秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
/// | SEED_DEMO_DATA | false | 空库时写入演示区域和桌台 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/booking HTTP_PORT=8080 PAYMENT_WINDOW_SECS=600 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别 (trace/debug/info/warn/error)
    pub log_level: String,
    /// 日志文件目录
    pub log_dir: Option<String>,
    /// 付款时限 (秒)
    pub payment_window_secs: u64,
    /// 超时扫描间隔 (秒)
    pub expiry_sweep_interval_secs: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    /// 是否写入演示数据
    pub seed_demo_data: bool,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            payment_window_secs: env_parse("PAYMENT_WINDOW_SECS", 1200),
            expiry_sweep_interval_secs: env_parse("EXPIRY_SWEEP_INTERVAL_SECS", 30),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10000),
            seed_demo_data: env_parse("SEED_DEMO_DATA", false),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录: {work_dir}/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 数据库文件: {work_dir}/database/booking.redb
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("booking.redb")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        if let Some(log_dir) = &self.log_dir {
            std::fs::create_dir_all(log_dir)?;
        }
        Ok(())
    }

    /// 付款时限 (毫秒)
    pub fn payment_window_millis(&self) -> i64 {
        i64::try_from(self.payment_window_secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }

    pub fn expiry_sweep_interval(&self) -> Duration {
        // interval(0) panics
        Duration::from_secs(self.expiry_sweep_interval_secs.max(1))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
