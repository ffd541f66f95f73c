//! Expiry Sweeper - 付款超时扫描
//!
//! 定时扫描待付款索引，把超过付款时限的预订转为 `payment_timeout` 并释放座位。
//! 启动时先扫描一次，处理停机期间到期的预订。
//!
//! Note: redb operations are synchronous, the sweep runs inline on the task.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::BookingManager;

pub struct ExpirySweeper {
    manager: BookingManager,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(manager: BookingManager, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// One sweep pass, returns the number of expired bookings
    pub fn sweep_once(&self) -> usize {
        match self.manager.sweep_expired() {
            Ok(expired) => expired.len(),
            Err(e) => {
                tracing::error!(error = %e, "Expiry sweep failed");
                0
            }
        }
    }

    /// Run until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(interval_secs = self.interval.as_secs(), "ExpirySweeper started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("ExpirySweeper shutting down");
                    break;
                }
                // 第一次 tick 立即触发 = 启动扫描
                _ = ticker.tick() => {
                    let count = self.sweep_once();
                    if count > 0 {
                        tracing::debug!(count, "Sweep pass expired bookings");
                    }
                }
            }
        }
    }
}
