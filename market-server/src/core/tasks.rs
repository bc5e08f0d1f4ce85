//! 后台任务管理
//!
//! Registration, panic capture and shutdown of background tasks.
//!
//! - [`TaskKind::Warmup`] - 启动时运行一次 (startup reconciliation)
//! - [`TaskKind::Periodic`] - 定时任务 (notice reconciliation)

use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::orders::FulfillmentCoordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Runs once at startup
    Warmup,
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Warmup => write!(f, "Warmup"),
            TaskKind::Periodic => write!(f, "Periodic"),
        }
    }
}

struct RegisteredTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// 后台任务管理器
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// tasks.spawn("notice_reconcile", TaskKind::Periodic, async move { /* ... */ });
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// 取消令牌 (任务内部监听 shutdown)
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// 注册并启动一个后台任务, panic 会被捕获并记录
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.clone();
        let wrapped = async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(()) => {
                    if kind != TaskKind::Warmup && !token.is_cancelled() {
                        tracing::warn!(task = %name, kind = %kind, "Background task completed unexpectedly");
                    }
                }
                Err(panic) => {
                    let message = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "Unknown panic".to_string());
                    tracing::error!(task = %name, kind = %kind, panic = %message, "Background task panicked");
                }
            }
        };

        let handle = tokio::spawn(wrapped);
        tracing::debug!(task = %name, kind = %kind, "Registered background task");
        self.tasks.push(RegisteredTask { name, kind, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 取消所有任务并等待完成
    pub async fn shutdown(self) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());
        self.shutdown.cancel();

        for task in self.tasks {
            match task.handle.await {
                Ok(()) => tracing::debug!(task = %task.name, kind = %task.kind, "Task stopped"),
                Err(e) if e.is_cancelled() => tracing::debug!(task = %task.name, "Task cancelled"),
                Err(e) => tracing::error!(task = %task.name, error = ?e, "Task failed"),
            }
        }
        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the notice reconciliation sweep: once at startup, then every
/// `interval`. A zero interval registers nothing.
pub fn register_reconcile(
    tasks: &mut BackgroundTasks,
    fulfillment: FulfillmentCoordinator,
    interval: Duration,
) {
    if interval.is_zero() {
        tracing::info!("Notice reconciliation disabled");
        return;
    }
    let startup = fulfillment.clone();
    tasks.spawn("notice_reconcile_startup", TaskKind::Warmup, async move {
        run_reconcile(&startup).await;
    });

    let token = tasks.shutdown_token();
    tasks.spawn("notice_reconcile", TaskKind::Periodic, async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => run_reconcile(&fulfillment).await,
            }
        }
    });
}

async fn run_reconcile(fulfillment: &FulfillmentCoordinator) {
    if let Err(e) = fulfillment.reconcile().await {
        tracing::error!(error = %e, "Notice reconciliation failed");
    }
}
