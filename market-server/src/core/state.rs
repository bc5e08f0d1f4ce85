use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::CredentialService;
use crate::core::tasks::{BackgroundTasks, register_reconcile};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::notices::NotificationService;
use crate::orders::{FulfillmentCoordinator, OrderStore};
use crate::realtime::RealtimeHub;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价 clone (内部 Arc / Surreal 句柄)。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | orders | OrderStore | 订单创建 / 查询 |
/// | fulfillment | FulfillmentCoordinator | 履约状态机 |
/// | notices | NotificationService | 买家通知 |
/// | hub | RealtimeHub | 实时聊天 / 推送 |
/// | credentials | CredentialService | 账号密码校验 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub orders: OrderStore,
    pub fulfillment: FulfillmentCoordinator,
    pub notices: NotificationService,
    pub hub: RealtimeHub,
    pub credentials: CredentialService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 数据库 (RocksDB at `work_dir/market.db`, or in-memory)
    /// 2. 演示数据 (SEED_DEMO_DATA)
    /// 3. 各服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::from_config(config).await?.db;

        if config.seed_demo_data && crate::db::seed::seed_demo_data(&db).await? {
            tracing::info!("Demo accounts seeded");
        }

        Ok(Self::with_db(config.clone(), db))
    }

    /// Wire every service onto an already opened database
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let hub = RealtimeHub::new(db.clone(), config.hub_outbox_capacity);
        Self {
            orders: OrderStore::new(db.clone(), &config),
            fulfillment: FulfillmentCoordinator::new(db.clone(), hub.clone(), &config),
            notices: NotificationService::new(db.clone(), hub.clone()),
            credentials: CredentialService::new(db.clone()),
            hub,
            db,
            config,
        }
    }

    /// 启动后台任务, 返回管理器 (shutdown 时调用 `shutdown().await`)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        register_reconcile(
            &mut tasks,
            self.fulfillment.clone(),
            Duration::from_secs(self.config.reconcile_interval_secs),
        );
        tracing::info!(tasks = tasks.len(), "Background tasks started");
        tasks
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
