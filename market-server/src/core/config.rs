/// 服务器配置 - 市场服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP / WebSocket 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | DB_IN_MEMORY | false | 使用内存数据库 |
/// | DB_NAMESPACE | market | SurrealDB namespace |
/// | DB_DATABASE | market | SurrealDB database |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | ORDER_CODE_PREFIX | ORD | 订单号前缀 |
/// | ORDER_CODE_MAX_ATTEMPTS | 64 | 订单号分配尝试次数 |
/// | TRANSITION_MAX_ATTEMPTS | 12 | 状态迁移事务重试次数 (冲突时退避重试) |
/// | RECONCILE_INTERVAL_SECS | 300 | 通知补偿周期 (0 = 关闭) |
/// | HUB_OUTBOX_CAPACITY | 64 | 每个连接的发送队列长度 |
/// | SEED_DEMO_DATA | false | 写入演示账号 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | (unset) | 日志文件目录 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/market HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 数据库 ===
    pub db_in_memory: bool,
    pub db_namespace: String,
    pub db_database: String,

    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,

    // === 订单 / 履约 ===
    pub order_code_prefix: String,
    pub order_code_max_attempts: u32,
    pub transition_max_attempts: u32,
    /// 通知补偿任务周期 (秒), 0 表示关闭
    pub reconcile_interval_secs: u64,

    /// 实时连接发送队列长度
    pub hub_outbox_capacity: usize,
    pub seed_demo_data: bool,

    // === 日志 ===
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
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
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            db_in_memory: env_or("DB_IN_MEMORY", false),
            db_namespace: std::env::var("DB_NAMESPACE").unwrap_or_else(|_| "market".into()),
            db_database: std::env::var("DB_DATABASE").unwrap_or_else(|_| "market".into()),

            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),

            order_code_prefix: std::env::var("ORDER_CODE_PREFIX")
                .unwrap_or_else(|_| "ORD".into()),
            order_code_max_attempts: env_or("ORDER_CODE_MAX_ATTEMPTS", 64),
            transition_max_attempts: env_or("TRANSITION_MAX_ATTEMPTS", 12),
            reconcile_interval_secs: env_or("RECONCILE_INTERVAL_SECS", 300),

            hub_outbox_capacity: env_or("HUB_OUTBOX_CAPACITY", 64),
            seed_demo_data: env_or("SEED_DEMO_DATA", false),

            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景: 内存数据库, 不启动补偿任务
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.db_in_memory = true;
        config.reconcile_interval_secs = 0;
        config.seed_demo_data = false;
        config
    }

    /// 数据库文件路径
    pub fn database_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("market.db")
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
