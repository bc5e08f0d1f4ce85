use market_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env 先于配置加载
    let _ = dotenv::dotenv();

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 日志 (guard 持有到进程退出)
    let _log_guard = setup_environment(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        work_dir = %config.work_dir,
        "Market server starting..."
    );

    // 4. 初始化服务器状态
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器 (后台任务由 Server::run 启动)
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
