use anyhow::Context;
use clap::Parser;
use marketplace_tx::config::Config;
use marketplace_tx::log_info;
use marketplace_tx::startup::Application;
use marketplace_tx::utils::logger::init_logger;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 可选，不存在时忽略
    dotenvy::dotenv().ok();
    // 初始化日志（全局只需调用一次）
    init_logger();

    let cli = cli::Cli::parse();

    // 1. 加载配置
    let config = Config::load().context("Failed to load application configuration")?;

    // 2. 构建应用实例（provider / 合约注册表 / 镜像客户端）
    let application = Application::build(config)
        .await
        .context("Application building failed (RPC / contract registry initialization)")?;

    log_info!("Application build complete. Running command {:?}", cli.command);

    // 3. 执行子命令
    cli::run(&application, cli)
        .await
        .context("Command failed")?;

    Ok(())
}
