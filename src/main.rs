use anyhow::Result;
use clap::Parser;
use test_platform_client::cli::Cli;
use test_platform_client::orchestrator::App;
use test_platform_client::utils::logging;
use test_platform_client::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 解析命令行
    let cli = Cli::parse();

    // 加载配置（client.toml + 环境变量覆盖）
    let config = Config::load();

    // 初始化并运行应用
    App::initialize(config)?.run(cli.command).await?;

    Ok(())
}
