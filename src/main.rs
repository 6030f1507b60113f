//! mixtts - 中英文混合文本转语音命令行

use std::sync::Arc;

use clap::Parser;

use mixtts::config::{load_config_from_path, print_config};
use mixtts::infrastructure::adapters::ProcessCommandRunner;
use mixtts::infrastructure::cli::{apply_overrides, AppServices, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：命令行 > 环境变量 > 配置文件 > 默认值）
    let mut config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    apply_overrides(&mut config, &cli);

    // 初始化日志（输出到 stderr，stdout 只留给结果）
    let log_filter = format!("{},mixtts={}", config.log.level, config.log.level);
    let env_filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new(&log_filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    print_config(&config);

    let services = AppServices::from_config(&config, Arc::new(ProcessCommandRunner::new()))?;
    let report = services.execute(cli.command).await?;
    println!("{}", report);

    Ok(())
}
