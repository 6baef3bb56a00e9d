// ==========================================
// 清货清单分析 - 命令行主入口
// ==========================================
// 报告输出到 stdout，日志输出到 stderr
// 仅参数 / 配置非法时以非零状态退出
// ==========================================

use clap::Parser;
use manifest_margin::app::{self, Cli};
use manifest_margin::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json(cli.log_level());
    } else {
        logging::init(cli.log_level());
    }

    tracing::info!(
        version = manifest_margin::VERSION,
        files = cli.files.len(),
        "{} 启动",
        manifest_margin::APP_NAME
    );

    let output = app::run(&cli).await?;
    println!("{}", output);
    Ok(())
}
