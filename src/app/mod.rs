// ==========================================
// 清货清单分析 - 应用层
// ==========================================
// 职责: 命令行入口编排
// 流程: 加载配置 → 命令行覆写 → 校验 → 分析 → 输出报告
// ==========================================

pub mod cli;
pub mod render;

pub use cli::Cli;
pub use render::{format_money, render_text};

use crate::api::{AnalysisApi, ApiResult};
use crate::config::ConfigManager;
use crate::i18n;
use tracing::{debug, info};

/// 执行一次命令行分析，返回要写到 stdout 的报告
///
/// 配置或参数非法时返回错误；单个文件的失败写入报告本身
pub async fn run(cli: &Cli) -> ApiResult<String> {
    let config = ConfigManager::new(cli.config.clone())
        .load()?
        .with_overrides(&cli.overrides());
    config.validate()?;
    debug!(?config, "场景配置已生效");

    i18n::set_locale(&config.locale);

    let api: AnalysisApi = AnalysisApi::default();
    let report = api
        .analyze_paths(cli.files.clone(), config.to_params())
        .await?;
    info!(
        session_id = %report.session_id,
        valid = report.valid_count(),
        "报告已生成"
    );

    if cli.json {
        report.to_json_pretty()
    } else {
        Ok(render_text(&report))
    }
}
