// ==========================================
// 清货清单分析 - 命令行参数
// ==========================================

use crate::config::ScenarioOverrides;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "manifest-margin",
    version,
    about = "Analyze liquidation manifests and simulate resale profit"
)]
pub struct Cli {
    /// Manifest files to analyze (.csv, .xlsx, .xls)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Liquidation sale price as a percentage of retail (10-100)
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(10..=100))]
    pub resale: Option<u32>,

    /// Estimated freight cost per lot
    #[arg(long)]
    pub freight: Option<f64>,

    /// Misc/labor cost per lot
    #[arg(long)]
    pub misc: Option<f64>,

    /// Scenario config file (JSON)
    #[arg(short, long, env = "MANIFEST_MARGIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report language (en, zh-CN)
    #[arg(long)]
    pub locale: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose logging (debug to stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 命令行中显式给出的场景参数
    pub fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            resale_pct: self.resale,
            freight_per_lot: self.freight,
            misc_per_lot: self.misc,
            locale: self.locale.clone(),
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
