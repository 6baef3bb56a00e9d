// ==========================================
// 清货清单分析 - 配置层
// ==========================================
// 职责: 场景配置加载与校验，命令行覆写
// 存储: 只读 JSON 文件，不跨会话持久化
// ==========================================

pub mod config_manager;
pub mod error;
pub mod scenario_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use scenario_config::{ScenarioConfig, ScenarioOverrides, DEFAULT_RESALE_PCT, RESALE_PCT_RANGE};
