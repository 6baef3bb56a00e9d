// ==========================================
// 清货清单分析 - 配置管理器
// ==========================================
// 职责: 读取场景配置（只读，不回写）
// 存储: JSON 文件；未指定路径时读取用户配置目录下的 manifest-margin/config.json
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::scenario_config::ScenarioConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置键（JSON 字段名）
pub mod config_keys {
    pub const RESALE_PCT: &str = "resale_pct";
    pub const FREIGHT_PER_LOT: &str = "freight_per_lot";
    pub const MISC_PER_LOT: &str = "misc_per_lot";
    pub const LOCALE: &str = "locale";
}

/// 配置目录名
const APP_CONFIG_DIR: &str = "manifest-margin";

/// 配置文件名
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    explicit_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - explicit_path: 显式指定的配置文件（必须存在）；None 时使用默认位置（可不存在）
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self { explicit_path }
    }

    /// 默认配置文件位置
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// 加载并校验配置
    ///
    /// # 返回
    /// - Ok(ScenarioConfig): 文件内容与默认值合并后的配置
    /// - Err: 显式路径不存在、JSON 格式错误、取值越界
    pub fn load(&self) -> ConfigResult<ScenarioConfig> {
        let config = match &self.explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.display().to_string()));
                }
                Self::read_file(path)?
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => {
                    debug!("未找到配置文件，使用默认配置");
                    ScenarioConfig::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> ConfigResult<ScenarioConfig> {
        let raw = std::fs::read_to_string(path)?;
        let config: ScenarioConfig = serde_json::from_str(&raw)?;
        info!(path = %path.display(), "已加载配置文件");
        Ok(config)
    }
}
