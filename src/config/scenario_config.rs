// ==========================================
// 清货清单分析 - 场景配置
// ==========================================
// 职责: 转售比例 / 运费 / 杂费 / 语言 的默认值、覆写与校验
// ==========================================

use crate::config::config_manager::config_keys;
use crate::config::error::{ConfigError, ConfigResult};
use crate::engine::ScenarioParams;
use crate::i18n;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// 转售比例允许范围（%）
pub const RESALE_PCT_RANGE: RangeInclusive<u32> = 10..=100;

/// 默认转售比例（%）
pub const DEFAULT_RESALE_PCT: u32 = 35;

// ==========================================
// ScenarioConfig - 场景配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub resale_pct: u32,
    pub freight_per_lot: f64,
    pub misc_per_lot: f64,
    pub locale: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            resale_pct: DEFAULT_RESALE_PCT,
            freight_per_lot: 0.0,
            misc_per_lot: 0.0,
            locale: "en".to_string(),
        }
    }
}

// ==========================================
// ScenarioOverrides - 命令行覆写项
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioOverrides {
    pub resale_pct: Option<u32>,
    pub freight_per_lot: Option<f64>,
    pub misc_per_lot: Option<f64>,
    pub locale: Option<String>,
}

impl ScenarioConfig {
    /// 应用覆写（Some 覆盖，None 保留）
    pub fn with_overrides(mut self, overrides: &ScenarioOverrides) -> Self {
        if let Some(pct) = overrides.resale_pct {
            self.resale_pct = pct;
        }
        if let Some(freight) = overrides.freight_per_lot {
            self.freight_per_lot = freight;
        }
        if let Some(misc) = overrides.misc_per_lot {
            self.misc_per_lot = misc;
        }
        if let Some(locale) = &overrides.locale {
            self.locale = locale.clone();
        }
        self
    }

    /// 校验取值范围
    pub fn validate(&self) -> ConfigResult<()> {
        if !RESALE_PCT_RANGE.contains(&self.resale_pct) {
            return Err(ConfigError::InvalidValue {
                key: config_keys::RESALE_PCT.to_string(),
                value: self.resale_pct.to_string(),
                message: format!(
                    "must be between {} and {}",
                    RESALE_PCT_RANGE.start(),
                    RESALE_PCT_RANGE.end()
                ),
            });
        }

        for (key, value) in [
            (config_keys::FREIGHT_PER_LOT, self.freight_per_lot),
            (config_keys::MISC_PER_LOT, self.misc_per_lot),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    message: "must be a non-negative amount".to_string(),
                });
            }
        }

        if !i18n::is_supported(&self.locale) {
            return Err(ConfigError::InvalidValue {
                key: config_keys::LOCALE.to_string(),
                value: self.locale.clone(),
                message: format!("supported locales: {}", i18n::SUPPORTED_LOCALES.join(", ")),
            });
        }

        Ok(())
    }

    /// 转换为场景引擎参数
    pub fn to_params(&self) -> ScenarioParams {
        ScenarioParams {
            resale_pct: f64::from(self.resale_pct),
            freight_per_lot: self.freight_per_lot,
            misc_per_lot: self.misc_per_lot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScenarioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_params(), ScenarioParams::default());
    }

    #[test]
    fn test_overrides() {
        let overrides = ScenarioOverrides {
            resale_pct: Some(50),
            freight_per_lot: None,
            misc_per_lot: Some(75.0),
            locale: Some("zh-CN".to_string()),
        };
        let config = ScenarioConfig::default().with_overrides(&overrides);

        assert_eq!(config.resale_pct, 50);
        assert_eq!(config.freight_per_lot, 0.0);
        assert_eq!(config.misc_per_lot, 75.0);
        assert_eq!(config.locale, "zh-CN");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = ScenarioConfig {
            resale_pct: 5,
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == config_keys::RESALE_PCT
        ));

        let config = ScenarioConfig {
            freight_per_lot: -1.0,
            ..ScenarioConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ScenarioConfig {
            locale: "fr".to_string(),
            ..ScenarioConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScenarioConfig = serde_json::from_str(r#"{"freight_per_lot": 120.5}"#).unwrap();
        assert_eq!(config.resale_pct, DEFAULT_RESALE_PCT);
        assert_eq!(config.freight_per_lot, 120.5);
        assert_eq!(config.locale, "en");
    }
}
