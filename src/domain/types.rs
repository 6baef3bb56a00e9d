// ==========================================
// 清货清单分析 - 领域类型定义
// ==========================================
// 职责: 状态枚举 / 成本列来源 / ROI 分档 / 文件格式
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 清单处理状态 (Manifest Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManifestStatus {
    Ok,            // 解析成功，列匹配成功
    Error,         // 必需列缺失
    CriticalError, // 文件本身无法解析
}

impl ManifestStatus {
    /// 是否参与汇总计算
    pub fn is_ok(&self) -> bool {
        matches!(self, ManifestStatus::Ok)
    }

    /// i18n 标签键
    pub fn label_key(&self) -> &'static str {
        match self {
            ManifestStatus::Ok => "status.ok",
            ManifestStatus::Error => "status.error",
            ManifestStatus::CriticalError => "status.critical_error",
        }
    }
}

impl fmt::Display for ManifestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestStatus::Ok => write!(f, "OK"),
            ManifestStatus::Error => write!(f, "ERROR"),
            ManifestStatus::CriticalError => write!(f, "CRITICAL_ERROR"),
        }
    }
}

// ==========================================
// 成本列来源 (Cost Column Source)
// ==========================================
// 经纪商清单中 "Ext. Retail" 列经常充当成本列，优先级高于 "Ext. Cost"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostColumnSource {
    ExtendedRetail, // 列名含 ext + retail
    ExtendedCost,   // 列名含 cost + ext
}

impl fmt::Display for CostColumnSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostColumnSource::ExtendedRetail => write!(f, "EXTENDED_RETAIL"),
            CostColumnSource::ExtendedCost => write!(f, "EXTENDED_COST"),
        }
    }
}

// ==========================================
// ROI 分档 (ROI Band)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoiBand {
    Strong,   // ROI > 20%
    Marginal, // 0% < ROI <= 20%
    Loss,     // ROI <= 0%
}

impl RoiBand {
    pub fn from_roi_pct(roi_pct: f64) -> Self {
        if roi_pct > 20.0 {
            RoiBand::Strong
        } else if roi_pct > 0.0 {
            RoiBand::Marginal
        } else {
            RoiBand::Loss
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            RoiBand::Strong => "roi_band.strong",
            RoiBand::Marginal => "roi_band.marginal",
            RoiBand::Loss => "roi_band.loss",
        }
    }
}

impl fmt::Display for RoiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoiBand::Strong => write!(f, "STRONG"),
            RoiBand::Marginal => write!(f, "MARGINAL"),
            RoiBand::Loss => write!(f, "LOSS"),
        }
    }
}

// ==========================================
// 表格文件格式 (File Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "CSV"),
            FileFormat::Xlsx => write!(f, "XLSX"),
            FileFormat::Xls => write!(f, "XLS"),
        }
    }
}
