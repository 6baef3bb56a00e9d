// ==========================================
// 清货清单分析 - 清单领域模型
// ==========================================
// 职责: 原始单元格 / 标准化值 / 清洗行 / 文件汇总
// 生命周期: 单次分析内有效，不落库
// ==========================================

use crate::domain::types::{CostColumnSource, ManifestStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ==========================================
// RawCell - 原始单元格
// ==========================================
// 来源: CSV / Excel 读取器
// 用途: 交给 value_normalizer 消费，用后即弃
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Missing,
    Text(String),
    Bytes(Vec<u8>),
    Number(f64),
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<Vec<u8>> for RawCell {
    fn from(value: Vec<u8>) -> Self {
        RawCell::Bytes(value)
    }
}

// ==========================================
// NormalizedValue - 标准化结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Number(f64),
    /// 去除货币符号后仍无法解析的残留文本，由调用方二次转换
    ResidualText(String),
    Missing,
}

impl NormalizedValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            NormalizedValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

// ==========================================
// RawTable - 解析后的二维表
// ==========================================
// 表头已 TRIM；每行长度与表头一致（短行补 Missing）
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 按列下标取单元格，越界视为 Missing
    pub fn cell(&self, row: usize, col: usize) -> RawCell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or(RawCell::Missing)
    }
}

// ==========================================
// UploadedFile - 上传文件
// ==========================================
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// 从磁盘读取文件，文件名取路径最后一段
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        Ok(Self {
            name: display_name(path),
            content,
        })
    }

    /// 小写扩展名（无扩展名返回空串）
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}

/// 路径展示名
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ==========================================
// ColumnMapping - 列匹配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub quantity: String,
    pub retail: String,
    pub cost: String,
    pub description: Option<String>,
    pub cost_source: CostColumnSource,
    /// ext+retail 规则胜出，同时表中还存在另一列 ext+cost 列（不含选中列本身）
    pub ambiguous_cost: bool,
}

// ==========================================
// ManifestRow - 清洗后的明细行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub row_number: usize,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_retail: f64,
    pub extended_cost: f64,
    pub total_retail_value: f64,
}

impl ManifestRow {
    /// total_retail_value 始终由 quantity × unit_retail 重新计算
    pub fn new(
        row_number: usize,
        description: Option<String>,
        quantity: f64,
        unit_retail: f64,
        extended_cost: f64,
    ) -> Self {
        Self {
            row_number,
            description,
            quantity,
            unit_retail,
            extended_cost,
            total_retail_value: quantity * unit_retail,
        }
    }
}

// ==========================================
// ManifestSummary - 单文件汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSummary {
    pub filename: String,
    pub status: ManifestStatus,
    pub details: String,
    pub total_items: f64,
    pub variety_count: usize,
    pub total_cost: f64,
    pub total_retail: f64,
    pub rows: Vec<ManifestRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_mapping: Option<ColumnMapping>,
}

impl ManifestSummary {
    /// 成功汇总：由清洗行计算全部聚合值
    pub fn ok(filename: impl Into<String>, mapping: ColumnMapping, rows: Vec<ManifestRow>) -> Self {
        let total_items = rows.iter().map(|r| r.quantity).sum();
        let variety_count = rows.iter().filter(|r| r.quantity > 0.0).count();
        let total_cost = rows.iter().map(|r| r.extended_cost).sum();
        let total_retail = rows.iter().map(|r| r.total_retail_value).sum();

        Self {
            filename: filename.into(),
            status: ManifestStatus::Ok,
            details: String::new(),
            total_items,
            variety_count,
            total_cost,
            total_retail,
            rows,
            column_mapping: Some(mapping),
        }
    }

    /// 必需列缺失
    pub fn error(filename: impl Into<String>, details: impl Into<String>) -> Self {
        Self::zeroed(filename, ManifestStatus::Error, details)
    }

    /// 文件解析失败
    pub fn critical(filename: impl Into<String>, details: impl Into<String>) -> Self {
        Self::zeroed(filename, ManifestStatus::CriticalError, details)
    }

    fn zeroed(filename: impl Into<String>, status: ManifestStatus, details: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status,
            details: details.into(),
            total_items: 0.0,
            variety_count: 0,
            total_cost: 0.0,
            total_retail: 0.0,
            rows: Vec::new(),
            column_mapping: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            quantity: "Qty".to_string(),
            retail: "Unit Retail".to_string(),
            cost: "Ext. Retail".to_string(),
            description: None,
            cost_source: CostColumnSource::ExtendedRetail,
            ambiguous_cost: false,
        }
    }

    #[test]
    fn test_manifest_row_total_retail_value() {
        let row = ManifestRow::new(1, None, 4.0, 2.5, 3.0);
        assert_eq!(row.total_retail_value, 10.0);
    }

    #[test]
    fn test_summary_ok_aggregates() {
        let rows = vec![
            ManifestRow::new(1, None, 10.0, 5.0, 20.0),
            ManifestRow::new(2, None, 0.0, 8.0, 0.0),
            ManifestRow::new(3, None, 5.0, 10.0, 20.0),
        ];
        let summary = ManifestSummary::ok("lot.csv", mapping(), rows);

        assert_eq!(summary.status, ManifestStatus::Ok);
        assert!(summary.details.is_empty());
        assert_eq!(summary.total_items, 15.0);
        assert_eq!(summary.variety_count, 2);
        assert_eq!(summary.total_cost, 40.0);
        assert_eq!(summary.total_retail, 100.0);
        assert_eq!(summary.rows.len(), 3);
    }

    #[test]
    fn test_summary_error_is_zeroed() {
        let summary = ManifestSummary::error("bad.csv", "missing");
        assert_eq!(summary.status, ManifestStatus::Error);
        assert_eq!(summary.total_items, 0.0);
        assert_eq!(summary.variety_count, 0);
        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.total_retail, 0.0);
        assert!(summary.rows.is_empty());
        assert!(summary.column_mapping.is_none());

        let critical = ManifestSummary::critical("broken.xlsx", "zip error");
        assert_eq!(critical.status, ManifestStatus::CriticalError);
        assert_eq!(critical.details, "zip error");
    }

    #[test]
    fn test_uploaded_file_extension() {
        assert_eq!(UploadedFile::new("Lot 12.CSV", vec![]).extension(), "csv");
        assert_eq!(UploadedFile::new("lot.xlsx", vec![]).extension(), "xlsx");
        assert_eq!(UploadedFile::new("manifest", vec![]).extension(), "");
    }

    #[test]
    fn test_raw_table_cell_out_of_range() {
        let table = RawTable {
            headers: vec!["Qty".to_string()],
            rows: vec![vec![RawCell::from("3")]],
        };
        assert_eq!(table.cell(0, 0), RawCell::Text("3".to_string()));
        assert_eq!(table.cell(0, 5), RawCell::Missing);
        assert_eq!(table.cell(9, 0), RawCell::Missing);
    }
}
