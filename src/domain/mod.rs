// ==========================================
// 清货清单分析 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含文件解析逻辑，不含场景计算逻辑
// ==========================================

pub mod manifest;
pub mod types;

// 重导出核心类型
pub use manifest::{
    ColumnMapping, ManifestRow, ManifestSummary, NormalizedValue, RawCell, RawTable, UploadedFile,
};
pub use types::{CostColumnSource, FileFormat, ManifestStatus, RoiBand};
