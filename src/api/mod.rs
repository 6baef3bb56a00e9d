// ==========================================
// 清货清单分析 - API 层
// ==========================================
// 职责: 提供分析 API，供命令行调用
// ==========================================

pub mod analysis_api;
pub mod error;

// 重导出核心类型
pub use analysis_api::{validate_params, AnalysisApi, AnalysisReport};
pub use error::{ApiError, ApiResult};
