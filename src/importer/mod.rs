// ==========================================
// 清货清单分析 - 导入层
// ==========================================
// 职责: 上传文件 → 清洗后的清单汇总
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod error;
pub mod file_parser;
pub mod manifest_loader;
pub mod manifest_loader_trait;
pub mod value_normalizer;

// 重导出核心类型
pub use column_resolver::{HeaderColumnResolver, HeaderPattern, ResolvedColumns};
pub use error::{ImportError, ImportResult};
pub use file_parser::{detect_format, CsvParser, ExcelParser, UniversalFileParser};
pub use manifest_loader::ManifestLoaderImpl;
pub use value_normalizer::{clean_numeric, coerce_to_f64, normalize};

// 重导出 Trait 接口
pub use manifest_loader_trait::{ColumnResolver, ManifestLoader, ManifestParser};
