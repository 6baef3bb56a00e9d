// ==========================================
// 清货清单分析 - 核心库
// ==========================================
// 职责: 清货清单（CSV / Excel）解析、清洗、汇总与利润场景模拟
// 分层: domain → importer → engine → api → app
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 清单文件解析与清洗
pub mod importer;

// 引擎层 - 场景计算
pub mod engine;

// 配置层 - 场景配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 分析接口
pub mod api;

// 应用层 - 命令行
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CostColumnSource, FileFormat, ManifestStatus, RoiBand};

// 领域实体
pub use domain::{ColumnMapping, ManifestRow, ManifestSummary, NormalizedValue, RawCell, UploadedFile};

// 导入
pub use importer::{clean_numeric, normalize, ManifestLoader, ManifestLoaderImpl};

// 引擎
pub use engine::{PortfolioMetrics, ScenarioEngine, ScenarioParams};

// API
pub use api::{AnalysisApi, AnalysisReport};

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Manifest Margin";
