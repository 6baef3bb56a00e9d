// ==========================================
// 清货清单分析 - 引擎层
// ==========================================
// 职责: 基于清单汇总的利润场景计算
// 红线: 只消费 OK 状态的汇总，不做文件解析
// ==========================================

pub mod scenario;

// 重导出核心引擎
pub use scenario::{
    evaluate, PackageMetrics, PortfolioMetrics, ScenarioEngine, ScenarioMetrics, ScenarioParams,
    WaterfallMeasure, WaterfallStep,
};
