// ==========================================
// 清货清单分析 - 场景模拟引擎
// ==========================================
// 职责: 在转售比例 / 运费 / 杂费假设下计算收入、支出、利润、ROI
// 输入: 状态为 OK 的清单汇总
// 公式:
//   revenue  = total_retail × P / 100
//   expenses = total_cost + overhead
//   profit   = revenue − expenses
//   ROI%     = profit / expenses × 100（expenses <= 0 时为 0）
// ==========================================

use crate::domain::manifest::ManifestSummary;
use crate::domain::types::RoiBand;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ==========================================
// ScenarioParams - 场景参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// 转售价占零售价的百分比
    pub resale_pct: f64,
    /// 每批次运费
    pub freight_per_lot: f64,
    /// 每批次杂费 / 人工
    pub misc_per_lot: f64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            resale_pct: 35.0,
            freight_per_lot: 0.0,
            misc_per_lot: 0.0,
        }
    }
}

impl ScenarioParams {
    /// 每批次固定开销
    pub fn overhead_per_lot(&self) -> f64 {
        self.freight_per_lot + self.misc_per_lot
    }
}

// ==========================================
// ScenarioMetrics - 场景结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub roi_pct: f64,
    pub roi_band: RoiBand,
}

/// 核心场景公式
pub fn evaluate(total_retail: f64, total_cost: f64, overhead: f64, resale_pct: f64) -> ScenarioMetrics {
    let revenue = total_retail * resale_pct / 100.0;
    let expenses = total_cost + overhead;
    let profit = revenue - expenses;
    let roi_pct = if expenses > 0.0 {
        profit / expenses * 100.0
    } else {
        0.0
    };

    ScenarioMetrics {
        revenue,
        expenses,
        profit,
        roi_pct,
        roi_band: RoiBand::from_roi_pct(roi_pct),
    }
}

// ==========================================
// PackageMetrics - 单批次（单文件）指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageMetrics {
    pub filename: String,
    pub items: f64,
    pub variety_count: usize,
    pub total_cost: f64,
    pub total_retail: f64,
    pub overhead: f64,
    pub metrics: ScenarioMetrics,
}

// ==========================================
// WaterfallStep - 财务瀑布
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaterfallMeasure {
    Relative,
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallStep {
    /// i18n 键
    pub label_key: String,
    pub measure: WaterfallMeasure,
    pub amount: f64,
}

// ==========================================
// PortfolioMetrics - 组合指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub package_count: usize,
    pub total_freight: f64,
    pub total_misc: f64,
    pub total_purchase_cost: f64,
    pub total_retail_value: f64,
    pub metrics: ScenarioMetrics,
    pub waterfall: Vec<WaterfallStep>,
}

impl PortfolioMetrics {
    pub fn total_overhead(&self) -> f64 {
        self.total_freight + self.total_misc
    }
}

// ==========================================
// ScenarioEngine - 场景模拟引擎
// ==========================================
pub struct ScenarioEngine;

impl ScenarioEngine {
    /// 单批次指标：开销按每批次 运费 + 杂费 计
    pub fn package(&self, summary: &ManifestSummary, params: &ScenarioParams) -> PackageMetrics {
        let overhead = params.overhead_per_lot();
        PackageMetrics {
            filename: summary.filename.clone(),
            items: summary.total_items,
            variety_count: summary.variety_count,
            total_cost: summary.total_cost,
            total_retail: summary.total_retail,
            overhead,
            metrics: evaluate(
                summary.total_retail,
                summary.total_cost,
                overhead,
                params.resale_pct,
            ),
        }
    }

    /// 所有 OK 批次的指标（保持输入顺序）
    pub fn packages(&self, summaries: &[ManifestSummary], params: &ScenarioParams) -> Vec<PackageMetrics> {
        summaries
            .iter()
            .filter(|s| s.is_ok())
            .map(|s| self.package(s, params))
            .collect()
    }

    /// 组合指标：运费 / 杂费按 OK 批次数量累计；无 OK 批次返回 None
    pub fn portfolio(&self, summaries: &[ManifestSummary], params: &ScenarioParams) -> Option<PortfolioMetrics> {
        let valid: Vec<&ManifestSummary> = summaries.iter().filter(|s| s.is_ok()).collect();
        if valid.is_empty() {
            debug!("无有效批次，跳过组合计算");
            return None;
        }

        let package_count = valid.len();
        let total_freight = params.freight_per_lot * package_count as f64;
        let total_misc = params.misc_per_lot * package_count as f64;
        let total_purchase_cost: f64 = valid.iter().map(|s| s.total_cost).sum();
        let total_retail_value: f64 = valid.iter().map(|s| s.total_retail).sum();

        let metrics = evaluate(
            total_retail_value,
            total_purchase_cost,
            total_freight + total_misc,
            params.resale_pct,
        );
        let waterfall = waterfall(&metrics, total_purchase_cost, total_freight + total_misc);

        debug!(
            packages = package_count,
            revenue = metrics.revenue,
            profit = metrics.profit,
            roi = metrics.roi_pct,
            "组合计算完成"
        );

        Some(PortfolioMetrics {
            package_count,
            total_freight,
            total_misc,
            total_purchase_cost,
            total_retail_value,
            metrics,
            waterfall,
        })
    }
}

/// 收入 → 商品成本 → 开销 → 净利润
fn waterfall(metrics: &ScenarioMetrics, purchase_cost: f64, overhead: f64) -> Vec<WaterfallStep> {
    let step = |key: &str, measure, amount| WaterfallStep {
        label_key: key.to_string(),
        measure,
        amount,
    };
    vec![
        step("waterfall.sales_revenue", WaterfallMeasure::Relative, metrics.revenue),
        step("waterfall.product_cost", WaterfallMeasure::Relative, -purchase_cost),
        step("waterfall.overhead", WaterfallMeasure::Relative, -overhead),
        step("waterfall.net_profit", WaterfallMeasure::Total, metrics.profit),
    ]
}
