// ==========================================
// 清货清单分析 - 分析API
// ==========================================
// 职责: 一次分析 = 批量导入清单 + 场景计算
// 流程: 参数校验 → 批量导入 → 单批次指标 → 组合指标
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::RESALE_PCT_RANGE;
use crate::domain::manifest::{ManifestSummary, UploadedFile};
use crate::engine::{PackageMetrics, PortfolioMetrics, ScenarioEngine, ScenarioParams};
use crate::importer::{ManifestLoader, ManifestLoaderImpl};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 分析报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// 分析会话ID
    pub session_id: String,
    /// 生成时间
    pub generated_at: DateTime<Utc>,
    /// 场景参数
    pub params: ScenarioParams,
    /// 每个输入文件一条汇总（含失败文件），顺序与输入一致
    pub manifests: Vec<ManifestSummary>,
    /// OK 文件的单批次指标
    pub packages: Vec<PackageMetrics>,
    /// 组合指标（无 OK 文件时为空）
    pub portfolio: Option<PortfolioMetrics>,
}

impl AnalysisReport {
    pub fn valid_count(&self) -> usize {
        self.manifests.iter().filter(|m| m.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ManifestSummary> {
        self.manifests.iter().filter(|m| !m.is_ok())
    }

    pub fn to_json_pretty(&self) -> ApiResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 分析API
pub struct AnalysisApi<L = ManifestLoaderImpl>
where
    L: ManifestLoader,
{
    loader: L,
    engine: ScenarioEngine,
}

impl Default for AnalysisApi<ManifestLoaderImpl> {
    fn default() -> Self {
        Self::new(ManifestLoaderImpl::default())
    }
}

impl<L> AnalysisApi<L>
where
    L: ManifestLoader,
{
    /// 创建新的AnalysisApi实例
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            engine: ScenarioEngine,
        }
    }

    /// 分析内存中的上传文件
    ///
    /// # 返回
    /// - Ok(AnalysisReport): 分析报告（单个文件失败不影响返回）
    /// - Err(ApiError::InvalidInput): 未提供文件或场景参数非法
    #[instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn analyze_files(
        &self,
        files: Vec<UploadedFile>,
        params: ScenarioParams,
    ) -> ApiResult<AnalysisReport> {
        validate_params(&params)?;
        if files.is_empty() {
            return Err(ApiError::InvalidInput("no manifest files provided".to_string()));
        }

        let manifests = self.loader.batch_load(files).await;
        Ok(self.build_report(manifests, params))
    }

    /// 分析磁盘上的文件
    #[instrument(skip(self, paths), fields(file_count = paths.len()))]
    pub async fn analyze_paths(
        &self,
        paths: Vec<PathBuf>,
        params: ScenarioParams,
    ) -> ApiResult<AnalysisReport> {
        validate_params(&params)?;
        if paths.is_empty() {
            return Err(ApiError::InvalidInput("no manifest files provided".to_string()));
        }

        let manifests = self.loader.load_paths(paths).await;
        Ok(self.build_report(manifests, params))
    }

    /// 在新的场景参数下重新计算，不重新解析文件
    pub fn rescore(&self, report: &AnalysisReport, params: ScenarioParams) -> ApiResult<AnalysisReport> {
        validate_params(&params)?;
        Ok(self.build_report(report.manifests.clone(), params))
    }

    fn build_report(&self, manifests: Vec<ManifestSummary>, params: ScenarioParams) -> AnalysisReport {
        let packages = self.engine.packages(&manifests, &params);
        let portfolio = self.engine.portfolio(&manifests, &params);

        let report = AnalysisReport {
            session_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            params,
            manifests,
            packages,
            portfolio,
        };

        if report.portfolio.is_none() {
            warn!(files = report.manifests.len(), "没有可处理的有效文件");
        }
        info!(
            session_id = %report.session_id,
            valid = report.valid_count(),
            total = report.manifests.len(),
            "分析完成"
        );

        report
    }
}

/// 场景参数校验
pub fn validate_params(params: &ScenarioParams) -> ApiResult<()> {
    let min = f64::from(*RESALE_PCT_RANGE.start());
    let max = f64::from(*RESALE_PCT_RANGE.end());
    if !(min..=max).contains(&params.resale_pct) {
        return Err(ApiError::InvalidInput(format!(
            "resale percentage must be between {} and {}, got {}",
            min, max, params.resale_pct
        )));
    }

    for (name, value) in [
        ("freight per lot", params.freight_per_lot),
        ("misc per lot", params.misc_per_lot),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "{} must be a non-negative amount, got {}",
                name, value
            )));
        }
    }

    Ok(())
}
