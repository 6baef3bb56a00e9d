// ==========================================
// 清货清单分析 - 清单导入 Trait
// ==========================================
// 职责: 定义清单导入接口（不包含实现）
// 管道: 文件解析 → 表头匹配 → 单元格标准化 → 聚合
// ==========================================

use crate::domain::manifest::{ManifestSummary, RawTable, UploadedFile};
use crate::importer::column_resolver::ResolvedColumns;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::error;

// ==========================================
// ManifestLoader Trait
// ==========================================
// 用途: 清单导入主接口
// 实现者: ManifestLoaderImpl
#[async_trait]
pub trait ManifestLoader: Send + Sync {
    /// 导入单个文件
    ///
    /// # 返回
    /// - ManifestSummary: 状态为 OK / ERROR / CRITICAL_ERROR 之一，永不返回 Err
    fn load_manifest(&self, file: &UploadedFile) -> ManifestSummary;

    /// 顺序导入一批文件
    ///
    /// # 说明
    /// - 每个输入文件对应一条汇总，顺序与输入一致
    /// - 单个文件失败不影响其他文件
    /// - 解析过程 panic 转换为该文件的 CRITICAL_ERROR
    fn load_manifests(&self, files: &[UploadedFile]) -> Vec<ManifestSummary> {
        files
            .iter()
            .map(|file| {
                panic::catch_unwind(AssertUnwindSafe(|| self.load_manifest(file))).unwrap_or_else(
                    |payload| {
                        let message = panic_message(payload.as_ref());
                        error!(file = %file.name, error = %message, "导入过程异常终止");
                        ManifestSummary::critical(&file.name, message)
                    },
                )
            })
            .collect()
    }

    /// 并发导入一批文件（每个文件一个阻塞任务）
    ///
    /// # 说明
    /// - 结果按输入顺序返回
    /// - 任务异常（panic）转换为该文件的 CRITICAL_ERROR
    async fn batch_load(&self, files: Vec<UploadedFile>) -> Vec<ManifestSummary>;

    /// 从磁盘路径并发导入
    ///
    /// # 说明
    /// - 读取失败的文件记为 CRITICAL_ERROR
    async fn load_paths(&self, paths: Vec<PathBuf>) -> Vec<ManifestSummary>;
}

// ==========================================
// ManifestParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait ManifestParser: Send + Sync {
    /// 解析文件为二维表（表头已 TRIM）
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 原始单元格
    /// - Err: 解码错误、格式错误、结构错误
    fn parse_table(&self, file: &UploadedFile) -> ImportResult<RawTable>;
}

// ==========================================
// ColumnResolver Trait
// ==========================================
// 用途: 表头模糊匹配接口
// 实现者: HeaderColumnResolver
pub trait ColumnResolver: Send + Sync {
    /// 定位 数量 / 零售价 / 成本 / 描述 列
    ///
    /// # 返回
    /// - Ok(ResolvedColumns): 三个必需列均已匹配
    /// - Err(ImportError::MissingColumns): 任一必需列缺失，附带实际表头
    fn resolve(&self, headers: &[String]) -> ImportResult<ResolvedColumns>;
}

/// 提取 panic 负载中的文本
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("Manifest loader panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("Manifest loader panicked: {}", msg)
    } else {
        "Manifest loader panicked".to_string()
    }
}
