// ==========================================
// 清货清单分析 - 清单导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到汇总
// 流程: 解析 → 表头匹配 → 列门禁 → 行清洗 → 聚合
// 隔离: 每个文件独立成败，永不向调用方抛错
// ==========================================

use crate::domain::manifest::{
    display_name, ManifestRow, ManifestSummary, RawCell, RawTable, UploadedFile,
};
use crate::i18n::t_with_args;
use crate::importer::column_resolver::{HeaderColumnResolver, ResolvedColumns};
use crate::importer::error::{format_headers, ImportError};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::manifest_loader_trait::{ColumnResolver, ManifestLoader, ManifestParser};
use crate::importer::value_normalizer::{clean_numeric, decode_bytes};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// ManifestLoaderImpl - 清单导入器实现
// ==========================================
#[derive(Clone)]
pub struct ManifestLoaderImpl {
    file_parser: Arc<dyn ManifestParser>,
    column_resolver: Arc<dyn ColumnResolver>,
}

impl ManifestLoaderImpl {
    /// 创建新的 ManifestLoader 实例
    ///
    /// # 参数
    /// - file_parser: 文件解析器
    /// - column_resolver: 表头匹配器
    pub fn new(file_parser: Arc<dyn ManifestParser>, column_resolver: Arc<dyn ColumnResolver>) -> Self {
        Self {
            file_parser,
            column_resolver,
        }
    }
}

impl Default for ManifestLoaderImpl {
    fn default() -> Self {
        Self::new(Arc::new(UniversalFileParser), Arc::new(HeaderColumnResolver))
    }
}

#[async_trait::async_trait]
impl ManifestLoader for ManifestLoaderImpl {
    #[instrument(skip(self, file), fields(file = %file.name))]
    fn load_manifest(&self, file: &UploadedFile) -> ManifestSummary {
        // === 步骤 1: 解析文件 ===
        let table = match self.file_parser.parse_table(file) {
            Ok(table) => table,
            Err(e) => {
                error!(error = %e, "文件解析失败");
                return ManifestSummary::critical(&file.name, e.to_string());
            }
        };
        debug!(
            columns = table.headers.len(),
            rows = table.row_count(),
            "文件解析完成"
        );

        // === 步骤 2: 表头匹配 + 列门禁 ===
        let resolved = match self.column_resolver.resolve(&table.headers) {
            Ok(resolved) => resolved,
            Err(ImportError::MissingColumns { found }) => {
                warn!(headers = %format_headers(&found), "必需列缺失");
                return ManifestSummary::error(&file.name, missing_columns_details(&found));
            }
            Err(e) => {
                error!(error = %e, "表头匹配失败");
                return ManifestSummary::critical(&file.name, e.to_string());
            }
        };

        // === 步骤 3: 行清洗 ===
        let rows = clean_rows(&table, &resolved);

        // === 步骤 4: 聚合 ===
        let summary = ManifestSummary::ok(&file.name, resolved.mapping, rows);
        info!(
            items = summary.total_items,
            variety = summary.variety_count,
            total_cost = summary.total_cost,
            total_retail = summary.total_retail,
            "清单导入完成"
        );

        summary
    }

    async fn batch_load(&self, files: Vec<UploadedFile>) -> Vec<ManifestSummary> {
        info!(count = files.len(), "开始批量导入清单");

        let tasks = files
            .into_iter()
            .map(|file| load_on_blocking_pool(self.clone(), file));
        let summaries = join_all(tasks).await;

        log_batch_outcome(&summaries);
        summaries
    }

    async fn load_paths(&self, paths: Vec<PathBuf>) -> Vec<ManifestSummary> {
        info!(count = paths.len(), "开始从磁盘导入清单");

        let tasks = paths
            .into_iter()
            .map(|path| load_path_on_blocking_pool(self.clone(), path));
        let summaries = join_all(tasks).await;

        log_batch_outcome(&summaries);
        summaries
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 在阻塞线程池中导入单个文件；任务异常转为 CRITICAL_ERROR
async fn load_on_blocking_pool(loader: ManifestLoaderImpl, file: UploadedFile) -> ManifestSummary {
    let filename = file.name.clone();
    run_on_blocking_pool(filename, move || loader.load_manifest(&file)).await
}

/// 在阻塞线程池中读取并导入磁盘文件；读取失败记为 CRITICAL_ERROR
async fn load_path_on_blocking_pool(loader: ManifestLoaderImpl, path: PathBuf) -> ManifestSummary {
    let filename = display_name(&path);
    run_on_blocking_pool(filename, move || match UploadedFile::from_path(&path) {
        Ok(file) => loader.load_manifest(&file),
        Err(e) => {
            error!(path = %path.display(), error = %e, "文件读取失败");
            ManifestSummary::critical(display_name(&path), ImportError::from(e).to_string())
        }
    })
    .await
}

async fn run_on_blocking_pool<F>(filename: String, job: F) -> ManifestSummary
where
    F: FnOnce() -> ManifestSummary + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(file = %filename, error = %e, "导入任务异常终止");
            ManifestSummary::critical(filename, e.to_string())
        }
    }
}

fn log_batch_outcome(summaries: &[ManifestSummary]) {
    info!(
        total = summaries.len(),
        ok = summaries.iter().filter(|s| s.is_ok()).count(),
        failed = summaries.iter().filter(|s| !s.is_ok()).count(),
        "批量导入完成"
    );
}

/// ERROR 状态的诊断信息，列出文件实际表头
pub fn missing_columns_details(found: &[String]) -> String {
    t_with_args(
        "loader.missing_columns",
        &[("found", format_headers(found).as_str())],
    )
}

/// 对三个必需列逐行标准化并转为数值，无法转换的单元格计 0
pub fn clean_rows(table: &RawTable, columns: &ResolvedColumns) -> Vec<ManifestRow> {
    (0..table.row_count())
        .map(|row| {
            let quantity = clean_numeric(table.cell(row, columns.quantity));
            let unit_retail = clean_numeric(table.cell(row, columns.retail));
            let extended_cost = clean_numeric(table.cell(row, columns.cost));
            let description = columns
                .description
                .and_then(|col| description_text(table.cell(row, col)));

            ManifestRow::new(row + 1, description, quantity, unit_retail, extended_cost)
        })
        .collect()
}

fn description_text(cell: RawCell) -> Option<String> {
    let text = match cell {
        RawCell::Missing => return None,
        RawCell::Text(s) => s,
        RawCell::Bytes(b) => decode_bytes(&b),
        RawCell::Number(v) if v.is_nan() => return None,
        RawCell::Number(v) => v.to_string(),
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ManifestStatus;
    use crate::importer::error::ImportResult;

    fn csv(name: &str, body: &str) -> UploadedFile {
        UploadedFile::new(name, body.as_bytes().to_vec())
    }

    #[test]
    fn test_load_manifest_ok() {
        let file = csv(
            "lot.csv",
            "Item Description,Qty,Unit Retail,Ext. Retail\n\
             Blender,10,$5.00,$20.00\n\
             Toaster,5,$10.00,$20.00\n",
        );
        let summary = ManifestLoaderImpl::default().load_manifest(&file);

        assert_eq!(summary.status, ManifestStatus::Ok);
        assert!(summary.details.is_empty());
        assert_eq!(summary.total_items, 15.0);
        assert_eq!(summary.variety_count, 2);
        assert_eq!(summary.total_retail, 100.0);
        assert_eq!(summary.total_cost, 40.0);
        assert_eq!(summary.rows[0].description.as_deref(), Some("Blender"));
        assert_eq!(summary.rows[1].row_number, 2);
    }

    #[test]
    fn test_load_manifest_dirty_cells_count_as_zero() {
        let file = csv(
            "dirty.csv",
            "Qty,Unit Retail,Ext Cost\n\
             two,$5.00,$1.00\n\
             3,(abc),--\n\
             4,\"$1,000.00\",\"(2.50)\"\n",
        );
        let summary = ManifestLoaderImpl::default().load_manifest(&file);

        assert_eq!(summary.status, ManifestStatus::Ok);
        assert_eq!(summary.total_items, 7.0);
        assert_eq!(summary.variety_count, 2);
        assert_eq!(summary.total_retail, 4000.0);
        assert_eq!(summary.total_cost, -1.5);
    }

    #[test]
    fn test_load_manifest_missing_columns() {
        let summary = ManifestLoaderImpl::default().load_manifest(&csv("names.csv", "Name,Price\nA,1\n"));

        assert_eq!(summary.status, ManifestStatus::Error);
        assert!(summary.details.contains("'Name'"));
        assert!(summary.details.contains("'Price'"));
        assert_eq!(summary.total_items, 0.0);
        assert_eq!(summary.total_retail, 0.0);
        assert!(summary.rows.is_empty());
    }

    #[test]
    fn test_load_manifest_parse_failure() {
        let file = UploadedFile::new("broken.xlsx", b"garbage".to_vec());
        let summary = ManifestLoaderImpl::default().load_manifest(&file);

        assert_eq!(summary.status, ManifestStatus::CriticalError);
        assert!(!summary.details.is_empty());
        assert_eq!(summary.variety_count, 0);
    }

    struct PanickingParser;

    impl ManifestParser for PanickingParser {
        fn parse_table(&self, _file: &UploadedFile) -> ImportResult<RawTable> {
            panic!("corrupt sector table");
        }
    }

    struct RejectingResolver;

    impl ColumnResolver for RejectingResolver {
        fn resolve(&self, _headers: &[String]) -> ImportResult<ResolvedColumns> {
            Err(ImportError::EmptyFile("no header row".to_string()))
        }
    }

    #[test]
    fn test_load_manifests_isolates_parser_panic() {
        let loader = ManifestLoaderImpl::new(Arc::new(PanickingParser), Arc::new(HeaderColumnResolver));
        let summaries = loader.load_manifests(&[csv("a.csv", "Qty\n1\n"), csv("b.csv", "Qty\n2\n")]);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].filename, "a.csv");
        assert_eq!(summaries[1].filename, "b.csv");
        for summary in &summaries {
            assert_eq!(summary.status, ManifestStatus::CriticalError);
            assert!(summary.details.contains("corrupt sector table"));
        }
    }

    #[tokio::test]
    async fn test_batch_load_isolates_parser_panic() {
        let loader = ManifestLoaderImpl::new(Arc::new(PanickingParser), Arc::new(HeaderColumnResolver));
        let summaries = loader.batch_load(vec![csv("a.csv", "Qty\n1\n")]).await;

        assert_eq!(summaries[0].status, ManifestStatus::CriticalError);
        assert_eq!(summaries[0].filename, "a.csv");
    }

    #[test]
    fn test_resolver_failure_other_than_missing_columns_is_critical() {
        let loader = ManifestLoaderImpl::new(Arc::new(UniversalFileParser), Arc::new(RejectingResolver));
        let summary = loader.load_manifest(&csv("lot.csv", "Qty,Unit Retail,Ext. Retail\n1,2,3\n"));

        assert_eq!(summary.status, ManifestStatus::CriticalError);
        assert!(summary.details.contains("no header row"));
        assert!(summary.rows.is_empty());
    }

    #[tokio::test]
    async fn test_load_paths_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("lot.csv");
        std::fs::write(&good, "Qty,Unit Retail,Ext. Retail\n2,$3.00,$6.00\n").unwrap();
        let missing = dir.path().join("gone.csv");

        let summaries = ManifestLoaderImpl::default()
            .load_paths(vec![good, missing])
            .await;

        assert_eq!(summaries[0].filename, "lot.csv");
        assert_eq!(summaries[0].status, ManifestStatus::Ok);
        assert_eq!(summaries[0].total_retail, 6.0);
        assert_eq!(summaries[1].filename, "gone.csv");
        assert_eq!(summaries[1].status, ManifestStatus::CriticalError);
        assert!(summaries[1].details.starts_with("File read failed"));
    }

    #[test]
    fn test_description_text() {
        assert_eq!(description_text(RawCell::Missing), None);
        assert_eq!(description_text(RawCell::from("  ")), None);
        assert_eq!(description_text(RawCell::from(" Lamp ")), Some("Lamp".to_string()));
        assert_eq!(description_text(RawCell::Number(12345.0)), Some("12345".to_string()));
    }
}
