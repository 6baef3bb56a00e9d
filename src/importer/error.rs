// ==========================================
// 清货清单分析 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 错误文本会作为 CRITICAL_ERROR 的 details 返回给用户
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("Unsupported file format: {0} (expected .csv/.xlsx/.xls)")]
    UnsupportedFormat(String),

    #[error("File read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("Empty file: {0}")]
    EmptyFile(String),

    // ===== 列匹配错误 =====
    #[error("Missing columns. Found: {}", format_headers(.found))]
    MissingColumns { found: Vec<String> },
}

/// 以列表形式展示表头: ['Name', 'Price']
pub fn format_headers(headers: &[String]) -> String {
    let quoted: Vec<String> = headers.iter().map(|h| format!("'{}'", h)).collect();
    format!("[{}]", quoted.join(", "))
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<calamine::XlsError> for ImportError {
    fn from(err: calamine::XlsError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
