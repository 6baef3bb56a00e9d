// ==========================================
// 清货清单分析 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / Excel (.xlsx/.xls)
// 输出: RawTable（表头 TRIM，单元格保留原始类型）
// ==========================================

use crate::domain::manifest::{RawCell, RawTable, UploadedFile};
use crate::domain::types::FileFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::manifest_loader_trait::ManifestParser;
use crate::importer::value_normalizer::decode_bytes;
use calamine::{Data, Range, Reader, Sheets, Xls, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use tracing::debug;

/// UTF-8 BOM
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// ZIP 文件头（xlsx）
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// OLE 复合文档头（xls）
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// CSV 中按缺失值读取的标记
pub const CSV_NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ==========================================
// 格式识别
// ==========================================

/// 按扩展名识别格式，扩展名未知时按文件头嗅探
pub fn detect_format(file: &UploadedFile) -> ImportResult<FileFormat> {
    let ext = file.extension();
    match ext.as_str() {
        "csv" => Ok(FileFormat::Csv),
        "xlsx" | "xlsm" => Ok(FileFormat::Xlsx),
        "xls" => Ok(FileFormat::Xls),
        _ if file.content.starts_with(ZIP_MAGIC) => Ok(FileFormat::Xlsx),
        _ if file.content.starts_with(OLE_MAGIC) => Ok(FileFormat::Xls),
        _ if ext.is_empty() => Err(ImportError::UnsupportedFormat(file.name.clone())),
        _ => Err(ImportError::UnsupportedFormat(format!(".{}", ext))),
    }
}

/// 表头标准化: TRIM；空表头命名为 "Unnamed: N"；重复表头追加 ".1" ".2" …
pub fn normalize_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, h)| {
            let trimmed = h.as_ref().trim();
            let base = if trimmed.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                trimmed.to_string()
            };

            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 去除 BOM 后按 UTF-8 解码，失败回退 Latin-1
    pub fn decode_text(content: &[u8]) -> String {
        let body = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        if std::str::from_utf8(body).is_err() {
            debug!("CSV 非 UTF-8 编码，回退 Latin-1 解码");
        }
        decode_bytes(body)
    }

    fn csv_cell(value: &str) -> RawCell {
        if CSV_NA_MARKERS.contains(&value) {
            RawCell::Missing
        } else {
            RawCell::Text(value.to_string())
        }
    }
}

impl ManifestParser for CsvParser {
    fn parse_table(&self, file: &UploadedFile) -> ImportResult<RawTable> {
        let text = Self::decode_text(&file.content);
        if text.trim().is_empty() {
            return Err(ImportError::EmptyFile(file.name.clone()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 短行补齐，长行报错
            .from_reader(text.as_bytes());

        // 读取表头
        let headers = normalize_headers(reader.headers()?.iter());
        let width = headers.len();

        // 读取所有行
        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() > width {
                return Err(ImportError::CsvParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    row_idx + 2,
                    record.len()
                )));
            }

            let mut row: Vec<RawCell> = record.iter().map(Self::csv_cell).collect();
            row.resize(width, RawCell::Missing);
            rows.push(row);
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn open(file: &UploadedFile) -> ImportResult<Sheets<Cursor<Vec<u8>>>> {
        let cursor = Cursor::new(file.content.clone());
        match detect_format(file)? {
            FileFormat::Xlsx => Ok(Sheets::Xlsx(Xlsx::new(cursor)?)),
            FileFormat::Xls => Ok(Sheets::Xls(Xls::new(cursor)?)),
            FileFormat::Csv => Err(ImportError::UnsupportedFormat(file.name.clone())),
        }
    }

    fn excel_cell(cell: &Data) -> RawCell {
        match cell {
            Data::Empty => RawCell::Missing,
            Data::String(s) => RawCell::Text(s.clone()),
            Data::Float(f) => RawCell::Number(*f),
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Bool(b) => RawCell::Number(if *b { 1.0 } else { 0.0 }),
            // 日期 / 时长 / 错误值: 以显示文本交给标准化流程
            other => RawCell::Text(other.to_string()),
        }
    }

    fn range_to_table(range: &Range<Data>) -> ImportResult<RawTable> {
        let mut rows_iter = range.rows();
        let header_row = rows_iter
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("No columns to parse from file".to_string()))?;

        let headers = normalize_headers(header_row.iter().map(|cell| match cell {
            Data::Empty => String::new(),
            other => other.to_string(),
        }));

        let rows = rows_iter
            .map(|row| row.iter().map(Self::excel_cell).collect())
            .collect();

        Ok(RawTable { headers, rows })
    }
}

impl ManifestParser for ExcelParser {
    fn parse_table(&self, file: &UploadedFile) -> ImportResult<RawTable> {
        let mut workbook = Self::open(file)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Workbook has no worksheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        debug!(sheet = %sheet_name, height = range.height(), width = range.width(), "读取工作表");

        Self::range_to_table(&range)
    }
}

// ==========================================
// 通用文件解析器（根据格式自动选择）
// ==========================================
pub struct UniversalFileParser;

impl ManifestParser for UniversalFileParser {
    fn parse_table(&self, file: &UploadedFile) -> ImportResult<RawTable> {
        match detect_format(file)? {
            FileFormat::Csv => CsvParser.parse_table(file),
            FileFormat::Xlsx | FileFormat::Xls => ExcelParser.parse_table(file),
        }
    }
}
