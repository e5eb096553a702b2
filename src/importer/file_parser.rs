// ==========================================
// 签证排期库存 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb/.ods) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::inventory_importer_trait::WorkbookParser;
use crate::importer::workbook::{CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
// CSV 视为只有一个工作表的工作簿，表名取文件名主干
pub struct CsvParser;

impl WorkbookParser for CsvParser {
    fn parse_workbook(&self, file_name: &str, bytes: &[u8]) -> ImportResult<Workbook> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut grid = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|value| {
                    if value.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::text(value)
                    }
                })
                .collect();
            grid.push(row);
        }

        let sheet_name = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();

        debug!(file = %file_name, rows = grid.len(), "CSV 解析完成");
        Ok(Workbook::new(vec![Sheet::new(sheet_name, grid)]))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl WorkbookParser for ExcelParser {
    fn parse_workbook(&self, file_name: &str, bytes: &[u8]) -> ImportResult<Workbook> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            match workbook.worksheet_range(&name) {
                Ok(range) => sheets.push(Sheet::new(name, range_to_grid(&range))),
                Err(e) => {
                    // 图表页等无法读取的表按空表保留，保证表序不变
                    warn!(file = %file_name, sheet = %name, error = %e, "工作表读取失败");
                    sheets.push(Sheet::new(name, Vec::new()));
                }
            }
        }

        debug!(file = %file_name, sheets = sheets.len(), "Excel 解析完成");
        Ok(Workbook::new(sheets))
    }
}

/// calamine 的 Range 从首个非空单元格开始，这里补齐为绝对坐标
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Vec<Vec<CellValue>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_from_data));
        grid.push(cells);
    }
    grid
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl WorkbookParser for UniversalFileParser {
    fn parse_workbook(&self, file_name: &str, bytes: &[u8]) -> ImportResult<Workbook> {
        let ext = extension_of(file_name);
        match ext.as_str() {
            "csv" => CsvParser.parse_workbook(file_name, bytes),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.parse_workbook(file_name, bytes),
            "" => Err(ImportError::UnsupportedFormat(file_name.to_string())),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
