// ==========================================
// 签证排期库存 - 数据表定位
// ==========================================
// 步骤 1: 选择数据工作表（跳过说明页）
// 步骤 2: 按 RowLayout 定位表头，生成表头键控行
// ==========================================

use crate::config::{IngestConfig, RowLayout};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::workbook::{CellValue, HeaderKeyedRow, Sheet, Workbook};
use tracing::{debug, warn};

// ==========================================
// LocatedSheet - 定位结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocatedSheet {
    pub sheet_name: String,
    pub rows: Vec<HeaderKeyedRow>,
}

pub struct WorkbookLocator;

impl WorkbookLocator {
    /// 定位数据表并读取表头键控行
    ///
    /// # 返回
    /// - Ok(LocatedSheet): 数据表名 + 行（可能为空）
    /// - Err(NoDataSheet): 除说明页外没有工作表
    /// - Err(NoHeaderRow): ScanForHeader 模式下未找到表头（可恢复）
    pub fn locate(workbook: &Workbook, config: &IngestConfig) -> ImportResult<LocatedSheet> {
        let sheet = Self::select_sheet(workbook, &config.excluded_sheet)?;

        let rows = match config.row_layout {
            RowLayout::FixedOffset { skip_rows } => sheet.header_rows(skip_rows),
            RowLayout::ScanForHeader => Self::scan_rows(sheet, &config.header_markers)?,
        };

        debug!(
            sheet = %sheet.name,
            layout = %config.row_layout,
            rows = rows.len(),
            "数据表定位完成"
        );

        Ok(LocatedSheet {
            sheet_name: sheet.name.clone(),
            rows,
        })
    }

    /// 第一个名称不等于说明页的工作表
    pub fn select_sheet<'a>(workbook: &'a Workbook, excluded: &str) -> ImportResult<&'a Sheet> {
        workbook
            .sheets
            .iter()
            .find(|s| s.name != excluded)
            .ok_or_else(|| ImportError::NoDataSheet {
                excluded: excluded.to_string(),
            })
    }

    /// 表头行下标（0 起）：第一行同时包含全部标记列名
    pub fn find_header_row(sheet: &Sheet, markers: &[String]) -> Option<usize> {
        sheet.grid.iter().position(|row| {
            markers
                .iter()
                .all(|marker| row.iter().any(|cell| cell.to_text() == marker.trim()))
        })
    }

    fn scan_rows(sheet: &Sheet, markers: &[String]) -> ImportResult<Vec<HeaderKeyedRow>> {
        let Some(header_idx) = Self::find_header_row(sheet, markers) else {
            warn!(sheet = %sheet.name, markers = ?markers, "未找到表头行");
            return Err(ImportError::NoHeaderRow {
                sheet: sheet.name.clone(),
            });
        };

        let headers: &[CellValue] = &sheet.grid[header_idx];
        Ok(sheet
            .grid
            .iter()
            .enumerate()
            .skip(header_idx + 1)
            .map(|(idx, row)| HeaderKeyedRow::from_positional(idx + 1, headers, row))
            .collect())
    }
}
