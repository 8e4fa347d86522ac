//! Reads the dashboard workbook.
//!
//! Sheets are taken by position (investment, developments, leads); their
//! titles are not relied upon.

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use std::path::Path;
use tracing::{debug, warn};

use super::sheet::{
    parse_developments, parse_investments, parse_leads, Sheet, DEVELOPMENTS_SHEET,
    INVESTMENT_SHEET, LEADS_SHEET,
};
use crate::error::{DashboardError, Result};
use crate::models::{Development, InvestmentRecord, LeadRecord};

pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Sheet order inside the workbook.
pub const SHEET_ORDER: [&str; 3] = [INVESTMENT_SHEET, DEVELOPMENTS_SHEET, LEADS_SHEET];

#[derive(Debug, Clone, Default)]
pub struct WorkbookData {
    pub investments: Vec<InvestmentRecord>,
    pub developments: Vec<Development>,
    pub leads: Vec<LeadRecord>,
}

/// Spreadsheet extension check; Excel lock files (`~$...`) are excluded.
pub fn is_workbook(path: &Path) -> bool {
    let locked = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"));
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WORKBOOK_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    known && !locked
}

pub fn read_workbook(path: &Path) -> Result<WorkbookData> {
    let workbook_error = |source: calamine::Error| DashboardError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    debug!(path = %path.display(), sheets = ?workbook.sheet_names(), "Opened workbook");

    let mut sheets = Vec::with_capacity(SHEET_ORDER.len());
    for (index, name) in SHEET_ORDER.into_iter().enumerate() {
        let range = workbook
            .worksheet_range_at(index)
            .ok_or(DashboardError::MissingSheet { index, sheet: name })?
            .map_err(workbook_error)?;
        let sheet = sheet_from_range(name, &range);
        if sheet.is_empty() {
            warn!(sheet = name, index, "Workbook sheet has no data rows");
        } else {
            debug!(sheet = name, index, rows = sheet.len(), "Read workbook sheet");
        }
        sheets.push(sheet);
    }

    Ok(WorkbookData {
        investments: parse_investments(&sheets[0])?,
        developments: parse_developments(&sheets[1])?,
        leads: parse_leads(&sheets[2])?,
    })
}

fn sheet_from_range(name: &'static str, range: &Range<Data>) -> Sheet {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    Sheet::new(name, headers, rows.collect())
}

/// Date cells become `YYYY-MM-DD` so they go through the same parsing as
/// CSV text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}
