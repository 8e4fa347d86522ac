//! Row parsing shared by the CSV and workbook readers.
//!
//! Header names vary between exports, so columns are found by normalized
//! name candidates rather than fixed positions. Dates that fail to parse are
//! treated as missing.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use super::text::normalize_header;
use crate::error::{DashboardError, Result};
use crate::models::{Development, InvestmentRecord, LeadRecord, Region};

pub const INVESTMENT_SHEET: &str = "investment";
pub const DEVELOPMENTS_SHEET: &str = "developments";
pub const LEADS_SHEET: &str = "leads";

const DEVELOPMENT_COLUMNS: &[&str] = &["desarrollo", "project", "proyecto"];
const REGION_COLUMNS: &[&str] = &["region", "zona"];

const LEAD_ID_COLUMNS: &[&str] = &["id_lead", "lead_id", "id"];
const REGISTERED_COLUMNS: &[&str] = &["fecha_registro", "fecha_de_registro", "registro"];
const CONTACT_COLUMNS: &[&str] = &["fecha_contacto", "fecha_de_contacto", "contacto"];
const APPOINTMENT_COLUMNS: &[&str] = &["fecha_cita", "fecha_de_cita", "cita"];
const GROSS_SALE_COLUMNS: &[&str] = &[
    "fecha_venta_bruta",
    "fecha_de_venta_bruta",
    "venta_bruta",
    "venta",
];
const CLOSING_COLUMNS: &[&str] = &[
    "fecha_escrituracion",
    "fecha_de_escrituracion",
    "escrituracion",
];

const DEVELOPMENT_NAME_COLUMNS: &[&str] = &["desarrollo", "nombre", "name"];
const CITY_COLUMNS: &[&str] = &["ciudad", "city"];
const LATITUDE_COLUMNS: &[&str] = &["latitud", "latitude", "lat"];
const LONGITUDE_COLUMNS: &[&str] = &["longitud", "longitude", "lng", "lon"];

const INVESTMENT_DATE_COLUMNS: &[&str] = &["fecha", "date"];
const AMOUNT_COLUMNS: &[&str] = &["inversion", "monto", "amount"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// One decoded sheet: normalized header row plus raw text cells.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: &'static str,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new<H: AsRef<str>>(
        name: &'static str,
        headers: impl IntoIterator<Item = H>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self {
            name,
            headers: headers.into_iter().map(|h| normalize_header(h.as_ref())).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact header match on any candidate first, then substring match in
    /// candidate order.
    pub fn find(&self, candidates: &[&str]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|c| self.headers.iter().position(|h| h == c))
            .or_else(|| {
                candidates
                    .iter()
                    .find_map(|c| self.headers.iter().position(|h| h.contains(c)))
            })
    }

    fn require(&self, candidates: &'static [&'static str]) -> Result<usize> {
        self.find(candidates).ok_or(DashboardError::MissingColumn {
            sheet: self.name,
            candidates,
        })
    }
}

fn cell(row: &[String], column: Option<usize>) -> Option<&str> {
    column
        .and_then(|i| row.get(i))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("nan") && !v.eq_ignore_ascii_case("null"))
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_developments(sheet: &Sheet) -> Result<Vec<Development>> {
    let name_col = sheet.find(DEVELOPMENT_NAME_COLUMNS).unwrap_or(0);
    let city_col = sheet.find(CITY_COLUMNS);
    let region_col = sheet.find(REGION_COLUMNS);
    let lat_col = sheet.find(LATITUDE_COLUMNS);
    let lon_col = sheet.find(LONGITUDE_COLUMNS);

    let developments: Vec<Development> = sheet
        .rows
        .iter()
        .filter_map(|row| {
            let name = cell(row, Some(name_col))?;
            Some(Development {
                name: name.to_string(),
                city: cell(row, city_col).unwrap_or_default().to_string(),
                region: cell(row, region_col).and_then(|r| r.parse::<Region>().ok()),
                latitude: cell(row, lat_col).and_then(|v| v.parse().ok()),
                longitude: cell(row, lon_col).and_then(|v| v.parse().ok()),
            })
        })
        .collect();

    debug!(sheet = sheet.name, count = developments.len(), "Parsed developments");
    Ok(developments)
}

pub fn parse_investments(sheet: &Sheet) -> Result<Vec<InvestmentRecord>> {
    let dev_col = sheet.require(DEVELOPMENT_COLUMNS)?;
    let date_col = sheet.require(INVESTMENT_DATE_COLUMNS)?;
    let amount_col = sheet.require(AMOUNT_COLUMNS)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in &sheet.rows {
        let parsed = (
            cell(row, Some(dev_col)),
            cell(row, Some(date_col)).and_then(parse_date),
            cell(row, Some(amount_col)).and_then(parse_amount),
        );
        match parsed {
            (Some(development), Some(date), Some(amount)) => records.push(InvestmentRecord {
                development: development.to_string(),
                date,
                amount,
            }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "Dropped investment rows without development, date or amount");
    }
    debug!(sheet = sheet.name, count = records.len(), "Parsed investment");
    Ok(records)
}

pub fn parse_leads(sheet: &Sheet) -> Result<Vec<LeadRecord>> {
    let dev_col = sheet.require(DEVELOPMENT_COLUMNS)?;
    let registered_col = sheet.require(REGISTERED_COLUMNS)?;
    let id_col = sheet.find(LEAD_ID_COLUMNS);
    let region_col = sheet.find(REGION_COLUMNS);
    let contact_col = sheet.find(CONTACT_COLUMNS);
    let appointment_col = sheet.find(APPOINTMENT_COLUMNS);
    let sale_col = sheet.find(GROSS_SALE_COLUMNS);
    let closing_col = sheet.find(CLOSING_COLUMNS);

    let date_at = |row: &[String], col: Option<usize>| cell(row, col).and_then(parse_date);

    let mut leads = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in sheet.rows.iter().enumerate() {
        let Some(registered_at) = date_at(row, Some(registered_col)) else {
            skipped += 1;
            continue;
        };

        leads.push(LeadRecord {
            id: cell(row, id_col)
                .map(str::to_string)
                .unwrap_or_else(|| (index + 1).to_string()),
            development: cell(row, Some(dev_col)).unwrap_or_default().to_string(),
            region: cell(row, region_col).and_then(|r| r.parse().ok()),
            registered_at,
            contacted_at: date_at(row, contact_col),
            appointment_at: date_at(row, appointment_col),
            gross_sale_at: date_at(row, sale_col),
            closing_at: date_at(row, closing_col),
        });
    }

    if skipped > 0 {
        warn!(skipped, "Dropped lead rows without a parseable registration date");
    }
    debug!(sheet = sheet.name, count = leads.len(), "Parsed leads");
    Ok(leads)
}
