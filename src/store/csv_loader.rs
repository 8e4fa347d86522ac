//! Reads the three dashboard sheets exported as CSV.
//!
//! Excel on Windows exports CSV as Windows-1252, so input that is not valid
//! UTF-8 is decoded as Windows-1252 instead of being rejected.

use encoding_rs::WINDOWS_1252;
use std::io::Read;
use tracing::warn;

use super::sheet::{
    parse_developments, parse_investments, parse_leads, Sheet, DEVELOPMENTS_SHEET,
    INVESTMENT_SHEET, LEADS_SHEET,
};
use crate::error::{DashboardError, Result};
use crate::models::{Development, InvestmentRecord, LeadRecord};

pub const LEADS_FILE: &str = "leads.csv";
pub const DEVELOPMENTS_FILE: &str = "developments.csv";
pub const INVESTMENT_FILE: &str = "investment.csv";

/// UTF-8 when valid, Windows-1252 otherwise.
pub fn decode_text(sheet: &'static str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(sheet, "Sheet is not UTF-8, decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(err.as_bytes());
            text.into_owned()
        }
    }
}

pub fn read_sheet<R: Read>(name: &'static str, mut input: R) -> Result<Sheet> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let text = decode_text(name, bytes);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|source| DashboardError::Csv { sheet: name, source })?
        .clone();
    let rows = rdr
        .records()
        .map(|row| {
            row.map(|r| r.iter().map(str::to_string).collect())
                .map_err(|source| DashboardError::Csv { sheet: name, source })
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok(Sheet::new(name, &headers, rows))
}

pub fn read_developments<R: Read>(input: R) -> Result<Vec<Development>> {
    parse_developments(&read_sheet(DEVELOPMENTS_SHEET, input)?)
}

pub fn read_investments<R: Read>(input: R) -> Result<Vec<InvestmentRecord>> {
    parse_investments(&read_sheet(INVESTMENT_SHEET, input)?)
}

pub fn read_leads<R: Read>(input: R) -> Result<Vec<LeadRecord>> {
    parse_leads(&read_sheet(LEADS_SHEET, input)?)
}
