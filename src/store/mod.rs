//! Immutable in-memory store of the loaded dataset.
//!
//! Built once at startup (or once per export run) and shared by reference
//! with every aggregator.

pub mod csv_loader;
pub mod geo;
pub mod sheet;
pub mod text;
pub mod workbook;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analytics::filter;
use crate::error::{DashboardError, Result};
use crate::models::{Development, FilterCriteria, InvestmentRecord, LeadRecord, Region};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    leads: Vec<LeadRecord>,
    developments: Vec<Development>,
    investments: Vec<InvestmentRecord>,
    region_by_development: HashMap<String, Region>,
    max_date: Option<NaiveDate>,
}

impl RecordStore {
    /// Leads without a region inherit the region of their development.
    pub fn new(
        mut leads: Vec<LeadRecord>,
        developments: Vec<Development>,
        investments: Vec<InvestmentRecord>,
    ) -> Self {
        let region_by_development: HashMap<String, Region> = developments
            .iter()
            .filter_map(|d| d.region.map(|r| (d.name.clone(), r)))
            .collect();

        for lead in leads.iter_mut().filter(|l| l.region.is_none()) {
            lead.region = region_by_development.get(&lead.development).copied();
        }

        let max_date = leads.iter().map(LeadRecord::latest_date).max();

        Self {
            leads,
            developments,
            investments,
            region_by_development,
            max_date,
        }
    }

    /// Load from a workbook file, a directory holding a workbook, or a
    /// directory of CSV sheets, in that order of preference.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_file() {
            return Self::load_workbook(path);
        }
        match find_workbook(path)? {
            Some(book) => Self::load_workbook(&book),
            None => Self::load_dir(path),
        }
    }

    /// Load the investment, developments and leads sheets (in that
    /// position) of a spreadsheet workbook.
    pub fn load_workbook(path: &Path) -> Result<Self> {
        let data = workbook::read_workbook(path)?;
        let store = Self::new(data.leads, data.developments, data.investments);
        store.log_loaded(path);
        Ok(store)
    }

    /// Load `leads.csv`, `developments.csv` and `investment.csv` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let open = |name: &str| -> Result<File> {
            let path = dir.join(name);
            if !path.exists() {
                return Err(DashboardError::MissingFile(path));
            }
            Ok(File::open(path)?)
        };

        let investments = csv_loader::read_investments(open(csv_loader::INVESTMENT_FILE)?)?;
        let developments = csv_loader::read_developments(open(csv_loader::DEVELOPMENTS_FILE)?)?;
        let leads = csv_loader::read_leads(open(csv_loader::LEADS_FILE)?)?;

        let store = Self::new(leads, developments, investments);
        store.log_loaded(dir);
        Ok(store)
    }

    fn log_loaded(&self, source: &Path) {
        info!(
            leads = self.leads.len(),
            developments = self.developments.len(),
            investments = self.investments.len(),
            source = %source.display(),
            "Record store loaded"
        );
    }

    pub fn leads(&self) -> &[LeadRecord] {
        &self.leads
    }

    pub fn developments(&self) -> &[Development] {
        &self.developments
    }

    pub fn investments(&self) -> &[InvestmentRecord] {
        &self.investments
    }

    pub fn region_of(&self, development: &str) -> Option<Region> {
        self.region_by_development.get(development).copied()
    }

    /// Latest date carried by any lead record.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.max_date
    }

    pub fn filtered_leads<'a>(
        &'a self,
        criteria: &'a FilterCriteria,
    ) -> impl Iterator<Item = &'a LeadRecord> + 'a {
        self.leads.iter().filter(move |l| filter::matches(l, criteria))
    }

    pub fn filtered_investments<'a>(
        &'a self,
        criteria: &'a FilterCriteria,
    ) -> impl Iterator<Item = &'a InvestmentRecord> + 'a {
        self.investments.iter().filter(move |inv| {
            filter::matches_investment(inv, self.region_of(&inv.development), criteria)
        })
    }
}

/// First workbook in `dir` by file name, if any.
fn find_workbook(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Err(DashboardError::MissingFile(dir.to_path_buf()));
    }
    let mut books: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && workbook::is_workbook(p))
        .collect();
    books.sort();
    Ok(books.into_iter().next())
}
