use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::stage::FunnelStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Norte,
    Centro,
    Sur,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Norte, Region::Centro, Region::Sur];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Norte => "Norte",
            Region::Centro => "Centro",
            Region::Sur => "Sur",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "norte" => Ok(Region::Norte),
            "centro" => Ok(Region::Centro),
            "sur" => Ok(Region::Sur),
            other => Err(format!("unknown region `{other}`")),
        }
    }
}

/// One prospect and the dates at which it reached each stage.
///
/// The loader does not enforce stage ordering; consumers go through
/// [`LeadRecord::reached`] which applies sequential gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub development: String,
    pub region: Option<Region>,
    pub registered_at: NaiveDate,
    pub contacted_at: Option<NaiveDate>,
    pub appointment_at: Option<NaiveDate>,
    pub gross_sale_at: Option<NaiveDate>,
    pub closing_at: Option<NaiveDate>,
}

impl LeadRecord {
    pub fn new(id: impl Into<String>, development: impl Into<String>, registered_at: NaiveDate) -> Self {
        Self {
            id: id.into(),
            development: development.into(),
            region: None,
            registered_at,
            contacted_at: None,
            appointment_at: None,
            gross_sale_at: None,
            closing_at: None,
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_contact(mut self, date: NaiveDate) -> Self {
        self.contacted_at = Some(date);
        self
    }

    pub fn with_appointment(mut self, date: NaiveDate) -> Self {
        self.appointment_at = Some(date);
        self
    }

    pub fn with_gross_sale(mut self, date: NaiveDate) -> Self {
        self.gross_sale_at = Some(date);
        self
    }

    pub fn with_closing(mut self, date: NaiveDate) -> Self {
        self.closing_at = Some(date);
        self
    }

    /// Raw date stored for `stage`, ungated.
    pub fn stage_date(&self, stage: FunnelStage) -> Option<NaiveDate> {
        match stage {
            FunnelStage::Lead => Some(self.registered_at),
            FunnelStage::Contacto => self.contacted_at,
            FunnelStage::Cita => self.appointment_at,
            FunnelStage::VentaBruta => self.gross_sale_at,
            FunnelStage::Escrituracion => self.closing_at,
        }
    }

    /// Date at which the lead reached `stage`, or `None` when that stage or
    /// any earlier one is missing.
    pub fn reached(&self, stage: FunnelStage) -> Option<NaiveDate> {
        let mut date = None;
        for s in &FunnelStage::ALL[..=stage.index()] {
            date = Some(self.stage_date(*s)?);
        }
        date
    }

    /// Furthest stage reached under gating. Every lead is at least `Lead`.
    pub fn deepest_stage(&self) -> FunnelStage {
        FunnelStage::ALL
            .into_iter()
            .take_while(|s| self.stage_date(*s).is_some())
            .last()
            .unwrap_or(FunnelStage::Lead)
    }

    /// ISO week label of the registration date (`YYYY-Www`).
    pub fn cohort_week(&self) -> String {
        iso_week_label(self.registered_at)
    }

    /// Calendar month of the registration date (`YYYY-MM`).
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.registered_at.year(), self.registered_at.month())
    }

    /// Latest date carried by any field of the record.
    pub fn latest_date(&self) -> NaiveDate {
        FunnelStage::ALL
            .into_iter()
            .filter_map(|s| self.stage_date(s))
            .max()
            .unwrap_or(self.registered_at)
    }
}

pub fn iso_week_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Development {
    pub name: String,
    pub city: String,
    pub region: Option<Region>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub development: String,
    pub date: NaiveDate,
    pub amount: f64,
}
