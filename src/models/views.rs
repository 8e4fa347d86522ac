//! Shapes handed to the rendering layer. Field names are bound directly by
//! the dashboard and must not change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::stage::FunnelStage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStageData {
    pub stage: FunnelStage,
    pub stage_label: String,
    pub count: u64,
    pub percentage_of_total: f64,
    /// Absent for the first stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_from_previous: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelResponse {
    pub stages: Vec<FunnelStageData>,
    pub total_leads: u64,
}

impl FunnelResponse {
    pub fn count(&self, stage: FunnelStage) -> u64 {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortHeatmap {
    pub cohort_labels: Vec<String>,
    pub week_labels: Vec<u32>,
    /// `[cohort][week]`; `None` marks a cell not yet observable.
    pub matrix: Vec<Vec<Option<f64>>>,
    pub stage: FunnelStage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub cohort_week: String,
    pub initial_leads: u64,
    /// stage -> week offset -> cumulative percentage, only at offsets where
    /// the cumulative count changed.
    pub conversions: BTreeMap<FunnelStage, BTreeMap<u32, f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub total_investment: f64,
    pub total_leads: u64,
    pub total_contacts: u64,
    pub total_appointments: u64,
    pub total_gross_sales: u64,
    pub total_closings: u64,
    pub cost_per_lead: f64,
    pub cost_per_contact: f64,
    pub cost_per_appointment: f64,
    pub cost_per_sale: f64,
    pub cost_per_closing: f64,
    pub conversion_lead_to_contact: f64,
    pub conversion_contact_to_appointment: f64,
    pub conversion_appointment_to_sale: f64,
    pub conversion_sale_to_closing: f64,
    pub overall_conversion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionTrendPoint {
    pub period: String,
    pub leads: u64,
    pub contacto: f64,
    pub cita: f64,
    pub venta_bruta: f64,
    pub escrituracion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionTrendResponse {
    pub data: Vec<ConversionTrendPoint>,
    pub period_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentLocation {
    pub name: String,
    pub city: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_leads: u64,
    pub total_sales: u64,
    pub total_closings: u64,
    pub conversion_rate: f64,
    pub total_investment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub desarrollos: Vec<String>,
    pub regiones: Vec<String>,
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    pub weeks: Vec<String>,
}
