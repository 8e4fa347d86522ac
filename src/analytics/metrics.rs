//! Investment and conversion KPIs.

use crate::models::{FunnelStage, InvestmentRecord, LeadRecord, MetricsResponse};

use super::funnel::StageCounts;
use super::ratio::{percentage, round_to, safe_div};

pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Compute KPIs over already-filtered leads and investment rows.
    /// Money and rates are rounded to `decimals` places.
    pub fn aggregate<'a, 'b>(
        records: impl IntoIterator<Item = &'a LeadRecord>,
        investments: impl IntoIterator<Item = &'b InvestmentRecord>,
        decimals: u32,
    ) -> MetricsResponse {
        let counts = StageCounts::tally(records);
        let total_investment: f64 = investments.into_iter().map(|i| i.amount).sum();
        Self::from_parts(&counts, total_investment, decimals)
    }

    pub fn from_parts(counts: &StageCounts, total_investment: f64, decimals: u32) -> MetricsResponse {
        let leads = counts.get(FunnelStage::Lead);
        let contacts = counts.get(FunnelStage::Contacto);
        let appointments = counts.get(FunnelStage::Cita);
        let sales = counts.get(FunnelStage::VentaBruta);
        let closings = counts.get(FunnelStage::Escrituracion);

        let cost_per = |n: u64| round_to(safe_div(total_investment, n as f64), decimals);

        MetricsResponse {
            total_investment: round_to(total_investment, decimals),
            total_leads: leads,
            total_contacts: contacts,
            total_appointments: appointments,
            total_gross_sales: sales,
            total_closings: closings,
            cost_per_lead: cost_per(leads),
            cost_per_contact: cost_per(contacts),
            cost_per_appointment: cost_per(appointments),
            cost_per_sale: cost_per(sales),
            cost_per_closing: cost_per(closings),
            conversion_lead_to_contact: percentage(contacts, leads, decimals),
            conversion_contact_to_appointment: percentage(appointments, contacts, decimals),
            conversion_appointment_to_sale: percentage(sales, appointments, decimals),
            conversion_sale_to_closing: percentage(closings, sales, decimals),
            overall_conversion: percentage(closings, leads, decimals),
        }
    }
}
