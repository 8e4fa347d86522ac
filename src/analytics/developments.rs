//! Per-development totals for the map view.

use std::collections::HashMap;

use crate::models::{DevelopmentLocation, FilterCriteria, FunnelStage};
use crate::store::geo::resolve_coordinates;
use crate::store::RecordStore;

use super::funnel::StageCounts;
use super::ratio::{percentage, round_to};

const DECIMALS: u32 = 2;

pub struct DevelopmentAggregator;

impl DevelopmentAggregator {
    /// One entry per catalog development, in catalog order. Totals cover the
    /// leads and investment rows that pass `criteria`.
    pub fn locations(store: &RecordStore, criteria: &FilterCriteria) -> Vec<DevelopmentLocation> {
        let mut counts: HashMap<&str, StageCounts> = HashMap::new();
        for lead in store.filtered_leads(criteria) {
            counts.entry(lead.development.as_str()).or_default().add(lead);
        }

        let mut invested: HashMap<&str, f64> = HashMap::new();
        for row in store.filtered_investments(criteria) {
            *invested.entry(row.development.as_str()).or_default() += row.amount;
        }

        store
            .developments()
            .iter()
            .map(|dev| {
                let tally = counts.get(dev.name.as_str()).copied().unwrap_or_default();
                let closings = tally.get(FunnelStage::Escrituracion);
                let (latitude, longitude) = resolve_coordinates(dev.latitude, dev.longitude, &dev.city);
                DevelopmentLocation {
                    name: dev.name.clone(),
                    city: dev.city.clone(),
                    region: dev.region.map(|r| r.to_string()).unwrap_or_default(),
                    latitude,
                    longitude,
                    total_leads: tally.leads(),
                    total_sales: tally.get(FunnelStage::VentaBruta),
                    total_closings: closings,
                    conversion_rate: percentage(closings, tally.leads(), DECIMALS),
                    total_investment: round_to(
                        invested.get(dev.name.as_str()).copied().unwrap_or(0.0),
                        DECIMALS,
                    ),
                }
            })
            .collect()
    }
}
