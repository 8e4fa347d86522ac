//! Monthly conversion trend.

use std::collections::BTreeMap;

use crate::models::{ConversionTrendPoint, ConversionTrendResponse, FunnelStage, LeadRecord};

use super::funnel::StageCounts;

pub const PERIOD_TYPE: &str = "monthly";

pub struct TrendAggregator;

impl TrendAggregator {
    pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a LeadRecord>) -> ConversionTrendResponse {
        let mut buckets: BTreeMap<String, StageCounts> = BTreeMap::new();
        for record in records {
            buckets.entry(record.period()).or_default().add(record);
        }

        let data = buckets
            .into_iter()
            .map(|(period, counts)| ConversionTrendPoint {
                period,
                leads: counts.leads(),
                contacto: counts.share_of_leads(FunnelStage::Contacto),
                cita: counts.share_of_leads(FunnelStage::Cita),
                venta_bruta: counts.share_of_leads(FunnelStage::VentaBruta),
                escrituracion: counts.share_of_leads(FunnelStage::Escrituracion),
            })
            .collect();

        ConversionTrendResponse {
            data,
            period_type: PERIOD_TYPE.to_string(),
        }
    }
}
