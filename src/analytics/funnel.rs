//! Gated funnel counts.

use crate::models::{FunnelResponse, FunnelStage, FunnelStageData, LeadRecord};

use super::ratio::{percentage, PERCENT_DECIMALS};

/// Per-stage counts under sequential gating: a lead counts at a stage only
/// when it also has every earlier stage date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts([u64; FunnelStage::COUNT]);

impl StageCounts {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a LeadRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.add(record);
        }
        counts
    }

    pub fn add(&mut self, record: &LeadRecord) {
        let deepest = record.deepest_stage().index();
        for slot in &mut self.0[..=deepest] {
            *slot += 1;
        }
    }

    pub fn get(&self, stage: FunnelStage) -> u64 {
        self.0[stage.index()]
    }

    pub fn leads(&self) -> u64 {
        self.get(FunnelStage::Lead)
    }

    /// `stage` as a percentage of all leads in the bucket.
    pub fn share_of_leads(&self, stage: FunnelStage) -> f64 {
        percentage(self.get(stage), self.leads(), PERCENT_DECIMALS)
    }
}

pub struct FunnelAggregator;

impl FunnelAggregator {
    pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a LeadRecord>) -> FunnelResponse {
        Self::from_counts(&StageCounts::tally(records))
    }

    pub fn from_counts(counts: &StageCounts) -> FunnelResponse {
        let total = counts.leads();
        let stages = FunnelStage::ALL
            .into_iter()
            .map(|stage| {
                let count = counts.get(stage);
                FunnelStageData {
                    stage,
                    stage_label: stage.label().to_string(),
                    count,
                    percentage_of_total: percentage(count, total, PERCENT_DECIMALS),
                    conversion_from_previous: stage
                        .previous()
                        .map(|prev| percentage(count, counts.get(prev), PERCENT_DECIMALS)),
                }
            })
            .collect();

        FunnelResponse {
            stages,
            total_leads: total,
        }
    }
}
