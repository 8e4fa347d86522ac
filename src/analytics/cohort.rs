//! Weekly registration cohorts and their cumulative conversion curves.
//!
//! A cohort is the set of leads registered in one ISO week. For a target
//! stage, cell `(cohort, w)` is the share of the cohort that had reached the
//! stage by the end of week offset `w`. Cells past the observation cutoff
//! are `None`, which is distinct from an observed `0.0`.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{CohortHeatmap, CohortSummary, FunnelStage, LeadRecord};

use super::ratio::{percentage, PERCENT_DECIMALS};

#[derive(Debug)]
struct Cohort {
    start: NaiveDate,
    size: u64,
}

impl Cohort {
    /// Whole weeks between the cohort start and `date`, clamped at 0 for
    /// stage dates that precede registration.
    fn offset_of(&self, date: NaiveDate) -> u32 {
        let days = (date - self.start).num_days().max(0);
        (days / 7) as u32
    }

    /// Offsets at which members reached `stage`, sorted ascending.
    fn reach_offsets(&self, records: &[&LeadRecord], stage: FunnelStage) -> Vec<u32> {
        let mut offsets: Vec<u32> = records
            .iter()
            .filter_map(|r| r.reached(stage))
            .map(|d| self.offset_of(d))
            .collect();
        offsets.sort_unstable();
        offsets
    }

    /// Last offset fully or partially elapsed at `cutoff`; `None` when the
    /// cohort had not started yet.
    fn observable_until(&self, cutoff: NaiveDate) -> Option<u32> {
        let days = (cutoff - self.start).num_days();
        (days >= 0).then(|| (days / 7) as u32)
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn group<'a>(
    records: impl IntoIterator<Item = &'a LeadRecord>,
) -> BTreeMap<String, (Cohort, Vec<&'a LeadRecord>)> {
    let mut cohorts: BTreeMap<String, (Cohort, Vec<&'a LeadRecord>)> = BTreeMap::new();
    for record in records {
        let entry = cohorts.entry(record.cohort_week()).or_insert_with(|| {
            (
                Cohort {
                    start: week_start(record.registered_at),
                    size: 0,
                },
                Vec::new(),
            )
        });
        entry.0.size += 1;
        entry.1.push(record);
    }
    cohorts
}

pub struct CohortAggregator;

impl CohortAggregator {
    /// Build the cohort × week-offset matrix for `stage`.
    ///
    /// Week offsets run from 0 to the largest offset at which any lead in
    /// `records` reached the stage. With `cutoff = None` no cell is masked.
    pub fn heatmap<'a>(
        records: impl IntoIterator<Item = &'a LeadRecord>,
        stage: FunnelStage,
        cutoff: Option<NaiveDate>,
    ) -> CohortHeatmap {
        let cohorts = group(records);
        if cohorts.is_empty() {
            return CohortHeatmap {
                cohort_labels: Vec::new(),
                week_labels: Vec::new(),
                matrix: Vec::new(),
                stage,
            };
        }

        let reach: Vec<Vec<u32>> = cohorts
            .values()
            .map(|(cohort, members)| cohort.reach_offsets(members, stage))
            .collect();

        let max_offset = reach.iter().filter_map(|o| o.last()).copied().max().unwrap_or(0);
        let week_labels: Vec<u32> = (0..=max_offset).collect();

        let matrix = cohorts
            .values()
            .zip(&reach)
            .map(|((cohort, _), offsets)| {
                let limit = cutoff.map(|c| cohort.observable_until(c));
                week_labels
                    .iter()
                    .map(|&week| {
                        let observable = match limit {
                            None => true,
                            Some(None) => false,
                            Some(Some(last)) => week <= last,
                        };
                        observable.then(|| {
                            let reached = offsets.partition_point(|&o| o <= week) as u64;
                            percentage(reached, cohort.size, PERCENT_DECIMALS)
                        })
                    })
                    .collect()
            })
            .collect();

        CohortHeatmap {
            cohort_labels: cohorts.into_keys().collect(),
            week_labels,
            matrix,
            stage,
        }
    }

    /// Sparse per-cohort curves for every conversion stage, keyed by the
    /// offsets at which the cumulative count grew. Stages nobody reached are
    /// left out.
    pub fn summaries<'a>(records: impl IntoIterator<Item = &'a LeadRecord>) -> Vec<CohortSummary> {
        group(records)
            .into_iter()
            .map(|(label, (cohort, members))| {
                let conversions = FunnelStage::CONVERSIONS
                    .into_iter()
                    .filter_map(|stage| {
                        let offsets = cohort.reach_offsets(&members, stage);
                        if offsets.is_empty() {
                            return None;
                        }
                        let mut curve = BTreeMap::new();
                        for (i, offset) in offsets.iter().enumerate() {
                            // ties at one offset keep the last, largest total
                            curve.insert(*offset, percentage(i as u64 + 1, cohort.size, PERCENT_DECIMALS));
                        }
                        Some((stage, curve))
                    })
                    .collect();

                CohortSummary {
                    cohort_week: label,
                    initial_leads: cohort.size,
                    conversions,
                }
            })
            .collect()
    }
}
