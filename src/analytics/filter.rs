//! Filter evaluation. Pure predicates over a record and a [`FilterCriteria`].

use chrono::{Datelike, NaiveDate};

use crate::models::{iso_week_label, FilterCriteria, InvestmentRecord, LeadRecord, Region};

/// Whether a lead passes every dimension of `criteria`.
pub fn matches(record: &LeadRecord, criteria: &FilterCriteria) -> bool {
    development_matches(&record.development, criteria)
        && region_matches(record.region, criteria)
        && date_matches(record.registered_at, criteria)
}

/// Investment rows carry no region of their own; callers pass the region
/// of the row's development.
pub fn matches_investment(
    record: &InvestmentRecord,
    region: Option<Region>,
    criteria: &FilterCriteria,
) -> bool {
    development_matches(&record.development, criteria)
        && region_matches(region, criteria)
        && date_matches(record.date, criteria)
}

fn development_matches(development: &str, criteria: &FilterCriteria) -> bool {
    criteria.developments.is_empty() || criteria.developments.contains(development)
}

/// Region names that don't parse never match anything.
fn region_matches(region: Option<Region>, criteria: &FilterCriteria) -> bool {
    if criteria.regions.is_empty() {
        return true;
    }
    let Some(region) = region else {
        return false;
    };
    criteria
        .regions
        .iter()
        .any(|wanted| wanted.parse::<Region>().ok() == Some(region))
}

/// Year is the ISO week-numbering year so that it agrees with `week_iso`.
fn date_matches(date: NaiveDate, criteria: &FilterCriteria) -> bool {
    if criteria.year.is_some_and(|y| date.iso_week().year() != y) {
        return false;
    }
    if criteria.month.is_some_and(|m| date.month() != m) {
        return false;
    }
    if let Some(week) = criteria.week_iso.as_deref() {
        if iso_week_label(date) != week {
            return false;
        }
    }
    if criteria.date_from.is_some_and(|from| date < from) {
        return false;
    }
    if criteria.date_to.is_some_and(|to| date > to) {
        return false;
    }
    true
}
