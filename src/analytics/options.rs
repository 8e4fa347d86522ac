//! Values offered by the dashboard's filter panel.

use chrono::Datelike;
use std::collections::BTreeSet;

use crate::models::{FilterOptions, Region};
use crate::store::RecordStore;

pub fn filter_options(store: &RecordStore) -> FilterOptions {
    let mut desarrollos: BTreeSet<String> = store
        .leads()
        .iter()
        .map(|l| l.development.clone())
        .filter(|d| !d.is_empty())
        .collect();
    if desarrollos.is_empty() {
        desarrollos = store.developments().iter().map(|d| d.name.clone()).collect();
    }

    let mut regions: BTreeSet<Region> = store.developments().iter().filter_map(|d| d.region).collect();
    if regions.is_empty() {
        regions = Region::ALL.into_iter().collect();
    }
    let mut regiones: Vec<String> = regions.into_iter().map(|r| r.to_string()).collect();
    regiones.sort();

    let years: BTreeSet<i32> = store
        .leads()
        .iter()
        .map(|l| l.registered_at.iso_week().year())
        .collect();
    let weeks: BTreeSet<String> = store.leads().iter().map(|l| l.cohort_week()).collect();

    FilterOptions {
        desarrollos: desarrollos.into_iter().collect(),
        regiones,
        years: years.into_iter().collect(),
        months: (1..=12).collect(),
        weeks: weeks.into_iter().collect(),
    }
}
