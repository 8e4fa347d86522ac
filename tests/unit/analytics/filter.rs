//! Unit tests for filter evaluation

use funnelboard::analytics::filter::{matches, matches_investment};
use funnelboard::models::{FilterCriteria, InvestmentRecord, LeadRecord, Region};

use crate::fixtures::{dashboard_store, date, ALTAVISTA, BOSQUE_REAL, COSTA_AZUL};

#[test]
fn unrestricted_criteria_match_everything() {
    let store = dashboard_store();
    let all = FilterCriteria::all();
    assert_eq!(store.filtered_leads(&all).count(), store.leads().len());
    assert_eq!(store.filtered_investments(&all).count(), store.investments().len());
}

#[test]
fn development_filter_keeps_only_listed_names() {
    let store = dashboard_store();
    let criteria = FilterCriteria::all()
        .with_development(ALTAVISTA)
        .with_development(COSTA_AZUL);

    let leads: Vec<_> = store.filtered_leads(&criteria).collect();
    assert_eq!(leads.len(), 14);
    assert!(leads.iter().all(|l| l.development != BOSQUE_REAL));
}

#[test]
fn leads_inherit_region_from_catalog() {
    let store = dashboard_store();
    let criteria = FilterCriteria::all().with_region("centro");

    assert_eq!(store.filtered_leads(&criteria).count(), 24);
    assert!(store
        .filtered_leads(&criteria)
        .all(|l| l.region == Some(Region::Centro)));
}

#[test]
fn unknown_region_matches_nothing() {
    let store = dashboard_store();
    let criteria = FilterCriteria::all().with_region("Atlantida");
    assert_eq!(store.filtered_leads(&criteria).count(), 0);
    assert_eq!(store.filtered_investments(&criteria).count(), 0);
}

#[test]
fn lead_without_region_fails_a_region_filter() {
    let lead = LeadRecord::new("x", "Sin Catalogo", date(2024, 1, 1));
    assert!(!matches(&lead, &FilterCriteria::all().with_region("Norte")));
    assert!(matches(&lead, &FilterCriteria::all()));
}

#[test]
fn year_follows_iso_week_year() {
    let lead = LeadRecord::new("x", ALTAVISTA, date(2024, 12, 30));
    assert!(matches(&lead, &FilterCriteria::all().with_year(2025)));
    assert!(!matches(&lead, &FilterCriteria::all().with_year(2024)));
    assert!(matches(&lead, &FilterCriteria::all().with_month(12)));
}

#[test]
fn week_filter_compares_iso_labels() {
    let store = dashboard_store();
    let criteria = FilterCriteria::all().with_week("2024-W05");
    assert_eq!(store.filtered_leads(&criteria).count(), 20);
}

#[test]
fn date_range_is_inclusive() {
    let lead = LeadRecord::new("x", ALTAVISTA, date(2024, 2, 1));
    let on_bounds = FilterCriteria::all().with_date_range(Some(date(2024, 2, 1)), Some(date(2024, 2, 1)));
    let after = FilterCriteria::all().with_date_range(Some(date(2024, 2, 2)), None);

    assert!(matches(&lead, &on_bounds));
    assert!(!matches(&lead, &after));
}

#[test]
fn dimensions_are_anded() {
    let store = dashboard_store();
    let criteria = FilterCriteria::all()
        .with_development(ALTAVISTA)
        .with_region("Sur");
    assert_eq!(store.filtered_leads(&criteria).count(), 0);
}

#[test]
fn investment_rows_use_their_own_date_and_development_region() {
    let row = InvestmentRecord {
        development: COSTA_AZUL.to_string(),
        date: date(2024, 2, 1),
        amount: 10.0,
    };

    assert!(matches_investment(&row, Some(Region::Sur), &FilterCriteria::all().with_region("Sur")));
    assert!(!matches_investment(&row, Some(Region::Sur), &FilterCriteria::all().with_month(3)));
    assert!(!matches_investment(&row, None, &FilterCriteria::all().with_region("Sur")));
}
