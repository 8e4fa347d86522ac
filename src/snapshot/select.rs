//! Resolving a filter selection to one pre-computed slice.
//!
//! A snapshot only holds single-dimension slices, so a multi-dimension
//! selection is answered by the highest-ranked dimension that has a slice.

use std::collections::{BTreeMap, BTreeSet};

use super::Sliced;
use crate::models::{FilterCriteria, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceDimension {
    Week,
    Region,
    Development,
    Year,
}

/// Fixed resolution order, highest priority first.
pub const SLICE_PRIORITY: [SliceDimension; 4] = [
    SliceDimension::Week,
    SliceDimension::Region,
    SliceDimension::Development,
    SliceDimension::Year,
];

fn single(values: &BTreeSet<String>) -> Option<&String> {
    match values.len() {
        1 => values.iter().next(),
        _ => None,
    }
}

impl SliceDimension {
    /// Slice key this dimension asks for, if the selection pins it to a
    /// single value.
    pub fn key(self, criteria: &FilterCriteria) -> Option<String> {
        match self {
            SliceDimension::Week => criteria.week_iso.clone(),
            SliceDimension::Region => single(&criteria.regions).map(|r| {
                r.parse::<Region>()
                    .map(|region| region.to_string())
                    .unwrap_or_else(|_| r.clone())
            }),
            SliceDimension::Development => single(&criteria.developments).cloned(),
            SliceDimension::Year => criteria.year.map(|y| y.to_string()),
        }
    }

    fn slices<T>(self, sliced: &Sliced<T>) -> &BTreeMap<String, T> {
        match self {
            SliceDimension::Week => &sliced.by_week,
            SliceDimension::Region => &sliced.by_region,
            SliceDimension::Development => &sliced.by_desarrollo,
            SliceDimension::Year => &sliced.by_year,
        }
    }
}

impl<T> Sliced<T> {
    /// First dimension in [`SLICE_PRIORITY`] that both applies to `criteria`
    /// and has a slice.
    pub fn resolve(&self, criteria: &FilterCriteria) -> Option<(SliceDimension, &T)> {
        SLICE_PRIORITY.into_iter().find_map(|dim| {
            let key = dim.key(criteria)?;
            dim.slices(self).get(&key).map(|slice| (dim, slice))
        })
    }

    /// The resolved slice, or `all` when nothing applies.
    pub fn select(&self, criteria: &FilterCriteria) -> &T {
        self.resolve(criteria).map(|(_, slice)| slice).unwrap_or(&self.all)
    }
}
