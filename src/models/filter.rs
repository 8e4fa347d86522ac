use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Dashboard filter selection. Empty sets and `None` leave a dimension
/// unrestricted; dimensions are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub developments: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub week_iso: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_development(mut self, name: impl Into<String>) -> Self {
        self.developments.insert(name.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.regions.insert(region.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_week(mut self, week: impl Into<String>) -> Self {
        self.week_iso = Some(week.into());
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }
}

/// Query-string encoding used by the dashboard: list dimensions are
/// comma-joined strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub desarrollos: Option<String>,
    pub regiones: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub month: Option<u32>,
    pub week_iso: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date_to: Option<NaiveDate>,
}

fn split_list(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn non_empty(values: Option<Vec<String>>) -> BTreeSet<String> {
    values
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn trimmed_week(week: Option<String>) -> Option<String> {
    week.map(|w| w.trim().to_string()).filter(|w| !w.is_empty())
}

/// JSON body accepted by the POST cohort routes: list dimensions are
/// arrays rather than comma-joined strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterBody {
    pub desarrollos: Option<Vec<String>>,
    pub regiones: Option<Vec<String>>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub week_iso: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl From<FilterBody> for FilterCriteria {
    fn from(body: FilterBody) -> Self {
        Self {
            developments: non_empty(body.desarrollos),
            regions: non_empty(body.regiones),
            year: body.year,
            month: body.month,
            week_iso: trimmed_week(body.week_iso),
            date_from: body.date_from,
            date_to: body.date_to,
        }
    }
}

impl From<FilterQuery> for FilterCriteria {
    fn from(query: FilterQuery) -> Self {
        Self {
            developments: split_list(query.desarrollos.as_deref()),
            regions: split_list(query.regiones.as_deref()),
            year: query.year,
            month: query.month,
            week_iso: trimmed_week(query.week_iso),
            date_from: query.date_from,
            date_to: query.date_to,
        }
    }
}
