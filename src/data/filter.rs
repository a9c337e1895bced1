//! Filter Engine Module
//! Agency / year / month selection over the long case table.

use super::model::{CaseRecord, CaseTable};
use std::collections::BTreeSet;
use tracing::debug;

/// Options offered by the sidebar multi-selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub agencies: Vec<String>,
    pub years: Vec<String>,
    pub months: Vec<String>,
}

impl FilterOptions {
    /// Derive option lists from the full table.
    pub fn from_table(table: &CaseTable) -> Self {
        let years: BTreeSet<String> = table
            .periods()
            .iter()
            .map(|p| p.year().to_string())
            .collect();
        let months: BTreeSet<String> = table.periods().iter().map(|p| p.month_suffix()).collect();

        Self {
            agencies: table.agencies().to_vec(),
            years: years.into_iter().collect(),
            months: months.into_iter().collect(),
        }
    }

    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Agency => &self.agencies,
            FilterDimension::Year => &self.years,
            FilterDimension::Month => &self.months,
        }
    }
}

/// One of the three sidebar filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Agency,
    Year,
    Month,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 3] = [
        FilterDimension::Agency,
        FilterDimension::Year,
        FilterDimension::Month,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterDimension::Agency => "Select PD Agency",
            FilterDimension::Year => "Select Year",
            FilterDimension::Month => "Select Month",
        }
    }
}

/// Current user selection. Empty sets select nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub agencies: BTreeSet<String>,
    pub years: BTreeSet<String>,
    pub months: BTreeSet<String>,
}

impl FilterSelection {
    /// Everything selected.
    pub fn all(options: &FilterOptions) -> Self {
        Self {
            agencies: options.agencies.iter().cloned().collect(),
            years: options.years.iter().cloned().collect(),
            months: options.months.iter().cloned().collect(),
        }
    }

    pub fn values(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Agency => &self.agencies,
            FilterDimension::Year => &self.years,
            FilterDimension::Month => &self.months,
        }
    }

    fn values_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Agency => &mut self.agencies,
            FilterDimension::Year => &mut self.years,
            FilterDimension::Month => &mut self.months,
        }
    }

    pub fn is_selected(&self, dimension: FilterDimension, value: &str) -> bool {
        self.values(dimension).contains(value)
    }

    /// Add or remove a single value.
    pub fn set_selected(&mut self, dimension: FilterDimension, value: &str, selected: bool) {
        let values = self.values_mut(dimension);
        if selected {
            values.insert(value.to_string());
        } else {
            values.remove(value);
        }
    }

    pub fn select_all(&mut self, dimension: FilterDimension, options: &FilterOptions) {
        *self.values_mut(dimension) = options.values(dimension).iter().cloned().collect();
    }

    pub fn clear(&mut self, dimension: FilterDimension) {
        self.values_mut(dimension).clear();
    }

    /// Keeps rows matching the year and month patterns, ignoring agencies.
    pub fn matches_period(&self, record: &CaseRecord) -> bool {
        self.years.iter().any(|y| record.period.contains(y))
            && self.months.iter().any(|m| record.period.contains(m))
    }

    pub fn matches(&self, record: &CaseRecord) -> bool {
        self.agencies.contains(&record.agency) && self.matches_period(record)
    }
}

/// Filtered views consumed by the charts and the raw data table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredViews {
    /// Agency, year and month filters applied. Drives the agency chart and raw table.
    pub by_agency: Vec<CaseRecord>,
    /// Year and month filters only. Drives the location chart.
    pub by_location: Vec<CaseRecord>,
}

/// Stateless filtering over an immutable record slice.
pub struct FilterEngine;

impl FilterEngine {
    /// Rows matching the full selection.
    pub fn filter(records: &[CaseRecord], selection: &FilterSelection) -> Vec<CaseRecord> {
        records
            .iter()
            .filter(|r| selection.matches(r))
            .cloned()
            .collect()
    }

    /// Build both derived views from the base table.
    pub fn apply(records: &[CaseRecord], selection: &FilterSelection) -> FilteredViews {
        let by_agency = Self::filter(records, selection);
        let by_location: Vec<CaseRecord> = records
            .iter()
            .filter(|r| selection.matches_period(r))
            .cloned()
            .collect();

        debug!(
            agencies = selection.agencies.len(),
            years = selection.years.len(),
            months = selection.months.len(),
            by_agency = by_agency.len(),
            by_location = by_location.len(),
            "Filters applied"
        );

        FilteredViews {
            by_agency,
            by_location,
        }
    }
}
