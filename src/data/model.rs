//! Case Data Model
//! Long-form case records and the immutable table built from them.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Name of the period column in the source CSV.
pub const PERIOD_COLUMN: &str = "ref_month_yr";

/// Agencies whose cases are handled by the downtown office.
pub const DOWNTOWN_AGENCIES: [&str; 2] = ["KCPD", "Grandview PD"];

/// Law enforcement agencies covered by the dataset.
pub const COVERED_AGENCIES: [&str; 16] = [
    "KCPD",
    "Independence PD",
    "Blue Springs PD",
    "Lees Summit PD",
    "Raytown PD",
    "Grandview PD",
    "Sugar Creek PD",
    "Grain Valley PD",
    "Oak Grove PD",
    "Buckner PD",
    "Lone Jack PD",
    "Greenwood PD",
    "Lake Lotawana PD",
    "Lake Tapawingo PD",
    "Jackson County Sheriff",
    "Jackson County Drug Task Force (JCDTF)",
];

/// Month-year identifier such as `2025-01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Period(String);

impl Period {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Year part: everything before the last `-`.
    pub fn year(&self) -> &str {
        match self.0.rsplit_once('-') {
            Some((year, _)) => year,
            None => &self.0,
        }
    }

    /// Month part including its leading separator, e.g. `-01`.
    pub fn month_suffix(&self) -> String {
        let month = match self.0.rsplit_once('-') {
            Some((_, month)) => month,
            None => &self.0,
        };
        format!("-{}", month)
    }

    /// First day of the month, when the period is a well-formed `YYYY-MM`.
    pub fn date(&self) -> Option<NaiveDate> {
        let (year, month) = self.0.trim().split_once('-')?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return None;
        }
        NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
    }

    /// Human readable label for axes, e.g. `Jan 2025`.
    pub fn label(&self) -> String {
        self.date()
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.0.clone())
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

impl Ord for Period {
    // Parsable periods in calendar order first, the rest lexically.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.date(), other.date()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JCPAO office location an agency reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Location {
    #[serde(rename = "Downtown")]
    Downtown,
    #[serde(rename = "Eastern Jack")]
    EasternJack,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::Downtown, Location::EasternJack];

    pub fn for_agency(agency: &str) -> Self {
        if DOWNTOWN_AGENCIES.contains(&agency) {
            Location::Downtown
        } else {
            Location::EasternJack
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Location::Downtown => "Downtown",
            Location::EasternJack => "Eastern Jack",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One long-form row: cases received from one agency in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    #[serde(rename = "ref_month_yr")]
    pub period: Period,
    #[serde(rename = "Agency")]
    pub agency: String,
    #[serde(rename = "Cases")]
    pub cases: u32,
    #[serde(rename = "JCPAO Location")]
    pub location: Location,
}

impl CaseRecord {
    pub fn new(period: Period, agency: impl Into<String>, cases: u32) -> Self {
        let agency = agency.into();
        let location = Location::for_agency(&agency);
        Self {
            period,
            agency,
            cases,
            location,
        }
    }
}

/// Immutable long-form table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct CaseTable {
    records: Vec<CaseRecord>,
    agencies: Vec<String>,
    periods: Vec<Period>,
}

impl CaseTable {
    pub fn new(records: Vec<CaseRecord>) -> Self {
        let mut agencies: Vec<String> = Vec::new();
        let mut periods: Vec<Period> = Vec::new();

        for record in &records {
            if !agencies.contains(&record.agency) {
                agencies.push(record.agency.clone());
            }
            if !periods.contains(&record.period) {
                periods.push(record.period.clone());
            }
        }
        periods.sort();

        Self {
            records,
            agencies,
            periods,
        }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Distinct agencies in first-seen order.
    pub fn agencies(&self) -> &[String] {
        &self.agencies
    }

    /// Distinct periods in calendar order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_splits_into_year_and_month() {
        let period = Period::new("2025-01");
        assert_eq!(period.year(), "2025");
        assert_eq!(period.month_suffix(), "-01");
        assert_eq!(period.label(), "Jan 2025");
    }

    #[test]
    fn period_without_separator_uses_whole_string() {
        let period = Period::new("202501");
        assert_eq!(period.year(), "202501");
        assert_eq!(period.month_suffix(), "-202501");
        assert_eq!(period.date(), None);
        assert_eq!(period.label(), "202501");
    }

    #[test]
    fn periods_order_by_calendar_then_text() {
        let mut periods = vec![
            Period::new("2025-10"),
            Period::new("unknown"),
            Period::new("2024-12"),
            Period::new("2025-02"),
        ];
        periods.sort();
        let ordered: Vec<&str> = periods.iter().map(Period::as_str).collect();
        assert_eq!(ordered, vec!["2024-12", "2025-02", "2025-10", "unknown"]);
    }

    #[test]
    fn location_is_downtown_only_for_downtown_agencies() {
        for agency in COVERED_AGENCIES {
            let expected = agency == "KCPD" || agency == "Grandview PD";
            assert_eq!(Location::for_agency(agency) == Location::Downtown, expected);
        }
        assert_eq!(Location::for_agency("kcpd"), Location::EasternJack);
    }

    #[test]
    fn table_tracks_distinct_agencies_and_periods() {
        let table = CaseTable::new(vec![
            CaseRecord::new(Period::new("2025-02"), "KCPD", 20),
            CaseRecord::new(Period::new("2025-01"), "KCPD", 10),
            CaseRecord::new(Period::new("2025-02"), "Independence PD", 25),
            CaseRecord::new(Period::new("2025-01"), "Independence PD", 15),
        ]);

        assert_eq!(table.len(), 4);
        assert_eq!(table.agencies(), ["KCPD", "Independence PD"]);
        assert_eq!(
            table.periods(),
            [Period::new("2025-01"), Period::new("2025-02")]
        );
    }

    #[test]
    fn record_serializes_with_source_column_names() {
        let record = CaseRecord::new(Period::new("2025-01"), "Raytown PD", 7);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ref_month_yr"], "2025-01");
        assert_eq!(json["Agency"], "Raytown PD");
        assert_eq!(json["Cases"], 7);
        assert_eq!(json["JCPAO Location"], "Eastern Jack");
    }
}
