//! Data Reshaper Module
//! Unpivots the wide table into long form (melt operation).

use super::loader::WideTable;
use super::model::{CaseRecord, CaseTable};
use tracing::debug;

/// Converts wide monthly-by-agency data into one row per agency per month.
pub struct Reshaper;

impl Reshaper {
    /// Melt every agency column into (`agency`, `cases`) rows.
    ///
    /// Rows are emitted column by column: every period of the first agency,
    /// then every period of the second, and so on. Each row gets its
    /// location from the static agency lookup.
    pub fn to_long(wide: &WideTable) -> CaseTable {
        let mut records = Vec::with_capacity(wide.row_count() * wide.agency_count());

        for column in &wide.columns {
            for (period, &cases) in wide.periods.iter().zip(column.counts.iter()) {
                records.push(CaseRecord::new(period.clone(), column.agency.as_str(), cases));
            }
        }

        debug!(rows = records.len(), "Reshaped to long form");
        CaseTable::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{AgencyColumn, CaseLoader};
    use crate::data::model::{Location, Period, PERIOD_COLUMN};
    use polars::prelude::*;

    fn sample() -> WideTable {
        WideTable {
            periods: vec![Period::new("2025-01"), Period::new("2025-02")],
            columns: vec![
                AgencyColumn {
                    agency: "KCPD".to_string(),
                    counts: vec![10, 20],
                },
                AgencyColumn {
                    agency: "Independence PD".to_string(),
                    counts: vec![15, 25],
                },
            ],
        }
    }

    #[test]
    fn long_table_has_one_row_per_period_and_agency() {
        let long = Reshaper::to_long(&sample());
        assert_eq!(long.len(), 4);

        let rows: Vec<(&str, &str, u32)> = long
            .records()
            .iter()
            .map(|r| (r.period.as_str(), r.agency.as_str(), r.cases))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("2025-01", "KCPD", 10),
                ("2025-02", "KCPD", 20),
                ("2025-01", "Independence PD", 15),
                ("2025-02", "Independence PD", 25),
            ]
        );
    }

    #[test]
    fn row_count_is_periods_times_agencies() {
        let agencies = ["KCPD", "Raytown PD", "Grandview PD", "Buckner PD", "Oak Grove PD"];
        for periods in 0..4usize {
            let wide = WideTable {
                periods: (1..=periods)
                    .map(|m| Period::new(format!("2024-{:02}", m)))
                    .collect(),
                columns: agencies
                    .iter()
                    .map(|a| AgencyColumn {
                        agency: a.to_string(),
                        counts: (0..periods as u32).collect(),
                    })
                    .collect(),
            };
            assert_eq!(Reshaper::to_long(&wide).len(), periods * agencies.len());
        }
    }

    #[test]
    fn location_follows_agency() {
        let wide = CaseLoader::from_dataframe(
            &df!(
                PERIOD_COLUMN => ["2025-01", "2025-02"],
                "KCPD" => [1i64, 2i64],
                "Grandview PD" => [3i64, 4i64],
                "Lone Jack PD" => [5i64, 6i64]
            )
            .unwrap(),
        )
        .unwrap();

        for record in Reshaper::to_long(&wide).records() {
            let downtown = record.agency == "KCPD" || record.agency == "Grandview PD";
            assert_eq!(record.location == Location::Downtown, downtown);
        }
    }

    #[test]
    fn reshape_is_deterministic() {
        let wide = sample();
        assert_eq!(
            Reshaper::to_long(&wide).records(),
            Reshaper::to_long(&wide).records()
        );
    }
}
