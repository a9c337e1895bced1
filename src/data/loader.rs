//! CSV Data Loader Module
//! Reads the monthly cases-by-agency CSV with Polars and validates its shape.

use super::model::{Period, PERIOD_COLUMN};
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV: {0}")]
    Parse(String),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Case counts of one agency, aligned with `WideTable::periods`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencyColumn {
    pub agency: String,
    pub counts: Vec<u32>,
}

/// Wide table as read from disk: one row per period, one column per agency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideTable {
    pub periods: Vec<Period>,
    pub columns: Vec<AgencyColumn>,
}

impl WideTable {
    pub fn row_count(&self) -> usize {
        self.periods.len()
    }

    pub fn agency_count(&self) -> usize {
        self.columns.len()
    }
}

/// Loads the wide CSV once at startup.
pub struct CaseLoader;

impl CaseLoader {
    /// Load and validate a CSV file.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<WideTable, LoaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoaderError::File {
            path: path.to_path_buf(),
            source,
        })?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .into_reader_with_file_handle(file)
            .finish()?;
        debug!(rows = df.height(), columns = df.width(), "CSV parsed");

        let table = Self::from_dataframe(&df)?;
        info!(
            path = %path.display(),
            periods = table.row_count(),
            agencies = table.agency_count(),
            "Loaded case data"
        );
        Ok(table)
    }

    /// Validate a raw DataFrame and convert it into a typed wide table.
    pub fn from_dataframe(df: &DataFrame) -> Result<WideTable, LoaderError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::validate_header(&names)?;

        let period_col = df.column(PERIOD_COLUMN)?.cast(&DataType::String)?;
        let periods = period_col
            .as_materialized_series()
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(v) if !v.trim().is_empty() => Ok(Period::new(v.trim())),
                _ => Err(LoaderError::Parse(format!(
                    "missing {} value in data row {}",
                    PERIOD_COLUMN,
                    row + 1
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let columns = names[1..]
            .iter()
            .map(|agency| Self::read_counts(df, agency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WideTable { periods, columns })
    }

    fn validate_header(names: &[String]) -> Result<(), LoaderError> {
        match names.first() {
            Some(first) if first == PERIOD_COLUMN => {}
            Some(first) => {
                return Err(LoaderError::Parse(format!(
                    "first column must be '{}', found '{}'",
                    PERIOD_COLUMN, first
                )))
            }
            None => return Err(LoaderError::Parse("header row is empty".to_string())),
        }

        if names.len() < 2 {
            return Err(LoaderError::Parse(
                "header has no agency columns".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &names[1..] {
            if name.trim().is_empty() {
                return Err(LoaderError::Parse("blank agency column name".to_string()));
            }
            if let Some(original) = Self::renamed_duplicate(name, names) {
                return Err(LoaderError::Parse(format!(
                    "duplicate column '{}'",
                    original
                )));
            }
            if name == PERIOD_COLUMN || !seen.insert(name.as_str()) {
                return Err(LoaderError::Parse(format!(
                    "duplicate column '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Polars reads a repeated header `X` as `X_duplicated_N`. Returns `X` when
    /// `name` is such a rename of another column in `names`.
    fn renamed_duplicate<'a>(name: &'a str, names: &[String]) -> Option<&'a str> {
        let (original, index) = name.rsplit_once("_duplicated_")?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        names.iter().any(|n| n == original).then_some(original)
    }

    fn read_counts(df: &DataFrame, agency: &str) -> Result<AgencyColumn, LoaderError> {
        let column = df.column(agency)?;
        // Header-only files carry no values to infer a dtype from.
        if df.height() > 0 && !column.dtype().is_integer() {
            return Err(LoaderError::Parse(format!(
                "column '{}' contains non-numeric case counts",
                agency
            )));
        }

        let values = column.cast(&DataType::Int64)?;
        let counts = values
            .as_materialized_series()
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.ok_or_else(|| {
                    LoaderError::Parse(format!(
                        "missing case count for '{}' in data row {}",
                        agency,
                        row + 1
                    ))
                })?;
                u32::try_from(value).map_err(|_| {
                    LoaderError::Parse(format!(
                        "invalid case count {} for '{}' in data row {}",
                        value,
                        agency,
                        row + 1
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AgencyColumn {
            agency: agency.to_string(),
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Reshaper;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_wide_table() {
        let file = write_csv("ref_month_yr,KCPD,Independence PD\n2025-01,10,15\n2025-02,20,25\n");
        let table = CaseLoader::load_csv(file.path()).unwrap();

        assert_eq!(
            table.periods,
            vec![Period::new("2025-01"), Period::new("2025-02")]
        );
        assert_eq!(table.agency_count(), 2);
        assert_eq!(table.columns[0].agency, "KCPD");
        assert_eq!(table.columns[0].counts, vec![10, 20]);
        assert_eq!(table.columns[1].agency, "Independence PD");
        assert_eq!(table.columns[1].counts, vec![15, 25]);
    }

    #[test]
    fn missing_file_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CaseLoader::load_csv(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::File { .. }));
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn wrong_first_column_is_parse_error() {
        let file = write_csv("month,KCPD\n2025-01,10\n");
        let err = CaseLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
        assert!(err.to_string().contains("ref_month_yr"));
    }

    #[test]
    fn repeated_agency_header_is_parse_error() {
        let file = write_csv("ref_month_yr,KCPD,KCPD\n2025-01,1,2\n");
        let err = CaseLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
        assert!(err.to_string().contains("duplicate column 'KCPD'"));
    }

    #[test]
    fn agency_named_like_a_rename_is_kept() {
        let file = write_csv("ref_month_yr,KCPD_duplicated_0\n2025-01,1\n");
        let table = CaseLoader::load_csv(file.path()).unwrap();
        assert_eq!(table.columns[0].agency, "KCPD_duplicated_0");
    }

    #[test]
    fn blank_agency_header_is_parse_error() {
        let file = write_csv("ref_month_yr,,KCPD\n2025-01,1,2\n");
        let err = CaseLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
        assert!(err.to_string().contains("blank agency column name"));
    }

    #[test]
    fn header_only_file_loads_empty() {
        let file = write_csv("ref_month_yr,KCPD,Independence PD\n");
        let table = CaseLoader::load_csv(file.path()).unwrap();

        assert_eq!(table.row_count(), 0);
        assert_eq!(table.agency_count(), 2);
        assert!(table.columns.iter().all(|c| c.counts.is_empty()));

        let long = Reshaper::to_long(&table);
        assert_eq!(long.len(), 0);
        assert!(long.records().is_empty());
        assert!(long.periods().is_empty());
    }

    #[test]
    fn header_without_agencies_is_parse_error() {
        let df = df!(PERIOD_COLUMN => ["2025-01"]).unwrap();
        let err = CaseLoader::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
    }

    #[test]
    fn non_numeric_counts_are_parse_error() {
        let file = write_csv("ref_month_yr,KCPD\n2025-01,ten\n2025-02,20\n");
        let err = CaseLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
        assert!(err.to_string().contains("KCPD"));
    }

    #[test]
    fn negative_counts_are_parse_error() {
        let df = df!(
            PERIOD_COLUMN => ["2025-01", "2025-02"],
            "KCPD" => [3i64, -1i64]
        )
        .unwrap();
        let err = CaseLoader::from_dataframe(&df).unwrap_err();
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn missing_counts_are_parse_error() {
        let df = df!(
            PERIOD_COLUMN => ["2025-01", "2025-02"],
            "KCPD" => [Some(3i64), None]
        )
        .unwrap();
        let err = CaseLoader::from_dataframe(&df).unwrap_err();
        assert!(err.to_string().contains("data row 2"));
    }

    #[test]
    fn numeric_period_column_is_read_as_text() {
        let df = df!(
            PERIOD_COLUMN => [202501i64, 202502i64],
            "KCPD" => [1i64, 2i64]
        )
        .unwrap();
        let table = CaseLoader::from_dataframe(&df).unwrap();
        assert_eq!(table.periods[1].as_str(), "202502");
    }
}
