//! Chart Specification Module
//! Declarative grouped-bar chart description, shaped after Vega-Lite.

use crate::data::{CaseRecord, Location};
use serde::Serialize;

pub const AGENCY_CHART_TITLE: &str = "📊 Monthly Cases Received by Agency";
pub const LOCATION_CHART_TITLE: &str =
    "📊 Monthly Cases Received by JCPAO Location (Downtown vs. East Jack)";

pub const DEFAULT_WIDTH: u32 = 700;
pub const DEFAULT_HEIGHT: u32 = 400;

/// Column of a long-form case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Field {
    #[serde(rename = "ref_month_yr")]
    Period,
    #[serde(rename = "Agency")]
    Agency,
    #[serde(rename = "JCPAO Location")]
    Location,
    #[serde(rename = "Cases")]
    Cases,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Period => "ref_month_yr",
            Field::Agency => "Agency",
            Field::Location => "JCPAO Location",
            Field::Cases => "Cases",
        }
    }

    pub fn value(&self, record: &CaseRecord) -> String {
        match self {
            Field::Period => record.period.to_string(),
            Field::Agency => record.agency.clone(),
            Field::Location => record.location.to_string(),
            Field::Cases => record.cases.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Temporal,
    Nominal,
    Quantitative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scale {
    pub domain: Vec<String>,
}

/// Single channel encoding: which field, how to interpret it, how to title it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub field: Field,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
}

impl FieldDef {
    pub fn new(field: Field, field_type: FieldType) -> Self {
        Self {
            field,
            field_type,
            title: None,
            scale: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn domain(mut self, domain: Vec<String>) -> Self {
        self.scale = Some(Scale { domain });
        self
    }

    /// Axis title, falling back to the field name.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(self.field.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encoding {
    pub x: FieldDef,
    #[serde(rename = "xOffset")]
    pub x_offset: FieldDef,
    pub y: FieldDef,
    pub color: FieldDef,
    pub tooltip: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartValues {
    pub values: Vec<CaseRecord>,
}

/// Attribute the bars of each month are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Agency,
    Location,
}

impl GroupBy {
    pub fn field(&self) -> Field {
        match self {
            GroupBy::Agency => Field::Agency,
            GroupBy::Location => Field::Location,
        }
    }
}

/// Grouped bar chart: x = month, offset and color = group, y = cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub mark: Mark,
    pub encoding: Encoding,
    pub data: ChartValues,
}

impl ChartSpec {
    /// Build a grouped bar chart over `records`.
    ///
    /// `color_domain` fixes the color of each group independently of which
    /// groups the current records contain.
    pub fn grouped_bar(
        title: &str,
        group_by: GroupBy,
        color_domain: Vec<String>,
        records: Vec<CaseRecord>,
    ) -> Self {
        let group = group_by.field();
        Self {
            title: title.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mark: Mark::Bar,
            encoding: Encoding {
                x: FieldDef::new(Field::Period, FieldType::Temporal).title("Month-Year"),
                x_offset: FieldDef::new(group, FieldType::Nominal),
                y: FieldDef::new(Field::Cases, FieldType::Quantitative).title("Cases Received"),
                color: FieldDef::new(group, FieldType::Nominal).domain(color_domain),
                tooltip: vec![
                    FieldDef::new(Field::Period, FieldType::Temporal),
                    FieldDef::new(group, FieldType::Nominal),
                    FieldDef::new(Field::Cases, FieldType::Quantitative),
                ],
            },
            data: ChartValues { values: records },
        }
    }

    /// Cases per agency; colors follow the order agencies appear in the dataset.
    pub fn by_agency(agencies: &[String], records: Vec<CaseRecord>) -> Self {
        Self::grouped_bar(AGENCY_CHART_TITLE, GroupBy::Agency, agencies.to_vec(), records)
    }

    /// Cases per JCPAO location.
    pub fn by_location(records: Vec<CaseRecord>) -> Self {
        let domain = Location::ALL.iter().map(|l| l.to_string()).collect();
        Self::grouped_bar(LOCATION_CHART_TITLE, GroupBy::Location, domain, records)
    }

    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Field the bars are grouped and colored by.
    pub fn group_field(&self) -> Field {
        self.encoding.color.field
    }

    pub fn color_domain(&self) -> &[String] {
        self.encoding
            .color
            .scale
            .as_ref()
            .map(|s| s.domain.as_slice())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
