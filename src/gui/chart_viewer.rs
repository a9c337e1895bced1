//! Chart Viewer Widget
//! Collapsible panels: agency chart, location chart, raw data and about.

use crate::charts::{ChartPlotter, ChartSpec, GroupedBars};
use crate::data::{CaseRecord, FilteredViews, COVERED_AGENCIES};
use egui::{CollapsingHeader, RichText, ScrollArea};
use tracing::{trace, warn};

const RAW_DATA_HEIGHT: f32 = 320.0;

/// One chart panel: its chart spec and the bars laid out from it.
struct ChartPanel {
    spec: ChartSpec,
    bars: GroupedBars,
}

impl ChartPanel {
    fn new(spec: ChartSpec) -> Self {
        if tracing::enabled!(tracing::Level::TRACE) {
            match spec.to_json() {
                Ok(json) => trace!(chart = %spec.title, %json, "Chart spec"),
                Err(e) => warn!("Failed to serialize chart spec: {}", e),
            }
        }
        let bars = GroupedBars::layout(&spec);
        Self { spec, bars }
    }
}

/// Central panel content, rebuilt whenever the filters change.
pub struct ChartViewer {
    agency: ChartPanel,
    location: ChartPanel,
    chart_size: (u32, u32),
}

impl ChartViewer {
    pub fn new(chart_width: u32, chart_height: u32) -> Self {
        Self {
            agency: ChartPanel::new(ChartSpec::by_agency(&[], Vec::new())),
            location: ChartPanel::new(ChartSpec::by_location(Vec::new())),
            chart_size: (chart_width, chart_height),
        }
    }

    /// Replace both charts with freshly filtered views.
    pub fn set_views(&mut self, views: FilteredViews, agencies: &[String]) {
        let (width, height) = self.chart_size;
        let FilteredViews {
            by_agency,
            by_location,
        } = views;

        self.agency =
            ChartPanel::new(ChartSpec::by_agency(agencies, by_agency).sized(width, height));
        self.location =
            ChartPanel::new(ChartSpec::by_location(by_location).sized(width, height));
    }

    /// Rows behind the agency chart, shown in the raw data panel.
    pub fn raw_records(&self) -> &[CaseRecord] {
        &self.agency.spec.data.values
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                CollapsingHeader::new("Bar Chart - Received Criminal Cases by Police Agency")
                    .default_open(false)
                    .show(ui, |ui| {
                        ChartPlotter::draw_grouped_bar_chart(
                            ui,
                            &self.agency.spec,
                            &self.agency.bars,
                        );
                    });

                CollapsingHeader::new("Bar Chart - Received Criminal Cases by JCPAO Location")
                    .default_open(false)
                    .show(ui, |ui| {
                        ChartPlotter::draw_grouped_bar_chart(
                            ui,
                            &self.location.spec,
                            &self.location.bars,
                        );
                    });

                CollapsingHeader::new("Raw Data")
                    .default_open(false)
                    .show(ui, |ui| {
                        Self::draw_raw_table(ui, self.raw_records());
                    });

                CollapsingHeader::new("About the app")
                    .default_open(false)
                    .show(ui, Self::draw_about);
            });
    }

    fn draw_raw_table(ui: &mut egui::Ui, records: &[CaseRecord]) {
        ui.label(RichText::new(format!("{} rows", records.len())).size(11.0));
        ui.add_space(5.0);

        ScrollArea::both()
            .id_salt("raw_data")
            .max_height(RAW_DATA_HEIGHT)
            .show(ui, |ui| {
                egui::Grid::new("raw_data_grid")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["ref_month_yr", "Agency", "Cases", "JCPAO Location"] {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for record in records {
                            ui.label(record.period.as_str());
                            ui.label(&record.agency);
                            ui.label(record.cases.to_string());
                            ui.label(record.location.label());
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_about(ui: &mut egui::Ui) {
        ui.label(
            "The data only displays criminal cases received by the JCPAO from the 16 local \
             law enforcement agencies (including the Jackson County Sheriff and the Drug Task \
             Force) within Jackson County, MO.",
        );
        ui.add_space(5.0);
        for agency in COVERED_AGENCIES {
            ui.label(format!("• {}", agency));
        }
    }
}
