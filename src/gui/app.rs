//! Dashboard Main Application
//! Main window with filter panel and chart viewer.

use crate::config::DashboardConfig;
use crate::data::{CaseTable, FilterEngine, FilterOptions};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::{Color32, RichText, SidePanel};
use std::sync::Arc;
use tracing::info;

/// Loaded dashboard: immutable base table plus per-session view state.
struct Dashboard {
    table: Arc<CaseTable>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl Dashboard {
    fn new(table: Arc<CaseTable>, config: &DashboardConfig) -> Self {
        let options = FilterOptions::from_table(&table);
        info!(
            agencies = options.agencies.len(),
            years = options.years.len(),
            months = options.months.len(),
            "Filter options ready"
        );

        let mut dashboard = Self {
            control_panel: ControlPanel::new(options, config.data_as_of.clone()),
            chart_viewer: ChartViewer::new(config.chart_width, config.chart_height),
            table,
        };
        dashboard.refresh();
        dashboard
    }

    /// Re-run filtering and chart layout for the current selection.
    fn refresh(&mut self) {
        let views = FilterEngine::apply(self.table.records(), &self.control_panel.selection);
        self.chart_viewer.set_views(views, self.table.agencies());
    }
}

enum AppState {
    Ready(Dashboard),
    /// Startup failed; only the error is shown.
    Failed(String),
}

/// Main application window.
pub struct DashboardApp {
    title: String,
    state: AppState,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        dataset: anyhow::Result<Arc<CaseTable>>,
    ) -> Self {
        let state = match dataset {
            Ok(table) => AppState::Ready(Dashboard::new(table, &config)),
            Err(e) => AppState::Failed(format!("{:#}", e)),
        };

        Self {
            title: config.title,
            state,
        }
    }

    fn show_error(ui: &mut egui::Ui, error: &str) {
        ui.add_space(20.0);
        ui.label(
            RichText::new("⚠ Unable to load case data")
                .size(18.0)
                .strong()
                .color(Color32::from_rgb(220, 53, 69)),
        );
        ui.add_space(8.0);
        ui.label(RichText::new(error).size(13.0));
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let AppState::Ready(dashboard) = &mut self.state {
            SidePanel::left("control_panel")
                .min_width(280.0)
                .max_width(340.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        match dashboard.control_panel.show(ui) {
                            ControlPanelAction::SelectionChanged => dashboard.refresh(),
                            ControlPanelAction::None => {}
                        }
                    });
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(
                RichText::new(&self.title)
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.add_space(10.0);

            match &self.state {
                AppState::Ready(dashboard) => dashboard.chart_viewer.show(ui),
                AppState::Failed(error) => Self::show_error(ui, error),
            }
        });
    }
}
