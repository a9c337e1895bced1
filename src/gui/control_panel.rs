//! Control Panel Widget
//! Left side panel with the agency, year and month multi-selects.

use crate::data::{FilterDimension, FilterOptions, FilterSelection};
use egui::{Color32, RichText, ScrollArea};

/// Left side filter panel. Every option starts selected.
pub struct ControlPanel {
    pub options: FilterOptions,
    pub selection: FilterSelection,
    pub caption: String,
}

impl ControlPanel {
    pub fn new(options: FilterOptions, caption: impl Into<String>) -> Self {
        let selection = FilterSelection::all(&options);
        Self {
            options,
            selection,
            caption: caption.into(),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.add_space(5.0);
        ui.label(
            RichText::new("Please explore the data using the filters below.")
                .size(16.0)
                .strong(),
        );
        ui.add_space(10.0);
        ui.separator();

        for dimension in FilterDimension::ALL {
            ui.add_space(8.0);
            if self.show_multi_select(ui, dimension) {
                action = ControlPanelAction::SelectionChanged;
            }
            ui.add_space(8.0);
            ui.separator();
        }

        ui.add_space(5.0);
        ui.label(RichText::new(&self.caption).size(11.0).color(Color32::GRAY));

        action
    }

    /// Checkbox list for one filter. Returns true when the selection changed.
    fn show_multi_select(&mut self, ui: &mut egui::Ui, dimension: FilterDimension) -> bool {
        let mut changed = false;
        let total = self.options.values(dimension).len();
        let selected = self.selection.values(dimension).len();

        ui.label(RichText::new(dimension.label()).size(14.0).strong());
        ui.label(
            RichText::new(format!("{} of {} selected", selected, total))
                .size(11.0)
                .color(if selected == 0 {
                    Color32::from_rgb(220, 53, 69)
                } else {
                    Color32::GRAY
                }),
        );
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(dimension.label())
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for value in self.options.values(dimension) {
                            let mut checked = self.selection.is_selected(dimension, value);
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                self.selection.set_selected(dimension, value, checked);
                                changed = true;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.selection.select_all(dimension, &self.options);
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                self.selection.clear(dimension);
                changed = true;
            }
        });

        changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
}
