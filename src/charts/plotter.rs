//! Chart Plotter Module
//! Lays out grouped bars from a chart spec and draws them with egui_plot.

use crate::charts::spec::{ChartSpec, Field};
use crate::data::Period;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};
use std::collections::BTreeMap;

pub const PALETTE: [Color32; 16] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
    Color32::from_rgb(205, 220, 57),  // Lime
    Color32::from_rgb(63, 81, 181),   // Indigo
    Color32::from_rgb(255, 193, 7),   // Amber
    Color32::from_rgb(139, 195, 74),  // Light Green
    Color32::from_rgb(158, 158, 158), // Grey
];

/// Share of each month slot covered by its bars.
const SLOT_WIDTH: f64 = 0.8;

/// One bar: position on the x axis, height and hover text.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub argument: f64,
    pub width: f64,
    pub cases: u64,
    pub tooltip: String,
}

/// All bars of one group, drawn in the group's color.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSeries {
    pub name: String,
    pub color: Color32,
    pub bars: Vec<BarDatum>,
}

/// Grouped bar layout: one slot per month, one offset bar per group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedBars {
    pub periods: Vec<Period>,
    pub series: Vec<GroupSeries>,
}

impl GroupedBars {
    /// Lay out the chart's records.
    ///
    /// Rows sharing a month and group are summed, which is what stacked bars
    /// of the same color show.
    pub fn layout(spec: &ChartSpec) -> Self {
        let group_field = spec.group_field();
        let records = &spec.data.values;

        let mut periods: Vec<Period> = Vec::new();
        for record in records {
            if !periods.contains(&record.period) {
                periods.push(record.period.clone());
            }
        }
        periods.sort();

        let domain = spec.color_domain();
        let mut groups: Vec<String> = Vec::new();
        for record in records {
            let group = group_field.value(record);
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups.sort_by_key(|g| {
            let rank = domain.iter().position(|d| d == g).unwrap_or(domain.len());
            (rank, g.clone())
        });

        let mut totals: BTreeMap<(usize, usize), u64> = BTreeMap::new();
        for record in records {
            let group = group_field.value(record);
            let (Some(p), Some(g)) = (
                periods.iter().position(|p| *p == record.period),
                groups.iter().position(|x| *x == group),
            ) else {
                continue;
            };
            *totals.entry((g, p)).or_default() += u64::from(record.cases);
        }

        let bar_width = if groups.is_empty() {
            SLOT_WIDTH
        } else {
            SLOT_WIDTH / groups.len() as f64
        };

        let series = groups
            .iter()
            .enumerate()
            .map(|(g, group)| {
                let bars = totals
                    .range((g, 0)..(g + 1, 0))
                    .map(|(&(_, p), &cases)| BarDatum {
                        argument: p as f64 - SLOT_WIDTH / 2.0 + (g as f64 + 0.5) * bar_width,
                        width: bar_width,
                        cases,
                        tooltip: Self::tooltip(spec, &periods[p], group, cases),
                    })
                    .collect();
                let color_index = domain.iter().position(|d| d == group).unwrap_or(g);

                GroupSeries {
                    name: group.clone(),
                    color: PALETTE[color_index % PALETTE.len()],
                    bars,
                }
            })
            .collect();

        Self { periods, series }
    }

    /// Hover text listing the chart's tooltip fields.
    fn tooltip(spec: &ChartSpec, period: &Period, group: &str, cases: u64) -> String {
        spec.encoding
            .tooltip
            .iter()
            .map(|def| {
                let value = match def.field {
                    Field::Period => period.to_string(),
                    Field::Cases => cases.to_string(),
                    _ => group.to_string(),
                };
                format!("{}: {}", def.label(), value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Draws grouped bar charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Plot area size in points, taken from the chart's configured dimensions.
    pub fn plot_size(spec: &ChartSpec) -> egui::Vec2 {
        egui::vec2(spec.width as f32, spec.height as f32)
    }

    pub fn draw_grouped_bar_chart(ui: &mut egui::Ui, spec: &ChartSpec, bars: &GroupedBars) {
        ui.label(RichText::new(&spec.title).size(15.0).strong());
        ui.add_space(5.0);

        if bars.is_empty() {
            ui.label(
                RichText::new("No data for the current selection")
                    .size(12.0)
                    .color(Color32::GRAY),
            );
            return;
        }

        let labels: Vec<String> = bars.periods.iter().map(Period::label).collect();
        let slots = labels.len();
        let size = Self::plot_size(spec);

        Plot::new(format!("grouped_bar_{}", spec.group_field().name()))
            .width(size.x)
            .height(size.y)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(spec.encoding.x.label())
            .y_axis_label(spec.encoding.y.label())
            .include_y(0.0)
            .include_x(-0.5)
            .include_x(slots as f64 - 0.5)
            .x_grid_spacer(move |_input| {
                (0..slots)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v < 0.0 || (v - v.round()).abs() > 1e-6 {
                    return String::new();
                }
                labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for series in &bars.series {
                    let chart_bars: Vec<Bar> = series
                        .bars
                        .iter()
                        .map(|b| {
                            Bar::new(b.argument, b.cases as f64)
                                .width(b.width)
                                .name(&b.tooltip)
                                .fill(series.color)
                        })
                        .collect();

                    plot_ui.bar_chart(
                        BarChart::new(chart_bars)
                            .name(&series.name)
                            .color(series.color)
                            .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                                bar.name.clone()
                            })),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CaseRecord;

    fn record(period: &str, agency: &str, cases: u32) -> CaseRecord {
        CaseRecord::new(Period::new(period), agency, cases)
    }

    #[test]
    fn one_slot_per_period_in_calendar_order() {
        let agencies = vec!["KCPD".to_string(), "Raytown PD".to_string()];
        let spec = ChartSpec::by_agency(
            &agencies,
            vec![
                record("2025-02", "KCPD", 20),
                record("2025-01", "KCPD", 10),
                record("2025-01", "Raytown PD", 3),
            ],
        );
        let bars = GroupedBars::layout(&spec);

        assert_eq!(bars.periods, vec![Period::new("2025-01"), Period::new("2025-02")]);
        assert_eq!(bars.series.len(), 2);

        let kcpd = &bars.series[0];
        assert_eq!(kcpd.name, "KCPD");
        assert_eq!(kcpd.bars.len(), 2);
        assert_eq!(kcpd.bars[0].cases, 10);
        assert_eq!(kcpd.bars[1].cases, 20);
        assert!((kcpd.bars[0].width - 0.4).abs() < 1e-9);
        assert!((kcpd.bars[0].argument - -0.2).abs() < 1e-9);
        assert!((kcpd.bars[1].argument - 0.8).abs() < 1e-9);

        let raytown = &bars.series[1];
        assert_eq!(raytown.bars.len(), 1);
        assert!((raytown.bars[0].argument - 0.2).abs() < 1e-9);
    }

    #[test]
    fn colors_follow_the_domain_not_the_view() {
        let agencies: Vec<String> = ["KCPD", "Independence PD", "Buckner PD"]
            .iter()
            .map(|a| a.to_string())
            .collect();
        let spec = ChartSpec::by_agency(&agencies, vec![record("2025-01", "Buckner PD", 1)]);
        let bars = GroupedBars::layout(&spec);

        assert_eq!(bars.series[0].color, PALETTE[2]);
        assert!((bars.series[0].bars[0].width - SLOT_WIDTH).abs() < 1e-9);
    }

    #[test]
    fn duplicate_period_and_group_rows_are_summed() {
        let spec = ChartSpec::by_location(vec![
            record("2025-01", "KCPD", 10),
            record("2025-01", "Grandview PD", 5),
            record("2025-01", "Raytown PD", 7),
            record("2025-01", "Buckner PD", 1),
        ]);
        let bars = GroupedBars::layout(&spec);

        let totals: Vec<(&str, u64)> = bars
            .series
            .iter()
            .map(|s| (s.name.as_str(), s.bars[0].cases))
            .collect();
        assert_eq!(totals, vec![("Downtown", 15), ("Eastern Jack", 8)]);
    }

    #[test]
    fn tooltip_lists_period_group_and_cases() {
        let spec = ChartSpec::by_location(vec![record("2025-03", "KCPD", 12)]);
        let bars = GroupedBars::layout(&spec);
        assert_eq!(
            bars.series[0].bars[0].tooltip,
            "ref_month_yr: 2025-03\nJCPAO Location: Downtown\nCases: 12"
        );
    }

    #[test]
    fn plot_size_uses_configured_width_and_height() {
        let spec = ChartSpec::by_location(vec![record("2025-01", "KCPD", 1)]).sized(640, 300);
        assert_eq!(ChartPlotter::plot_size(&spec), egui::vec2(640.0, 300.0));
    }

    #[test]
    fn empty_view_has_no_bars() {
        let bars = GroupedBars::layout(&ChartSpec::by_location(Vec::new()));
        assert!(bars.is_empty());
        assert!(bars.periods.is_empty());
    }
}
