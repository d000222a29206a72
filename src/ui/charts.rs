use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use survey_explorer::{Comparison, ComparisonTable, FrequencyTable};

use crate::color::{ColorMap, GROUP_A, GROUP_B};
use crate::state::AppState;

const CHART_WIDTH: f32 = 320.0;
const CHART_HEIGHT: f32 = 200.0;

// ---------------------------------------------------------------------------
// Chart grid (single mode)
// ---------------------------------------------------------------------------

/// Render one bar chart per chartable column of the visible rows.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        return;
    };
    if session.charts().is_empty() {
        ui.label("No column has few enough distinct values to chart.");
        return;
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for table in session.charts() {
            ui.group(|ui: &mut Ui| {
                ui.set_width(CHART_WIDTH);
                ui.label(RichText::new(&table.column).strong());
                frequency_chart(ui, table, state.color_map(&table.column));
            });
        }
    });
}

/// Plain bar chart of one frequency table, one bar per value.
fn frequency_chart(ui: &mut Ui, table: &FrequencyTable, colors: Option<&ColorMap>) {
    let labels: Vec<String> = table.iter().map(|(v, _)| v.to_string()).collect();
    let bars: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(i, (value, count))| {
            let color = colors.map_or(GROUP_A, |c| c.color_for(value));
            Bar::new(i as f64, count as f64)
                .name(value)
                .fill(color)
                .width(0.7)
        })
        .collect();

    Plot::new(("chart", &table.column))
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Comparison charts
// ---------------------------------------------------------------------------

/// Render grouped bar charts for the comparison, or the reason there are none.
pub fn comparison_grid(ui: &mut Ui, comparison: &Comparison) {
    let message = match comparison {
        Comparison::NoData => "Select filters to compare data",
        Comparison::NoComparableColumns => "No chartable columns found",
        Comparison::Charts(tables) => {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for table in tables {
                    ui.group(|ui: &mut Ui| {
                        ui.set_width(CHART_WIDTH);
                        ui.label(RichText::new(&table.column).strong());
                        comparison_chart(ui, table);
                    });
                }
            });
            return;
        }
    };
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(message).color(Color32::GRAY));
    });
}

/// Two bars per value, Group A on the left.
fn comparison_chart(ui: &mut Ui, table: &ComparisonTable) {
    let labels = table.domain.clone();
    let offset = 0.2;

    let group_bars = |counts: &[usize], shift: f64, color: Color32| -> Vec<Bar> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                Bar::new(i as f64 + shift, count as f64)
                    .name(&table.domain[i])
                    .fill(color)
                    .width(0.38)
            })
            .collect()
    };

    let chart_a = BarChart::new(group_bars(&table.counts_a, -offset, GROUP_A))
        .name("Group A")
        .color(GROUP_A);
    let chart_b = BarChart::new(group_bars(&table.counts_b, offset, GROUP_B))
        .name("Group B")
        .color(GROUP_B);

    Plot::new(("compare", &table.column))
        .height(CHART_HEIGHT)
        .legend(Legend::default().position(egui_plot::Corner::RightTop))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart_a);
            plot_ui.bar_chart(chart_b);
        });
}

/// Axis label for a category position; blank between categories.
fn category_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > f64::EPSILON || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Collapsible header shared by both chart sections.
pub fn section(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::CollapsingHeader::new(RichText::new(title).strong())
        .default_open(true)
        .show(ui, add_contents);
}
