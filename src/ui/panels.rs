use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use survey_explorer::{ExplorationSession, FacetIndex, FilterSet, Group};

use crate::color::{GROUP_A, GROUP_B};
use crate::state::AppState;

/// Label of the "no constraint" entry in every filter dropdown.
const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.session.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("Search");
    if ui.text_edit_singleline(&mut state.search_input).changed() {
        state.update_search();
    }
    if ui.button("Clear filters").clicked() {
        state.clear_filters();
    }
    ui.separator();

    let Some(session) = &mut state.session else {
        return;
    };
    let facets = session.filter_facets().clone();
    if facets.is_empty() {
        ui.label("No column has few enough distinct values to filter on.");
        return;
    }

    ScrollArea::vertical()
        .id_salt("main_filters")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let current = session.filters().clone();
            if let Some((column, value)) = facet_combos(ui, "main", &facets, &current) {
                match value {
                    Some(v) => session.set_filter(column, v),
                    None => session.clear_filter(&column),
                }
            }
        });
}

/// One labelled combo box per facet. Returns the column whose selection
/// changed, with `None` meaning "All".
fn facet_combos(
    ui: &mut Ui,
    id_prefix: &str,
    facets: &FacetIndex,
    current: &FilterSet,
) -> Option<(String, Option<String>)> {
    let mut changed = None;

    for facet in facets.iter() {
        let column = &facet.column;
        let selected = current.get(column);

        ui.label(RichText::new(column).strong());
        egui::ComboBox::from_id_salt((id_prefix, column))
            .selected_text(selected.unwrap_or(ALL))
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                if ui.selectable_label(selected.is_none(), ALL).clicked() {
                    changed = Some((column.clone(), None));
                }
                for value in &facet.values {
                    let is_selected = selected == Some(value.as_str());
                    if ui.selectable_label(is_selected, value).clicked() {
                        changed = Some((column.clone(), Some(value.clone())));
                    }
                }
            });
        ui.add_space(4.0);
    }

    changed
}

// ---------------------------------------------------------------------------
// Right side panel – comparison groups
// ---------------------------------------------------------------------------

/// Render the Group A / Group B filters and counts.
pub fn comparison_panel(ui: &mut Ui, session: &mut ExplorationSession) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Compare groups");
        if ui.small_button("Close").clicked() {
            session.disable_comparison();
        }
    });
    ui.separator();

    if !session.is_comparing() {
        return;
    }

    let facets = session.filter_facets().clone();
    let (size_a, size_b) = session.group_sizes().unwrap_or_default();

    ScrollArea::vertical()
        .id_salt("group_filters")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (group, color, size) in [(Group::A, GROUP_A, size_a), (Group::B, GROUP_B, size_b)] {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new(group.label()).strong().color(color));
                    ui.label(format!("{size} rows"));
                    if ui.small_button("Clear").clicked() {
                        session.clear_group(group);
                    }
                });

                let current = session.group_filters(group).cloned().unwrap_or_default();
                let prefix = group.label();
                if let Some((column, value)) = facet_combos(ui, prefix, &facets, &current) {
                    match value {
                        Some(v) => session.set_group_filter(group, column, v),
                        None => session.clear_group_filter(group, &column),
                    }
                }
                ui.separator();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            let can_export = state
                .session
                .as_ref()
                .is_some_and(|s| s.visible_count() > 0);
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state, "csv");
                ui.close_menu();
            }
            if ui
                .add_enabled(can_export, egui::Button::new("Export JSON…"))
                .clicked()
            {
                export_file_dialog(state, "json");
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{} rows loaded, {} visible",
                session.dataset().row_count(),
                session.visible_count()
            ));
        }

        ui.separator();

        let charts_label = if state.charts_visible {
            "Hide Charts"
        } else {
            "Show Charts"
        };
        if ui.selectable_label(state.charts_visible, charts_label).clicked() {
            state.charts_visible = !state.charts_visible;
        }

        if let Some(session) = &mut state.session {
            let comparing = session.is_comparing();
            if ui.selectable_label(comparing, "Compare groups").clicked() {
                if comparing {
                    session.disable_comparison();
                } else {
                    session.enable_comparison();
                }
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey data")
        .add_filter("Supported files", &["csv", "xlsx", "xls", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState, extension: &str) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .set_file_name(state.export_file_name(extension))
        .add_filter(extension.to_ascii_uppercase(), &[extension])
        .save_file();

    if let Some(path) = file {
        state.export_visible(&path);
    }
}
