use eframe::egui::{self, Ui};

use crate::cli::Args;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SurveyExplorerApp {
    pub state: AppState,
}

impl SurveyExplorerApp {
    /// Build the app, opening the file and filters given on the command line.
    pub fn new(args: &Args) -> Self {
        let mut state = AppState::default();
        if let Some(path) = &args.file {
            state.load_path(path);
        }
        state.apply_initial_filters(&args.filters);
        Self { state }
    }
}

impl eframe::App for SurveyExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: comparison groups ----
        if let Some(session) = &mut self.state.session {
            if session.is_comparing() {
                egui::SidePanel::right("comparison_panel")
                    .default_width(240.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        panels::comparison_panel(ui, session);
                    });
            }
        }

        // ---- Central panel: charts and table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a survey file to explore it  (File → Open…)");
        });
        return;
    };

    egui::ScrollArea::vertical()
        .id_salt("chart_area")
        .max_height(ui.available_height() * 0.55)
        .show(ui, |ui: &mut Ui| {
            if let Some(comparison) = session.comparison() {
                charts::section(ui, "Group comparison", |ui: &mut Ui| {
                    charts::comparison_grid(ui, comparison);
                });
            }
            if state.charts_visible {
                charts::section(ui, "Charts", |ui: &mut Ui| {
                    charts::chart_grid(ui, state);
                });
            }
        });

    ui.separator();
    table::data_table(ui, session);
}
