use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use survey_explorer::ExplorationSession;

const ROW_HEIGHT: f32 = 18.0;

/// Render the visible rows. Rows are laid out lazily, so large surveys
/// only pay for what is on screen.
pub fn data_table(ui: &mut Ui, session: &ExplorationSession) {
    let dataset = session.dataset();
    let columns = dataset.columns();
    let view = session.visible();

    if columns.is_empty() {
        ui.label("The dataset has no columns.");
        return;
    }
    if view.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .columns(Column::auto().at_least(60.0).clip(true), columns.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for col in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let row_index = view.indices()[row.index()];
                for col in columns {
                    row.col(|ui: &mut Ui| {
                        let text = dataset
                            .value_at(row_index, col)
                            .map(|cell| cell.to_string())
                            .unwrap_or_default();
                        ui.label(text);
                    });
                }
            });
        });
}
