mod app;
mod cli;
mod color;
mod state;
mod ui;

use app::SurveyExplorerApp;
use clap::Parser;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();
    let args = cli::Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Survey Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(SurveyExplorerApp::new(&args)))),
    )
}
