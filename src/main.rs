mod app;
mod args;
mod color;
mod data;
mod export;
mod state;
mod ui;

use anyhow::Context;
use app::KineticsPlotApp;
use args::Args;
use clap::Parser;
use data::series::SeriesBuilder;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let (Some(file), Some(out)) = (&args.file, &args.export) {
        let dataset = data::loader::load_file(file)?;
        let visible: Vec<usize> = (0..dataset.len()).collect();
        let built = SeriesBuilder::with_strict(args.strict).build_dataset(&dataset, &visible);
        for (idx, e) in &built.rejected {
            log::warn!("entry {idx} rejected: {e}");
        }
        return export::write_json(out, &export::SeriesExport::new(&dataset, &built))
            .context("exporting series");
    }

    let mut state = AppState::new(args.strict);
    if let Some(file) = &args.file {
        match data::loader::load_file(file) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Kinetics Plot – Rate Coefficient Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(KineticsPlotApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
