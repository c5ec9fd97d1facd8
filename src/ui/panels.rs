use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::series::SeriesBuilder;
use crate::export::{write_json, SeriesExport};
use crate::state::{AppState, PlotView};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let facets = dataset.facet_names.clone();
    let unique = dataset.unique_values.clone();
    let mut toggled: Vec<(String, String)> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Colour-by selector ----
            ui.strong("Color by");
            let current_color_col = state.color_column.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(&current_color_col)
                .show_ui(ui, |ui: &mut Ui| {
                    for facet in &facets {
                        if ui
                            .selectable_label(current_color_col == *facet, facet)
                            .clicked()
                        {
                            state.set_color_column(facet.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Per-facet filter widgets (collapsible) ----
            for facet in &facets {
                let Some(all_values) = unique.get(facet) else {
                    continue;
                };

                let n_selected = state.filters.get(facet).map_or(0, |s| s.len());
                let header_text = format!("{facet}  ({n_selected}/{})", all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(facet)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(facet);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(facet);
                            }
                        });

                        for value in all_values {
                            let mut text = RichText::new(value);
                            if let Some(cm) = state.color_map.as_ref().filter(|cm| cm.facet == *facet) {
                                text = text.color(cm.color_for(value));
                            }

                            let mut checked = state
                                .filters
                                .get(facet)
                                .is_some_and(|selected| selected.contains(value));
                            if ui.checkbox(&mut checked, text).changed() {
                                toggled.push((facet.clone(), value.clone()));
                            }
                        }
                    });
            }
        });

    for (facet, value) in toggled {
        state.toggle_filter_value(&facet, &value);
    }
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
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export series…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, PlotView::Arrhenius, "k vs 1000/T");
        ui.selectable_value(&mut state.view, PlotView::PressureDependence, "k vs P");

        ui.separator();

        let mut strict = state.strict;
        if ui.checkbox(&mut strict, "Strict").changed() {
            state.set_strict(strict);
        }

        if let Some(ds) = &state.dataset {
            ui.separator();
            ui.label(format!(
                "{} entries loaded, {} visible, {} series",
                ds.len(),
                state.visible_indices.len(),
                state.series.kseries.len()
            ));
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open kinetics data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export series")
        .set_file_name("series.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        let built = SeriesBuilder::with_strict(state.strict).build_dataset(dataset, &state.visible_indices);
        if let Err(e) = write_json(&path, &SeriesExport::new(dataset, &built)) {
            log::error!("Failed to export series: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
