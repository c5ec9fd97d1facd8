use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::label::LabelParts;
use crate::data::model::RateTable;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Entry table (bottom panel)
// ---------------------------------------------------------------------------

/// Render the visible entries; clicking a row selects the entry plotted in
/// the pressure-dependence chart.
pub fn entry_table(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    let rows: Vec<(usize, String, String, String, bool)> = state
        .visible_indices
        .iter()
        .filter_map(|&idx| {
            let entry = dataset.entries.get(idx)?;
            let grid = match &entry.rates {
                RateTable::Flat(_) => format!("{} T", entry.temperatures.len()),
                RateTable::ByPressure(_) => {
                    format!("{} T × {} P", entry.temperatures.len(), entry.pressures.len())
                }
            };
            let pdep = if entry.pdep_pressures.is_empty() {
                "–".to_string()
            } else {
                format!("{} T × {} P", entry.pdep_temperatures.len(), entry.pdep_pressures.len())
            };
            Some((idx, LabelParts::from(entry).single_pressure(), grid, pdep, !entry.pdep_pressures.is_empty()))
        })
        .collect();

    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::remainder().at_least(200.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .header(20.0, |mut header| {
            for title in ["#", "Entry", "k(T) grid", "k(P) grid"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (idx, label, grid, pdep, has_pdep) in &rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(idx.to_string());
                    });
                    row.col(|ui| {
                        let selected = state.selected_entry == Some(*idx);
                        let text = RichText::new(label).color(state.entry_color(*idx));
                        if ui.selectable_label(selected, text).clicked() && *has_pdep {
                            clicked = Some(*idx);
                        }
                    });
                    row.col(|ui| {
                        ui.label(grid);
                    });
                    row.col(|ui| {
                        ui.label(pdep);
                    });
                });
            }
        });

    if let Some(idx) = clicked {
        state.select_entry(idx);
    }
}
