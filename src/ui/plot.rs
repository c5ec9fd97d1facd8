use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::generate_palette;
use crate::data::series::Series;
use crate::state::{AppState, PlotView};

// ---------------------------------------------------------------------------
// Kinetics plots (central panel)
// ---------------------------------------------------------------------------

/// Render the active chart in the central panel.
pub fn kinetics_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view rate coefficients  (File → Open…)");
        });
        return;
    }

    match state.view {
        PlotView::Arrhenius => arrhenius_plot(ui, state),
        PlotView::PressureDependence => pressure_plot(ui, state),
    }
}

fn plot_points(series: &Series) -> PlotPoints<'_> {
    // The chart cannot place non-finite coordinates; drop them here only.
    series.finite_points().collect()
}

fn arrhenius_plot(ui: &mut Ui, state: &AppState) {
    let temperature_units = state
        .dataset
        .as_ref()
        .map(|ds| ds.units.temperature.as_str())
        .unwrap_or("K");

    Plot::new("arrhenius_plot")
        .legend(Legend::default())
        .x_axis_label(format!("1000 / T  (1/{temperature_units})"))
        .y_axis_label("log10 k")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (series, &owner) in state.series.kseries.iter().zip(&state.series.owners) {
                let color = state.entry_color(owner);
                let width = if state.selected_entry == Some(owner) { 2.5 } else { 1.5 };

                plot_ui.line(
                    Line::new(plot_points(series))
                        .name(&series.label)
                        .color(color)
                        .width(width),
                );
                plot_ui.points(
                    Points::new(plot_points(series))
                        .name(&series.label)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

fn pressure_plot(ui: &mut Ui, state: &AppState) {
    let series = state
        .selected_entry
        .and_then(|idx| state.series.pressure_series_for(idx));
    let Some(series) = series else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No pressure-dependence data for the visible entries");
        });
        return;
    };

    let pressure_units = state
        .dataset
        .as_ref()
        .map(|ds| ds.units.pressure.as_str())
        .unwrap_or("bar");
    let colors = generate_palette(series.len());

    Plot::new("pressure_plot")
        .legend(Legend::default())
        .x_axis_label(format!("log10 P  ({pressure_units})"))
        .y_axis_label("log10 k")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (s, &color) in series.iter().zip(&colors) {
                plot_ui.line(Line::new(plot_points(s)).name(&s.label).color(color).width(1.5));
                plot_ui.points(Points::new(plot_points(s)).name(&s.label).color(color).radius(2.5));
            }
        });
}
