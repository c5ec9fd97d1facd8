use std::collections::BTreeSet;

use eframe::egui::Color32;

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::model::{KineticsDataset, FACET_SOURCE};
use crate::data::series::{DatasetSeries, SeriesBuilder};

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotView {
    /// log10 k against 1000 / T.
    #[default]
    Arrhenius,
    /// log10 k against log10 P for the selected entry.
    PressureDependence,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<KineticsDataset>,

    /// Per-facet filter selections.
    pub filters: FilterState,

    /// Indices of entries passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Series built from the visible entries (cached).
    pub series: DatasetSeries,

    /// Entry whose pressure-dependence series are plotted.
    pub selected_entry: Option<usize>,

    /// Which facet is used for colouring.
    pub color_column: Option<String>,

    /// Active colour map.
    pub color_map: Option<ColorMap>,

    /// Active chart.
    pub view: PlotView,

    /// Reject invalid entries instead of plotting non-finite points.
    pub strict: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset, initialise filters, colour and series.
    pub fn set_dataset(&mut self, dataset: KineticsDataset) {
        self.filters = init_filter_state(&dataset);
        self.visible_indices = (0..dataset.len()).collect();

        self.color_column = if dataset.unique_values.contains_key(FACET_SOURCE) {
            Some(FACET_SOURCE.to_string())
        } else {
            dataset.facet_names.first().cloned()
        };

        self.dataset = Some(dataset);
        self.selected_entry = None;
        self.status_message = None;
        self.loading = false;
        self.rebuild_color_map();
        self.rebuild_series();
    }

    /// Rebuild the colour map from the current `color_column`.
    pub fn rebuild_color_map(&mut self) {
        self.color_map = match (&self.dataset, &self.color_column) {
            (Some(ds), Some(col)) => ds.unique_values.get(col).map(|vals| ColorMap::new(col, vals)),
            _ => None,
        };
    }

    /// Rebuild the cached series from the visible entries.
    pub fn rebuild_series(&mut self) {
        let Some(ds) = &self.dataset else {
            self.series = DatasetSeries::default();
            return;
        };
        self.series = SeriesBuilder::with_strict(self.strict).build_dataset(ds, &self.visible_indices);

        self.status_message = match self.series.rejected.as_slice() {
            [] => None,
            [(_, e)] => Some(format!("1 entry rejected: {e}")),
            [(_, e), ..] => Some(format!(
                "{} entries rejected, first: {e}",
                self.series.rejected.len()
            )),
        };

        let still_plotted = self
            .selected_entry
            .is_some_and(|idx| self.series.pressure_series_for(idx).is_some());
        if !still_plotted {
            self.selected_entry = self.series.kseries2.first().map(|(idx, _)| *idx);
        }
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
        }
        self.rebuild_series();
    }

    /// Set colour column and rebuild the map.
    pub fn set_color_column(&mut self, col: String) {
        self.color_column = Some(col);
        self.rebuild_color_map();
    }

    /// Switch between lenient and strict series building.
    pub fn set_strict(&mut self, strict: bool) {
        if self.strict != strict {
            self.strict = strict;
            log::info!("Strict validation {}", if strict { "enabled" } else { "disabled" });
            self.rebuild_series();
        }
    }

    /// Choose the entry shown in the pressure-dependence chart.
    pub fn select_entry(&mut self, idx: usize) {
        self.selected_entry = Some(idx);
    }

    /// Colour of the entry at dataset index `idx`, from the colour-by facet.
    pub fn entry_color(&self, idx: usize) -> Color32 {
        let color = (|| {
            let ds = self.dataset.as_ref()?;
            let col = self.color_column.as_ref()?;
            let value = ds.facet_value(idx, col)?;
            Some(self.color_map.as_ref()?.color_for(value))
        })();
        color.unwrap_or(Color32::LIGHT_BLUE)
    }

    /// Toggle a single facet value in a filter.
    pub fn toggle_filter_value(&mut self, facet: &str, value: &str) {
        let selected = self.filters.entry(facet.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values of a facet.
    pub fn select_all(&mut self, facet: &str) {
        let all = self
            .dataset
            .as_ref()
            .and_then(|ds| ds.unique_values.get(facet).cloned());
        if let Some(all_vals) = all {
            self.filters.insert(facet.to_string(), all_vals);
            self.refilter();
        }
    }

    /// Deselect all values of a facet.
    pub fn select_none(&mut self, facet: &str) {
        self.filters.insert(facet.to_string(), BTreeSet::new());
        self.refilter();
    }
}
