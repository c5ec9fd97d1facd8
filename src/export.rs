use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::label::LabelParts;
use crate::data::model::KineticsDataset;
use crate::data::series::{DatasetSeries, Series};

// ---------------------------------------------------------------------------
// Series export (JSON)
// ---------------------------------------------------------------------------

/// Pressure-dependence series of one entry.
#[derive(Debug, Serialize)]
pub struct EntryPressureSeries<'a> {
    pub entry: String,
    pub series: &'a [Series],
}

/// Export document:
///
/// ```json
/// {
///   "kseries":  [["R1. NIST", [[1.0, 1.0]]], ...],
///   "kseries2": [{ "entry": "R2. Library", "series": [["300 K", [[-1.0, 2.3]]]] }]
/// }
/// ```
///
/// Non-finite coordinates serialize as `null`.
#[derive(Debug, Serialize)]
pub struct SeriesExport<'a> {
    pub kseries: &'a [Series],
    pub kseries2: Vec<EntryPressureSeries<'a>>,
}

impl<'a> SeriesExport<'a> {
    pub fn new(dataset: &KineticsDataset, built: &'a DatasetSeries) -> Self {
        let kseries2 = built
            .kseries2
            .iter()
            .filter_map(|(idx, series)| {
                let entry = dataset.entries.get(*idx)?;
                Some(EntryPressureSeries {
                    entry: LabelParts::from(entry).single_pressure(),
                    series,
                })
            })
            .collect();
        Self {
            kseries: &built.kseries,
            kseries2,
        }
    }
}

/// Write `export` as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, export: &SeriesExport<'_>) -> Result<()> {
    let text = serde_json::to_string_pretty(export).context("serializing series")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Exported {} Arrhenius and {} pressure-dependence series groups to {}",
        export.kseries.len(),
        export.kseries2.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{KineticsEntry, RateTable, Units};
    use crate::data::series::SeriesBuilder;
    use serde_json::json;

    fn dataset() -> KineticsDataset {
        let mut flat = KineticsEntry::new("R1", "NIST");
        flat.temperatures = vec![1000.0];
        flat.rates = RateTable::Flat(vec![10.0]);

        let mut pdep = KineticsEntry::new("R2", "Library");
        pdep.temperatures = vec![1000.0];
        pdep.pressures = vec![1.0];
        pdep.rates = RateTable::ByPressure(vec![vec![100.0]]);
        pdep.pdep_temperatures = vec![1000.0];
        pdep.pdep_pressures = vec![1.0];
        pdep.pdep_rates = vec![vec![10.0]];

        KineticsDataset::from_entries(vec![flat, pdep], Units::default())
    }

    #[test]
    fn export_document_shape() {
        let ds = dataset();
        let built = SeriesBuilder::default().build_dataset(&ds, &[0, 1]);
        let export = SeriesExport::new(&ds, &built);

        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["kseries"][0], json!(["R1. NIST", [[1.0, 1.0]]]));
        assert_eq!(value["kseries"][1][0], json!("R2. Library (1 bar)"));
        assert_eq!(
            value["kseries2"],
            json!([{"entry": "R2. Library", "series": [["1000 K", [[0.0, 1.0]]]]}])
        );
    }

    #[test]
    fn non_finite_points_become_null() {
        let mut entry = KineticsEntry::new("R", "S");
        entry.temperatures = vec![1000.0];
        entry.rates = RateTable::Flat(vec![0.0]);
        let ds = KineticsDataset::from_entries(vec![entry], Units::default());
        let built = SeriesBuilder::lenient().build_dataset(&ds, &[0]);

        let value = serde_json::to_value(SeriesExport::new(&ds, &built)).unwrap();
        assert_eq!(value["kseries"][0][1], json!([[1.0, null]]));
    }

    #[test]
    fn writes_file() {
        let ds = dataset();
        let built = SeriesBuilder::default().build_dataset(&ds, &[0]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.json");

        write_json(&path, &SeriesExport::new(&ds, &built)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["kseries"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["kseries2"], json!([]));
    }
}
