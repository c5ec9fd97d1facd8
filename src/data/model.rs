use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Reference – bibliographic citation attached to an entry
// ---------------------------------------------------------------------------

/// A literature citation. Only the first author and the year are displayed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Reference {
    /// Surname of the first author: the text before the first comma, with
    /// HTML apostrophe entities turned back into plain apostrophes.
    pub fn first_author(&self) -> Option<String> {
        let first = self.authors.first()?;
        let surname = first.split(',').next().unwrap_or("");
        Some(surname.replace("&#39;", "'"))
    }
}

// ---------------------------------------------------------------------------
// RateTable – the `klist` matrix
// ---------------------------------------------------------------------------

/// Rate coefficients for one entry.
///
/// `Flat` is indexed by temperature (single-pressure mode), `ByPressure` is
/// indexed `[pressure][temperature]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RateTable {
    Flat(Vec<f64>),
    ByPressure(Vec<Vec<f64>>),
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable::Flat(Vec::new())
    }
}

impl RateTable {
    /// Rate at `temperature` in single-pressure mode. A pressure-indexed table
    /// has no such value and yields `NaN`, as does an out-of-range index.
    pub fn flat_rate(&self, temperature: usize) -> f64 {
        match self {
            RateTable::Flat(rates) => rates.get(temperature).copied().unwrap_or(f64::NAN),
            RateTable::ByPressure(_) => f64::NAN,
        }
    }

    /// Rate at (`pressure`, `temperature`). A flat table yields `NaN`.
    pub fn rate_at(&self, pressure: usize, temperature: usize) -> f64 {
        match self {
            RateTable::ByPressure(rows) => rows
                .get(pressure)
                .and_then(|row| row.get(temperature))
                .copied()
                .unwrap_or(f64::NAN),
            RateTable::Flat(_) => f64::NAN,
        }
    }
}

// ---------------------------------------------------------------------------
// KineticsEntry – one rate expression and its tabulated values
// ---------------------------------------------------------------------------

/// One kinetics entry: display metadata plus the tabulated grids for the
/// Arrhenius view (`Tlist`/`Plist`/`klist`) and the pressure-dependence
/// view (`Tlist2`/`Plist2`/`klist2`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KineticsEntry {
    pub result: String,
    pub source: String,
    /// Position within the source. `-1` on disk means "no index".
    #[serde(default, deserialize_with = "deserialize_index")]
    pub index: Option<i64>,
    /// `false` marks a rate computed for the reverse direction.
    #[serde(default = "default_forward")]
    pub forward: bool,
    #[serde(default)]
    pub reference: Option<Reference>,

    #[serde(rename = "Tlist", default)]
    pub temperatures: Vec<f64>,
    #[serde(rename = "Plist", default)]
    pub pressures: Vec<f64>,
    #[serde(rename = "klist", default)]
    pub rates: RateTable,

    #[serde(rename = "Tlist2", default)]
    pub pdep_temperatures: Vec<f64>,
    #[serde(rename = "Plist2", default)]
    pub pdep_pressures: Vec<f64>,
    /// Indexed `[pressure][temperature]`.
    #[serde(rename = "klist2", default)]
    pub pdep_rates: Vec<Vec<f64>>,
}

fn default_forward() -> bool {
    true
}

fn deserialize_index<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.filter(|&i| i != -1))
}

impl KineticsEntry {
    /// A forward entry with no index, reference or tabulated data.
    pub fn new(result: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            source: source.into(),
            index: None,
            forward: true,
            reference: None,
            temperatures: Vec::new(),
            pressures: Vec::new(),
            rates: RateTable::default(),
            pdep_temperatures: Vec::new(),
            pdep_pressures: Vec::new(),
            pdep_rates: Vec::new(),
        }
    }

    /// Whether the Arrhenius view has one series per pressure.
    pub fn is_pressure_dependent(&self) -> bool {
        !self.pressures.is_empty()
    }

    /// Facet values used by the filter panel and the colour map.
    pub fn facets(&self) -> BTreeMap<String, String> {
        let direction = if self.forward { "forward" } else { "reverse" };
        let author = self
            .reference
            .as_ref()
            .and_then(Reference::first_author)
            .unwrap_or_else(|| NO_AUTHOR.to_string());

        BTreeMap::from([
            (FACET_SOURCE.to_string(), self.source.clone()),
            (FACET_RESULT.to_string(), self.result.clone()),
            (FACET_DIRECTION.to_string(), direction.to_string()),
            (FACET_AUTHOR.to_string(), author),
        ])
    }
}

pub const FACET_SOURCE: &str = "source";
pub const FACET_RESULT: &str = "result";
pub const FACET_DIRECTION: &str = "direction";
pub const FACET_AUTHOR: &str = "author";
pub const NO_AUTHOR: &str = "<none>";

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Display units shared by every entry of a dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Units {
    #[serde(rename = "Tunits", default = "default_temperature_units")]
    pub temperature: String,
    #[serde(rename = "Punits", default = "default_pressure_units")]
    pub pressure: String,
}

fn default_temperature_units() -> String {
    "K".to_string()
}

fn default_pressure_units() -> String {
    "bar".to_string()
}

impl Default for Units {
    fn default() -> Self {
        Self {
            temperature: default_temperature_units(),
            pressure: default_pressure_units(),
        }
    }
}

// ---------------------------------------------------------------------------
// KineticsDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed facet indices.
#[derive(Debug, Clone)]
pub struct KineticsDataset {
    pub entries: Vec<KineticsEntry>,
    pub units: Units,
    /// Ordered facet names.
    pub facet_names: Vec<String>,
    /// For each facet the sorted set of values present.
    pub unique_values: BTreeMap<String, BTreeSet<String>>,
    /// Facet values per entry, parallel to `entries`.
    pub facets: Vec<BTreeMap<String, String>>,
}

impl KineticsDataset {
    /// Build facet indices from the loaded entries.
    pub fn from_entries(entries: Vec<KineticsEntry>, units: Units) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        let facets: Vec<BTreeMap<String, String>> = entries.iter().map(KineticsEntry::facets).collect();
        for entry_facets in &facets {
            for (facet, value) in entry_facets {
                unique_values.entry(facet.clone()).or_default().insert(value.clone());
            }
        }
        let facet_names: Vec<String> = unique_values.keys().cloned().collect();
        KineticsDataset {
            entries,
            units,
            facet_names,
            unique_values,
            facets,
        }
    }

    /// Value of `facet` for the entry at `idx`.
    pub fn facet_value(&self, idx: usize, facet: &str) -> Option<&str> {
        self.facets.get(idx)?.get(facet).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_one_index_means_no_index() {
        let entry: KineticsEntry = serde_json::from_str(
            r#"{"result": "R1", "source": "NIST", "index": -1, "Tlist": [1000], "klist": [10]}"#,
        )
        .unwrap();
        assert_eq!(entry.index, None);
        assert!(entry.forward);
        assert_eq!(entry.rates, RateTable::Flat(vec![10.0]));

        let indexed: KineticsEntry =
            serde_json::from_str(r#"{"result": "R1", "source": "NIST", "index": 4}"#).unwrap();
        assert_eq!(indexed.index, Some(4));
    }

    #[test]
    fn nested_klist_parses_as_pressure_table() {
        let entry: KineticsEntry = serde_json::from_str(
            r#"{"result": "R2", "source": "Lib", "Tlist": [300, 400], "Plist": [0.1, 1],
                "klist": [[1, 2], [3, 4]]}"#,
        )
        .unwrap();
        assert!(entry.is_pressure_dependent());
        assert_eq!(entry.rates.rate_at(1, 0), 3.0);
        assert!(entry.rates.flat_rate(0).is_nan());
    }

    #[test]
    fn first_author_is_cut_at_comma_and_unescaped() {
        let reference = Reference {
            authors: vec!["O&#39;Brien, J.".to_string(), "Smith, A.".to_string()],
            year: Some(1998),
        };
        assert_eq!(reference.first_author().as_deref(), Some("O'Brien"));

        let empty = Reference { authors: vec![], year: Some(2001) };
        assert_eq!(empty.first_author(), None);
    }

    #[test]
    fn dataset_collects_facet_values() {
        let mut reverse = KineticsEntry::new("R2", "Training");
        reverse.forward = false;
        let dataset = KineticsDataset::from_entries(
            vec![KineticsEntry::new("R1", "NIST"), reverse],
            Units::default(),
        );

        assert_eq!(dataset.len(), 2);
        let directions = &dataset.unique_values[FACET_DIRECTION];
        assert!(directions.contains("forward") && directions.contains("reverse"));
        assert!(dataset.unique_values[FACET_AUTHOR].contains(NO_AUTHOR));
        assert_eq!(dataset.facet_names.len(), 4);
    }

    #[test]
    fn facet_values_are_cached_per_entry() {
        let mut cited = KineticsEntry::new("R1", "NIST");
        cited.reference = Some(Reference {
            authors: vec!["Baulch, D. L.".to_string()],
            year: Some(2005),
        });
        let dataset = KineticsDataset::from_entries(
            vec![cited, KineticsEntry::new("R2", "Training")],
            Units::default(),
        );

        assert_eq!(dataset.facets.len(), dataset.len());
        for (idx, entry) in dataset.entries.iter().enumerate() {
            assert_eq!(dataset.facets[idx], entry.facets());
        }
        assert_eq!(dataset.facet_value(0, FACET_AUTHOR), Some("Baulch"));
        assert_eq!(dataset.facet_value(1, FACET_SOURCE), Some("Training"));
        assert_eq!(dataset.facet_value(2, FACET_SOURCE), None);
        assert_eq!(dataset.facet_value(0, "colour"), None);
    }
}
