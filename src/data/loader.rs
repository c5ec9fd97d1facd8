use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{KineticsDataset, KineticsEntry, RateTable, Reference, Units};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a kinetics dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `{ "Tunits", "Punits", "entries": [...] }` with per-entry
///   `Tlist`/`Plist`/`klist` and `Tlist2`/`Plist2`/`klist2` arrays
/// * `.csv`     – long format, one rate coefficient per row
/// * `.parquet` – the same long format as CSV
pub fn load_file(path: &Path) -> Result<KineticsDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if dataset.is_empty() {
        log::warn!("{} contains no kinetics entries", path.display());
    }
    log::info!(
        "Loaded {} kinetics entries from {} (T in {}, P in {})",
        dataset.len(),
        path.display(),
        dataset.units.temperature,
        dataset.units.pressure
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct KineticsFile {
    #[serde(flatten)]
    units: Units,
    entries: Vec<KineticsEntry>,
}

/// Expected JSON schema:
///
/// ```json
/// {
///   "Tunits": "K",
///   "Punits": "bar",
///   "entries": [
///     {
///       "result": "1", "source": "NIST", "index": -1, "forward": true,
///       "reference": { "authors": ["Baulch, D. L."], "year": 2005 },
///       "Tlist": [300.0, 1000.0], "Plist": [], "klist": [1.2e3, 4.5e6],
///       "Tlist2": [], "Plist2": [], "klist2": []
///     }
///   ]
/// }
/// ```
///
/// A bare top-level array of entries is accepted too, with default units.
fn load_json(path: &Path) -> Result<KineticsDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<KineticsDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let file = if root.is_array() {
        let entries: Vec<KineticsEntry> =
            serde_json::from_value(root).context("decoding entry array")?;
        KineticsFile {
            units: Units::default(),
            entries,
        }
    } else if root.is_object() {
        serde_json::from_value(root).context("decoding kinetics file")?
    } else {
        bail!("Expected a JSON object or array at top level");
    };

    Ok(KineticsDataset::from_entries(file.entries, file.units))
}

// ---------------------------------------------------------------------------
// Long format shared by CSV and Parquet
// ---------------------------------------------------------------------------

/// Which grid of an entry a long-format row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridKind {
    Arrhenius,
    Pressure,
}

impl GridKind {
    fn parse(s: Option<&str>) -> Result<Self> {
        match s.map(str::trim).unwrap_or("") {
            "" | "arrhenius" => Ok(GridKind::Arrhenius),
            "pressure" => Ok(GridKind::Pressure),
            other => bail!("unknown grid '{other}' (expected 'arrhenius' or 'pressure')"),
        }
    }
}

/// One row of a long-format table: a single rate coefficient.
#[derive(Debug, Clone)]
struct LongRow {
    result: String,
    source: String,
    index: Option<i64>,
    forward: bool,
    authors: Option<String>,
    year: Option<i32>,
    grid: GridKind,
    temperature: f64,
    pressure: Option<f64>,
    rate: f64,
    temperature_units: Option<String>,
    pressure_units: Option<String>,
}

type EntryKey = (String, String, Option<i64>, bool);

/// Distinct axis values in first-appearance order plus the cells seen so far.
#[derive(Debug, Default)]
struct GridAccumulator {
    temperatures: Vec<f64>,
    pressures: Vec<f64>,
    cells: Vec<(Option<usize>, usize, f64)>,
    filled: HashSet<(Option<usize>, usize)>,
    duplicates: usize,
}

fn position_or_push(values: &mut Vec<f64>, value: f64) -> usize {
    match values.iter().position(|&v| v == value) {
        Some(i) => i,
        None => {
            values.push(value);
            values.len() - 1
        }
    }
}

impl GridAccumulator {
    fn add(&mut self, temperature: f64, pressure: Option<f64>, rate: f64) {
        let i = position_or_push(&mut self.temperatures, temperature);
        let j = pressure.map(|p| position_or_push(&mut self.pressures, p));
        if !self.filled.insert((j, i)) {
            self.duplicates += 1;
        }
        self.cells.push((j, i, rate));
    }

    fn mixes_pressure_modes(&self) -> bool {
        let with_pressure = self.cells.iter().filter(|(j, _, _)| j.is_some()).count();
        with_pressure != 0 && with_pressure != self.cells.len()
    }

    /// `[pressure][temperature]` matrix, `NaN` where no row supplied a value.
    fn matrix(&self) -> Vec<Vec<f64>> {
        let mut rows = vec![vec![f64::NAN; self.temperatures.len()]; self.pressures.len()];
        for &(j, i, rate) in &self.cells {
            if let Some(j) = j {
                rows[j][i] = rate;
            }
        }
        rows
    }

    fn flat(&self) -> Vec<f64> {
        let mut rates = vec![f64::NAN; self.temperatures.len()];
        for &(_, i, rate) in &self.cells {
            rates[i] = rate;
        }
        rates
    }

    fn missing_cells(&self) -> usize {
        let expected = self.temperatures.len() * self.pressures.len().max(1);
        expected.saturating_sub(self.filled.len())
    }
}

struct EntryAccumulator {
    entry: KineticsEntry,
    authors: Option<String>,
    year: Option<i32>,
    arrhenius: GridAccumulator,
    pressure: GridAccumulator,
}

impl EntryAccumulator {
    /// Citation from the first `authors` cell and the first `year` seen for
    /// the entry, which need not share a row.
    fn reference(&self) -> Option<Reference> {
        if self.authors.is_none() && self.year.is_none() {
            return None;
        }
        let authors = self
            .authors
            .as_deref()
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();
        Some(Reference {
            authors,
            year: self.year,
        })
    }
}

/// Group long-format rows into entries, preserving first-appearance order.
fn assemble_entries(rows: Vec<LongRow>) -> Result<KineticsDataset> {
    let mut order: Vec<EntryAccumulator> = Vec::new();
    let mut lookup: HashMap<EntryKey, usize> = HashMap::new();
    let mut units = Units::default();
    let mut temperature_units: Option<String> = None;
    let mut pressure_units: Option<String> = None;

    for row in rows {
        if temperature_units.is_none() {
            temperature_units = row.temperature_units.clone().filter(|u| !u.is_empty());
        }
        if pressure_units.is_none() {
            pressure_units = row.pressure_units.clone().filter(|u| !u.is_empty());
        }

        let key: EntryKey = (row.result.clone(), row.source.clone(), row.index, row.forward);
        let slot = *lookup.entry(key).or_insert_with(|| {
            let mut entry = KineticsEntry::new(row.result.clone(), row.source.clone());
            entry.index = row.index;
            entry.forward = row.forward;
            order.push(EntryAccumulator {
                entry,
                authors: None,
                year: None,
                arrhenius: GridAccumulator::default(),
                pressure: GridAccumulator::default(),
            });
            order.len() - 1
        });
        let acc = &mut order[slot];

        if acc.authors.is_none() {
            acc.authors = row.authors.filter(|a| !a.trim().is_empty());
        }
        if acc.year.is_none() {
            acc.year = row.year;
        }

        match row.grid {
            GridKind::Arrhenius => acc.arrhenius.add(row.temperature, row.pressure, row.rate),
            GridKind::Pressure => acc.pressure.add(row.temperature, row.pressure, row.rate),
        }
    }

    if let Some(t) = temperature_units {
        units.temperature = t;
    }
    if let Some(p) = pressure_units {
        units.pressure = p;
    }

    let mut entries = Vec::with_capacity(order.len());
    for acc in order {
        let reference = acc.reference();
        let mut entry = acc.entry;
        entry.reference = reference;
        let label = format!("{}. {}", entry.result, entry.source);

        if acc.arrhenius.mixes_pressure_modes() {
            bail!("entry '{label}': Arrhenius rows mix blank and non-blank pressures");
        }
        for (grid, cells) in [("Arrhenius", &acc.arrhenius), ("pressure", &acc.pressure)] {
            let missing = cells.missing_cells();
            if missing > 0 {
                log::warn!("entry '{label}': {missing} {grid} grid cells missing, filled with NaN");
            }
            if cells.duplicates > 0 {
                log::warn!(
                    "entry '{label}': {} duplicate {grid} rows, the last value for each cell is kept",
                    cells.duplicates
                );
            }
        }

        entry.rates = if acc.arrhenius.pressures.is_empty() {
            RateTable::Flat(acc.arrhenius.flat())
        } else {
            RateTable::ByPressure(acc.arrhenius.matrix())
        };
        entry.pdep_rates = acc.pressure.matrix();
        entry.temperatures = acc.arrhenius.temperatures;
        entry.pressures = acc.arrhenius.pressures;
        entry.pdep_temperatures = acc.pressure.temperatures;
        entry.pdep_pressures = acc.pressure.pressures;
        entries.push(entry);
    }

    Ok(KineticsDataset::from_entries(entries, units))
}

fn parse_forward(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}

fn normalize_index(index: Option<i64>) -> Option<i64> {
    index.filter(|&i| i != -1)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one rate coefficient per row.
///
/// Required columns: `result`, `source`, `T`, `k`.
/// Optional columns: `index` (blank or `-1` = none), `forward` (default true),
/// `authors` (`;`-separated), `year`, `grid` (`arrhenius` | `pressure`),
/// `P` (blank in single-pressure mode), `Tunits`, `Punits`.
fn load_csv(path: &Path) -> Result<KineticsDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    parse_csv(reader)
}

fn parse_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<KineticsDataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let require = |name: &str| find(name).with_context(|| format!("CSV missing '{name}' column"));

    let result_idx = require("result")?;
    let source_idx = require("source")?;
    let t_idx = require("T")?;
    let k_idx = require("k")?;
    let index_idx = find("index");
    let forward_idx = find("forward");
    let authors_idx = find("authors");
    let year_idx = find("year");
    let grid_idx = find("grid");
    let p_idx = find("P");
    let tunits_idx = find("Tunits");
    let punits_idx = find("Punits");

    let mut rows = Vec::new();

    for (row_no, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let row = (|| -> Result<LongRow> {
            let grid = GridKind::parse(cell(grid_idx))?;
            let pressure = cell(p_idx)
                .map(|s| parse_float(s, "P"))
                .transpose()?
                .filter(|p| !p.is_nan());
            if grid == GridKind::Pressure && pressure.is_none() {
                bail!("pressure grid row has no 'P' value");
            }
            Ok(LongRow {
                result: cell(Some(result_idx)).unwrap_or("").to_string(),
                source: cell(Some(source_idx)).unwrap_or("").to_string(),
                index: normalize_index(
                    cell(index_idx)
                        .map(|s| s.parse::<i64>().with_context(|| format!("index '{s}' is not an integer")))
                        .transpose()?,
                ),
                forward: parse_forward(cell(forward_idx).unwrap_or(""))?,
                authors: cell(authors_idx).map(str::to_string),
                year: cell(year_idx)
                    .map(|s| s.parse::<i32>().with_context(|| format!("year '{s}' is not an integer")))
                    .transpose()?,
                grid,
                temperature: check_temperature(parse_float(cell(Some(t_idx)).unwrap_or(""), "T")?)?,
                pressure,
                rate: parse_float(cell(Some(k_idx)).unwrap_or(""), "k")?,
                temperature_units: cell(tunits_idx).map(str::to_string),
                pressure_units: cell(punits_idx).map(str::to_string),
            })
        })()
        .with_context(|| format!("CSV row {row_no}"))?;

        rows.push(row);
    }

    assemble_entries(rows)
}

fn parse_float(s: &str, col: &str) -> Result<f64> {
    s.parse::<f64>()
        .with_context(|| format!("{col}: '{s}' is not a number"))
}

/// Temperatures key the grid columns, so a `NaN` one cannot be placed.
fn check_temperature(t: f64) -> Result<f64> {
    if t.is_nan() {
        bail!("T is NaN");
    }
    Ok(t)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file in the long format described for CSV.
///
/// Text columns may be Utf8 or LargeUtf8, numeric columns any of
/// Float64/Float32/Int64/Int32, and `forward` a Boolean column.
fn load_parquet(path: &Path) -> Result<KineticsDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));
        let require = |name: &str| {
            column(name).ok_or_else(|| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };

        let result_col = require("result")?;
        let source_col = require("source")?;
        let t_col = require("T")?;
        let k_col = require("k")?;
        let index_col = column("index");
        let forward_col = column("forward");
        let authors_col = column("authors");
        let year_col = column("year");
        let grid_col = column("grid");
        let p_col = column("P");
        let tunits_col = column("Tunits");
        let punits_col = column("Punits");

        for row in 0..batch.num_rows() {
            let parsed = (|| -> Result<LongRow> {
                let opt_str = |col: Option<&Arc<dyn Array>>| -> Result<Option<String>> {
                    col.map(|c| extract_string(c, row)).transpose().map(Option::flatten)
                };
                let opt_f64 = |col: Option<&Arc<dyn Array>>| -> Result<Option<f64>> {
                    col.map(|c| extract_f64(c, row)).transpose().map(Option::flatten)
                };

                let grid_text = opt_str(grid_col)?;
                let grid = GridKind::parse(grid_text.as_deref())?;
                let pressure = opt_f64(p_col)?.filter(|p| !p.is_nan());
                if grid == GridKind::Pressure && pressure.is_none() {
                    bail!("pressure grid row has no 'P' value");
                }
                let forward = match forward_col {
                    Some(c) => extract_bool(c, row)?.unwrap_or(true),
                    None => true,
                };

                Ok(LongRow {
                    result: extract_string(result_col, row)?.unwrap_or_default(),
                    source: extract_string(source_col, row)?.unwrap_or_default(),
                    index: normalize_index(opt_f64(index_col)?.map(|v| v as i64)),
                    forward,
                    authors: opt_str(authors_col)?,
                    year: opt_f64(year_col)?.map(|v| v as i32),
                    grid,
                    temperature: check_temperature(extract_f64(t_col, row)?.context("null 'T'")?)?,
                    pressure,
                    rate: extract_f64(k_col, row)?.context("null 'k'")?,
                    temperature_units: opt_str(tunits_col)?,
                    pressure_units: opt_str(punits_col)?,
                })
            })()
            .with_context(|| format!("Row {row}"))?;

            rows.push(parsed);
        }
    }

    assemble_entries(rows)
}

// -- Parquet / Arrow helpers --

/// Read a text cell, `None` when null.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row)
            .to_string(),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .context("expected LargeStringArray")?
            .value(row)
            .to_string(),
        other => bail!("Expected a string column, got {other:?}"),
    };
    Ok(Some(value))
}

/// Read a numeric cell as `f64`, `None` when null.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().context("expected Float64Array")?.value(row),
        DataType::Float32 => {
            any.downcast_ref::<Float32Array>().context("expected Float32Array")?.value(row) as f64
        }
        DataType::Int64 => any.downcast_ref::<Int64Array>().context("expected Int64Array")?.value(row) as f64,
        DataType::Int32 => any.downcast_ref::<Int32Array>().context("expected Int32Array")?.value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}

/// Read a boolean cell, `None` when null.
fn extract_bool(col: &Arc<dyn Array>, row: usize) -> Result<Option<bool>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Boolean => Ok(Some(
            col.as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?
                .value(row),
        )),
        DataType::Utf8 | DataType::LargeUtf8 => match extract_string(col, row)? {
            Some(s) => parse_forward(&s).map(Some),
            None => Ok(None),
        },
        other => bail!("Expected a boolean column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::data::label::LabelParts;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn json_object_with_units() {
        let file = write_temp(
            ".json",
            r#"{
                "Tunits": "K", "Punits": "atm",
                "entries": [
                    {"result": "1", "source": "NIST", "index": -1, "forward": false,
                     "reference": {"authors": ["Baulch, D. L."], "year": 2005},
                     "Tlist": [300, 1000], "klist": [1e3, 1e6]},
                    {"result": "2", "source": "Library", "index": 3,
                     "Tlist": [300, 1000], "Plist": [0.1, 1], "klist": [[1, 2], [3, 4]],
                     "Tlist2": [300], "Plist2": [0.1, 1], "klist2": [[1], [3]]}
                ]
            }"#,
        );
        let dataset = load_file(file.path()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.units.pressure, "atm");
        assert!(!dataset.entries[0].forward);
        assert_eq!(dataset.entries[0].index, None);
        assert_eq!(dataset.entries[1].index, Some(3));
        assert_eq!(dataset.entries[1].pdep_rates, vec![vec![1.0], vec![3.0]]);
    }

    #[test]
    fn json_bare_array_uses_default_units() {
        let dataset =
            parse_json(r#"[{"result": "R1", "source": "NIST", "Tlist": [1000], "klist": [10]}]"#)
                .unwrap();
        assert_eq!(dataset.units, Units::default());
        assert_eq!(dataset.entries[0].rates, RateTable::Flat(vec![10.0]));
    }

    #[test]
    fn json_rejects_scalars() {
        assert!(parse_json("42").is_err());
        assert!(parse_json("{ not json").is_err());
    }

    #[test]
    fn unsupported_extension() {
        let file = write_temp(".txt", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn csv_groups_rows_into_entries() {
        let csv_text = "\
result,source,index,forward,authors,year,grid,T,P,k,Tunits,Punits
1,NIST,-1,true,O'Brien,,,300,,100,,
1,NIST,-1,true,O'Brien,,,1000,,1000,,
2,Lib,4,false,\"Smith, A.;Jones, B.\",1999,arrhenius,300,0.1,1,K,torr
2,Lib,4,false,,,arrhenius,1000,0.1,2,,
2,Lib,4,false,,,arrhenius,300,10,3,,
2,Lib,4,false,,,arrhenius,1000,10,4,,
2,Lib,4,false,,,pressure,300,0.1,5,,
2,Lib,4,false,,,pressure,300,10,6,,
";
        let dataset = parse_csv(csv::Reader::from_reader(csv_text.as_bytes())).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.units.pressure, "torr");

        let first = &dataset.entries[0];
        assert_eq!(first.index, None);
        assert_eq!(first.temperatures, vec![300.0, 1000.0]);
        assert_eq!(first.rates, RateTable::Flat(vec![100.0, 1000.0]));
        let cited = first.reference.as_ref().unwrap();
        assert_eq!(cited.authors, vec!["O'Brien"]);
        assert_eq!(cited.year, None);

        let second = &dataset.entries[1];
        assert_eq!(second.index, Some(4));
        assert!(!second.forward);
        assert_eq!(second.pressures, vec![0.1, 10.0]);
        assert_eq!(
            second.rates,
            RateTable::ByPressure(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
        );
        assert_eq!(second.pdep_temperatures, vec![300.0]);
        assert_eq!(second.pdep_pressures, vec![0.1, 10.0]);
        assert_eq!(second.pdep_rates, vec![vec![5.0], vec![6.0]]);
        let reference = second.reference.as_ref().unwrap();
        assert_eq!(reference.authors, vec!["Smith, A.", "Jones, B."]);
        assert_eq!(reference.year, Some(1999));
    }

    #[test]
    fn csv_missing_cells_become_nan() {
        let csv_text = "result,source,T,P,k\nR,S,300,1,10\nR,S,600,1,20\nR,S,300,2,30\n";
        let dataset = parse_csv(csv::Reader::from_reader(csv_text.as_bytes())).unwrap();
        match &dataset.entries[0].rates {
            RateTable::ByPressure(rows) => {
                assert_eq!(rows[0], vec![10.0, 20.0]);
                assert_eq!(rows[1][0], 30.0);
                assert!(rows[1][1].is_nan());
            }
            other => panic!("expected pressure table, got {other:?}"),
        }
    }

    #[test]
    fn csv_reference_assembled_across_rows() {
        let csv_text = "\
result,source,authors,year,T,k
R,S,\"Smith, A.\",,300,10
R,S,,1999,600,20
";
        let dataset = parse_csv(csv::Reader::from_reader(csv_text.as_bytes())).unwrap();
        let entry = &dataset.entries[0];
        let reference = entry.reference.as_ref().unwrap();
        assert_eq!(reference.authors, vec!["Smith, A."]);
        assert_eq!(reference.year, Some(1999));
        assert_eq!(LabelParts::from(entry).single_pressure(), "R. S - Smith, 1999");

        let no_year = "result,source,authors,T,k\nR,S,Smith A.;Jones B.,300,10\n";
        let dataset = parse_csv(csv::Reader::from_reader(no_year.as_bytes())).unwrap();
        let reference = dataset.entries[0].reference.as_ref().unwrap();
        assert_eq!(reference.authors, vec!["Smith A.", "Jones B."]);
        assert_eq!(reference.year, None);
    }

    #[test]
    fn csv_nan_pressure_counts_as_blank() {
        let csv_text = "result,source,T,P,k\nR,S,300,NaN,10\nR,S,600,NaN,20\nR,S,900,NaN,30\n";
        let dataset = parse_csv(csv::Reader::from_reader(csv_text.as_bytes())).unwrap();
        let entry = &dataset.entries[0];
        assert!(entry.pressures.is_empty());
        assert_eq!(entry.rates, RateTable::Flat(vec![10.0, 20.0, 30.0]));
    }

    #[test]
    fn csv_nan_temperature_is_rejected() {
        let csv_text = "result,source,T,k\nR,S,300,10\nR,S,NaN,20\n";
        let err = parse_csv(csv::Reader::from_reader(csv_text.as_bytes())).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("CSV row 1"));
        assert!(message.contains("T is NaN"));
    }

    #[test]
    fn duplicate_cells_do_not_hide_gaps() {
        let mut grid = GridAccumulator::default();
        grid.add(300.0, Some(1.0), 10.0);
        grid.add(600.0, Some(1.0), 20.0);
        grid.add(300.0, Some(2.0), 30.0);
        grid.add(300.0, Some(2.0), 31.0);

        assert_eq!(grid.duplicates, 1);
        assert_eq!(grid.missing_cells(), 1);
        let rows = grid.matrix();
        assert_eq!(rows[1][0], 31.0);
        assert!(rows[1][1].is_nan());
    }

    #[test]
    fn csv_errors_carry_row_context() {
        let missing = "result,source,T\nR,S,300\n";
        let err = parse_csv(csv::Reader::from_reader(missing.as_bytes())).unwrap_err();
        assert!(format!("{err:#}").contains("missing 'k' column"));

        let bad_number = "result,source,T,k\nR,S,hot,10\n";
        let err = parse_csv(csv::Reader::from_reader(bad_number.as_bytes())).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("CSV row 0"));
        assert!(message.contains("'hot' is not a number"));

        let no_pressure = "result,source,grid,T,k\nR,S,pressure,300,10\n";
        assert!(parse_csv(csv::Reader::from_reader(no_pressure.as_bytes())).is_err());

        let mixed = "result,source,T,P,k\nR,S,300,1,10\nR,S,600,,20\n";
        let err = parse_csv(csv::Reader::from_reader(mixed.as_bytes())).unwrap_err();
        assert!(format!("{err:#}").contains("mix blank and non-blank pressures"));
    }

    #[test]
    fn parquet_long_format() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("result", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("index", DataType::Int64, true),
            Field::new("forward", DataType::Boolean, true),
            Field::new("T", DataType::Float64, false),
            Field::new("P", DataType::Float64, true),
            Field::new("k", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["R1", "R1", "R2"])),
                Arc::new(StringArray::from(vec!["NIST", "NIST", "Lib"])),
                Arc::new(Int64Array::from(vec![Some(-1), Some(-1), Some(2)])),
                Arc::new(BooleanArray::from(vec![Some(true), Some(true), None])),
                Arc::new(Float64Array::from(vec![500.0, 1000.0, 800.0])),
                Arc::new(Float64Array::from(vec![None, None, Some(1.0)])),
                Arc::new(Float64Array::from(vec![1e2, 1e3, 5.0])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let dataset = load_file(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.entries[0].index, None);
        assert_eq!(dataset.entries[0].rates, RateTable::Flat(vec![1e2, 1e3]));
        assert_eq!(dataset.entries[1].index, Some(2));
        assert!(dataset.entries[1].forward);
        assert_eq!(dataset.entries[1].pressures, vec![1.0]);
    }
}
