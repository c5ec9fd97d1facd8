use std::fmt;

use serde::ser::{Serialize, Serializer};
use thiserror::Error;

use super::label::{temperature_label, LabelParts};
use super::model::{KineticsDataset, KineticsEntry, RateTable, Units};

// ---------------------------------------------------------------------------
// Series – one named line for the chart
// ---------------------------------------------------------------------------

/// A named, ordered list of `(x, y)` points.
///
/// Serializes as `[label, [[x, y], ...]]`, the shape the chart consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<[f64; 2]>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Points whose coordinates are both finite.
    pub fn finite_points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.points
            .iter()
            .copied()
            .filter(|[x, y]| x.is_finite() && y.is_finite())
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.label, &self.points).serialize(serializer)
    }
}

/// `(1000 / T, log10 k)`.
fn arrhenius_point(temperature: f64, rate: f64) -> [f64; 2] {
    [1000.0 / temperature, rate.log10()]
}

/// `(log10 P, log10 k)`.
fn pressure_point(pressure: f64, rate: f64) -> [f64; 2] {
    [pressure.log10(), rate.log10()]
}

// ---------------------------------------------------------------------------
// Validation errors (strict mode)
// ---------------------------------------------------------------------------

/// Which tabulated grid of an entry a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid {
    Arrhenius,
    PressureDependence,
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grid::Arrhenius => write!(f, "Arrhenius"),
            Grid::PressureDependence => write!(f, "pressure-dependence"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Temperature,
    Pressure,
    Rate,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Temperature => write!(f, "temperature"),
            Quantity::Pressure => write!(f, "pressure"),
            Quantity::Rate => write!(f, "rate coefficient"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("{grid} grid has {pressures} pressures but a flat rate list")]
    FlatTableWithPressures { grid: Grid, pressures: usize },

    #[error("{grid} grid has no pressures but {rows} rate rows indexed by pressure")]
    PressureTableWithoutPressures { grid: Grid, rows: usize },

    #[error("{grid} grid: expected {expected} rate rows (one per pressure), found {found}")]
    RowCountMismatch {
        grid: Grid,
        expected: usize,
        found: usize,
    },

    #[error("{grid} grid: rate row {row} has {found} values, expected {expected} (one per temperature)")]
    RowLengthMismatch {
        grid: Grid,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{grid} grid: {quantity} {index} is {value}, must be positive and finite")]
    InvalidValue {
        grid: Grid,
        quantity: Quantity,
        index: usize,
        value: f64,
    },
}

fn check_positive(grid: Grid, quantity: Quantity, values: &[f64]) -> Result<(), SeriesError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v > 0.0))
    {
        Some((index, &value)) => Err(SeriesError::InvalidValue {
            grid,
            quantity,
            index,
            value,
        }),
        None => Ok(()),
    }
}

fn check_rows(grid: Grid, rows: &[Vec<f64>], pressures: usize, temperatures: usize) -> Result<(), SeriesError> {
    if rows.len() != pressures {
        return Err(SeriesError::RowCountMismatch {
            grid,
            expected: pressures,
            found: rows.len(),
        });
    }
    for (row, values) in rows.iter().enumerate() {
        if values.len() != temperatures {
            return Err(SeriesError::RowLengthMismatch {
                grid,
                row,
                expected: temperatures,
                found: values.len(),
            });
        }
        check_positive(grid, Quantity::Rate, values)?;
    }
    Ok(())
}

/// Check the Arrhenius grid of `entry`: table shape matches the pressure mode,
/// lengths agree, and every temperature, pressure and rate is positive.
pub fn validate_arrhenius(entry: &KineticsEntry) -> Result<(), SeriesError> {
    let grid = Grid::Arrhenius;
    check_positive(grid, Quantity::Temperature, &entry.temperatures)?;
    check_positive(grid, Quantity::Pressure, &entry.pressures)?;

    let n_temperatures = entry.temperatures.len();
    match (&entry.rates, entry.pressures.len()) {
        (RateTable::Flat(rates), 0) => {
            if rates.len() != n_temperatures {
                return Err(SeriesError::RowLengthMismatch {
                    grid,
                    row: 0,
                    expected: n_temperatures,
                    found: rates.len(),
                });
            }
            check_positive(grid, Quantity::Rate, rates)
        }
        (RateTable::Flat(_), pressures) => {
            Err(SeriesError::FlatTableWithPressures { grid, pressures })
        }
        (RateTable::ByPressure(rows), 0) => Err(SeriesError::PressureTableWithoutPressures {
            grid,
            rows: rows.len(),
        }),
        (RateTable::ByPressure(rows), pressures) => check_rows(grid, rows, pressures, n_temperatures),
    }
}

/// Check the pressure-dependence grid of `entry`. An empty pressure list is
/// always valid since no series are drawn from it.
pub fn validate_pressure_dependence(entry: &KineticsEntry) -> Result<(), SeriesError> {
    if entry.pdep_pressures.is_empty() {
        return Ok(());
    }
    let grid = Grid::PressureDependence;
    check_positive(grid, Quantity::Temperature, &entry.pdep_temperatures)?;
    check_positive(grid, Quantity::Pressure, &entry.pdep_pressures)?;
    check_rows(
        grid,
        &entry.pdep_rates,
        entry.pdep_pressures.len(),
        entry.pdep_temperatures.len(),
    )
}

// ---------------------------------------------------------------------------
// SeriesBuilder
// ---------------------------------------------------------------------------

/// Turns kinetics entries into chart series.
///
/// In the default lenient mode nothing is rejected: a missing value becomes
/// `NaN` and a non-positive one yields a non-finite point, both passed to the
/// chart as is. Strict mode validates each grid first and fails without
/// touching the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesBuilder {
    strict: bool,
}

impl SeriesBuilder {
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn with_strict(strict: bool) -> Self {
        if strict {
            Self::strict()
        } else {
            Self::lenient()
        }
    }

    /// Append the Arrhenius series of `entry` to `kseries`: one series per
    /// pressure in pressure order, or a single series when the entry has no
    /// pressure list. Existing contents of `kseries` are left alone.
    pub fn append_arrhenius(
        &self,
        entry: &KineticsEntry,
        units: &Units,
        kseries: &mut Vec<Series>,
    ) -> Result<(), SeriesError> {
        if self.strict {
            validate_arrhenius(entry)?;
        }

        let parts = LabelParts::from(entry);
        let before = kseries.len();

        if entry.is_pressure_dependent() {
            for (j, &pressure) in entry.pressures.iter().enumerate() {
                let points = entry
                    .temperatures
                    .iter()
                    .enumerate()
                    .map(|(i, &t)| arrhenius_point(t, entry.rates.rate_at(j, i)))
                    .collect();
                kseries.push(Series::new(parts.at_pressure(pressure, &units.pressure), points));
            }
        } else {
            let points = entry
                .temperatures
                .iter()
                .enumerate()
                .map(|(i, &t)| arrhenius_point(t, entry.rates.flat_rate(i)))
                .collect();
            kseries.push(Series::new(parts.single_pressure(), points));
        }

        log::debug!(
            "appended {} Arrhenius series for '{}. {}'",
            kseries.len() - before,
            entry.result,
            entry.source
        );
        Ok(())
    }

    /// Build the pressure-dependence series of `entry`: one series per
    /// secondary temperature with one point per secondary pressure. Empty
    /// when the entry has no secondary pressure list.
    pub fn pressure_series(&self, entry: &KineticsEntry, units: &Units) -> Result<Vec<Series>, SeriesError> {
        if self.strict {
            validate_pressure_dependence(entry)?;
        }
        if entry.pdep_pressures.is_empty() {
            return Ok(Vec::new());
        }

        let series = entry
            .pdep_temperatures
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let points = entry
                    .pdep_pressures
                    .iter()
                    .enumerate()
                    .map(|(j, &p)| {
                        let rate = entry
                            .pdep_rates
                            .get(j)
                            .and_then(|row| row.get(i))
                            .copied()
                            .unwrap_or(f64::NAN);
                        pressure_point(p, rate)
                    })
                    .collect();
                Series::new(temperature_label(t, &units.temperature), points)
            })
            .collect();
        Ok(series)
    }

    /// Append the Arrhenius series to `kseries` and return the freshly built
    /// pressure-dependence series. In strict mode both grids are validated
    /// before anything is appended.
    pub fn build(
        &self,
        entry: &KineticsEntry,
        units: &Units,
        kseries: &mut Vec<Series>,
    ) -> Result<Vec<Series>, SeriesError> {
        if self.strict {
            validate_arrhenius(entry)?;
            validate_pressure_dependence(entry)?;
        }
        self.append_arrhenius(entry, units, kseries)?;
        self.pressure_series(entry, units)
    }
}

// ---------------------------------------------------------------------------
// Whole-dataset building
// ---------------------------------------------------------------------------

/// Series for a selection of dataset entries.
#[derive(Debug, Default)]
pub struct DatasetSeries {
    /// Arrhenius series of every accepted entry, in selection order.
    pub kseries: Vec<Series>,
    /// Dataset index of the entry each `kseries` element came from.
    pub owners: Vec<usize>,
    /// Pressure-dependence series of each entry that has any.
    pub kseries2: Vec<(usize, Vec<Series>)>,
    /// Entries rejected in strict mode.
    pub rejected: Vec<(usize, SeriesError)>,
}

impl DatasetSeries {
    pub fn pressure_series_for(&self, entry: usize) -> Option<&[Series]> {
        self.kseries2
            .iter()
            .find(|(owner, _)| *owner == entry)
            .map(|(_, series)| series.as_slice())
    }
}

impl SeriesBuilder {
    /// Build series for the entries at `indices`, appending each entry's
    /// Arrhenius series to one running collection.
    pub fn build_dataset(&self, dataset: &KineticsDataset, indices: &[usize]) -> DatasetSeries {
        let mut out = DatasetSeries::default();

        for &idx in indices {
            let Some(entry) = dataset.entries.get(idx) else {
                continue;
            };
            let before = out.kseries.len();
            match self.build(entry, &dataset.units, &mut out.kseries) {
                Ok(kseries2) => {
                    out.owners.resize(out.kseries.len(), idx);
                    if !kseries2.is_empty() {
                        out.kseries2.push((idx, kseries2));
                    }
                }
                Err(e) => {
                    log::warn!("skipping entry '{}. {}': {e}", entry.result, entry.source);
                    out.kseries.truncate(before);
                    out.rejected.push((idx, e));
                }
            }
        }

        log::debug!(
            "built {} Arrhenius series from {} entries ({} rejected)",
            out.kseries.len(),
            indices.len(),
            out.rejected.len()
        );
        out
    }
}
