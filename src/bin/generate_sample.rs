use std::sync::Arc;

use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Gas constant in J / (mol K).
const R: f64 = 8.314_462_618;

/// Modified Arrhenius: k = A T^n exp(-Ea / R T), Ea in J/mol.
fn arrhenius(a: f64, n: f64, ea: f64, t: f64) -> f64 {
    a * t.powf(n) * (-ea / (R * t)).exp()
}

/// Lindemann fall-off between low- and high-pressure limits.
/// `concentration` is the bath-gas concentration in mol/cm³.
fn lindemann(k0: f64, kinf: f64, concentration: f64) -> f64 {
    let pr = k0 * concentration / kinf;
    kinf * pr / (1.0 + pr)
}

/// Ideal-gas concentration in mol/cm³ for `p` in bar.
fn concentration(p: f64, t: f64) -> f64 {
    p * 1e5 / (R * t) * 1e-6
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative scatter of up to ±`fraction`.
    fn scatter(&mut self, fraction: f64) -> f64 {
        1.0 + fraction * (2.0 * self.next_f64() - 1.0)
    }
}

#[derive(Default)]
struct Columns {
    result: Vec<String>,
    source: Vec<String>,
    index: Vec<i64>,
    forward: Vec<bool>,
    authors: Vec<Option<String>>,
    year: Vec<Option<i64>>,
    grid: Vec<String>,
    t: Vec<f64>,
    p: Vec<Option<f64>>,
    k: Vec<f64>,
}

struct EntryMeta<'a> {
    result: &'a str,
    source: &'a str,
    index: i64,
    forward: bool,
    reference: Option<(&'a str, i64)>,
}

impl Columns {
    fn push(&mut self, meta: &EntryMeta<'_>, grid: &str, t: f64, p: Option<f64>, k: f64) {
        self.result.push(meta.result.to_string());
        self.source.push(meta.source.to_string());
        self.index.push(meta.index);
        self.forward.push(meta.forward);
        self.authors.push(meta.reference.map(|(a, _)| a.to_string()));
        self.year.push(meta.reference.map(|(_, y)| y));
        self.grid.push(grid.to_string());
        self.t.push(t);
        self.p.push(p);
        self.k.push(k);
    }

    fn len(&self) -> usize {
        self.k.len()
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let mut cols = Columns::default();

    let temperatures: Vec<f64> = (0..8).map(|i| 300.0 + 250.0 * i as f64).collect();
    let pressures = [0.01, 0.1, 1.0, 10.0, 100.0];

    // Single-pressure rate rules and a literature fit.
    let flat_entries = [
        (EntryMeta { result: "1", source: "Rate Rules", index: -1, forward: true, reference: None },
         (1.2e7, 1.8, 35_000.0)),
        (EntryMeta { result: "2", source: "NIST", index: 3, forward: true,
                     reference: Some(("Baulch, D. L.;Cobos, C. J.", 2005)) },
         (3.4e12, 0.0, 52_000.0)),
        (EntryMeta { result: "3", source: "Training", index: 12, forward: false,
                     reference: Some(("O&#39;Brien, J.", 1998)) },
         (8.0e9, 0.7, 61_000.0)),
    ];
    for (meta, (a, n, ea)) in &flat_entries {
        for &t in &temperatures {
            let k = arrhenius(*a, *n, *ea, t) * rng.scatter(0.05);
            cols.push(meta, "arrhenius", t, None, k);
        }
    }

    // Pressure-dependent association with Lindemann fall-off.
    let pdep = EntryMeta { result: "4", source: "Pressure Dependence", index: -1, forward: true, reference: None };
    let k0 = |t: f64| arrhenius(6.0e20, -1.5, 0.0, t);
    let kinf = |t: f64| arrhenius(2.0e13, 0.0, 4_000.0, t);
    for &p in &pressures {
        for &t in &temperatures {
            let k = lindemann(k0(t), kinf(t), concentration(p, t));
            cols.push(&pdep, "arrhenius", t, Some(p), k);
        }
    }
    let pdep_pressures: Vec<f64> = (0..13).map(|i| 10f64.powf(-3.0 + 0.5 * i as f64)).collect();
    for &t in &[500.0, 1000.0, 1500.0, 2000.0] {
        for &p in &pdep_pressures {
            let k = lindemann(k0(t), kinf(t), concentration(p, t));
            cols.push(&pdep, "pressure", t, Some(p), k);
        }
    }

    let n_rows = cols.len();
    let schema = Arc::new(Schema::new(vec![
        Field::new("result", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("index", DataType::Int64, false),
        Field::new("forward", DataType::Boolean, false),
        Field::new("authors", DataType::Utf8, true),
        Field::new("year", DataType::Int64, true),
        Field::new("grid", DataType::Utf8, false),
        Field::new("T", DataType::Float64, false),
        Field::new("P", DataType::Float64, true),
        Field::new("k", DataType::Float64, false),
        Field::new("Tunits", DataType::Utf8, true),
        Field::new("Punits", DataType::Utf8, true),
    ]));

    let mut tunits = vec![None; n_rows];
    let mut punits = vec![None; n_rows];
    if n_rows > 0 {
        tunits[0] = Some("K");
        punits[0] = Some("bar");
    }

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(cols.result)),
            Arc::new(StringArray::from(cols.source)),
            Arc::new(Int64Array::from(cols.index)),
            Arc::new(BooleanArray::from(cols.forward)),
            Arc::new(StringArray::from(cols.authors)),
            Arc::new(Int64Array::from(cols.year)),
            Arc::new(StringArray::from(cols.grid)),
            Arc::new(Float64Array::from(cols.t)),
            Arc::new(Float64Array::from(cols.p)),
            Arc::new(Float64Array::from(cols.k)),
            Arc::new(StringArray::from(tunits)),
            Arc::new(StringArray::from(punits)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_kinetics.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} rate coefficients (4 entries) to {output_path}");
}
