/// Data layer: kinetics types, loading, filtering and series building.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → KineticsDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ KineticsDataset  │  Vec<KineticsEntry>, units, facet index
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply facet predicates → visible indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  entry → kseries (1000/T, log k) + kseries2 (log P, log k)
///   └──────────┘
/// ```

pub mod filter;
pub mod label;
pub mod loader;
pub mod model;
pub mod series;
