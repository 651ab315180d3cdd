/// Data layer: core types, loading, and grouping.
///
/// Architecture:
/// ```text
///  data/iris.csv (embedded)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse header + records → IrisFrame
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ IrisFrame  │  Arrow RecordBatch: 4 × Float64, species dictionary
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  group    │  species label → row indices
///   └──────────┘
/// ```

pub mod group;
pub mod loader;
pub mod model;
