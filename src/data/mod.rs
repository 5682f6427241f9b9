/// Data layer: core types, loading, and row filtering.
///
/// Architecture:
/// ```text
///  path / URL (.csv .data .json .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, ordered column names
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop_missing, partition by category
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
