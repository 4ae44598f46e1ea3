/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (loaded once, read-only)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Listing>, boroughs, date/price bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView (row indices)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
