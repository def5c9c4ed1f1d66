/// Data layer: discovery, loading, validation and summaries.
///
/// Architecture:
/// ```text
///   data/ directory
///        │
///        ▼
///   ┌──────────┐
///   │ locator  │  list *.csv → file names
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse CSV → Dataset, reject zero rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary  │  preview, missing counts, describe (stats)
///   └──────────┘
/// ```

pub mod loader;
pub mod locator;
pub mod model;
pub mod stats;
pub mod summary;
