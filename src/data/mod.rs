/// Data layer: channel catalog, file loading, and time windows.
///
/// Architecture:
/// ```text
///  .h5 / .json / .parquet / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse `channels` group → Catalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Catalog  │  Vec<Channel>, arrays materialized on first access
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  window   │  inclusive [start, end] mask → selected samples
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod window;

#[cfg(feature = "hdf5")]
pub mod h5;
