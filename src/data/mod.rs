/// Data layer: core types, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (schema checked)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐        ┌──────────┐
///   │ Dataset   │ ─────▶ │  facet    │  distinct values, cap 100 / cap 20
///   └──────────┘        └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSet (+ search) → RowView, one or two groups
///   └──────────┘
///        │
///        ├─────────────▶ ┌───────────┐
///        │               │ aggregate  │  value counts, group comparison
///        ▼               └───────────┘
///   ┌──────────┐
///   │  export   │  filtered rows → CSV / JSON
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod facet;
pub mod filter;
pub mod loader;
pub mod model;
