/// Data layer: core types, loading, reconciliation and filtering.
///
/// Architecture:
/// ```text
///   Food_Production.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → numeric cells, Packging → Packaging
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ reconcile  │  stage sum vs Total_emissions → Total_emissions_clean
///   └───────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  FoodDataset  │  Vec<FoodRecord>, column index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  selected products → filtered table
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod reconcile;
