//! Data layer: core types, loading, filtering and binning.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet      bundled sample
//!        │                            │
//!        ▼                            ▼
//!   ┌──────────┐               ┌──────────┐
//!   │  loader   │               │  sample   │
//!   └──────────┘               └──────────┘
//!        │                            │
//!        └──────────────┬─────────────┘
//!                       ▼
//!              ┌────────────────┐
//!              │ PenguinDataset  │  Arc<[Penguin]>, immutable
//!              └────────────────┘
//!                       │  island / species selections
//!                       ▼
//!                 ┌──────────┐
//!                 │  filter   │  compute_view → DerivedView
//!                 └──────────┘
//!                       │
//!           ┌───────────┴───────────┐
//!           ▼                       ▼
//!     ┌───────────┐           ┌──────────┐
//!     │ histogram  │           │  export   │
//!     └───────────┘           └──────────┘
//! ```

pub mod export;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod sample;
