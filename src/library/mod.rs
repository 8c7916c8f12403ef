//! Catalog and text-record storage for the data repository.
//!
//! # Storage Layout
//!
//! ```text
//! <root>/
//! └── <category>/                  # duas, ziyarah, dhikr, ...
//!     ├── index.json               # Catalog: all items in this category
//!     └── text/
//!         └── <language>/
//!             └── <id>.json        # LanguageText: one item, one language
//! ```

pub mod catalog;
pub mod records;

pub use catalog::{catalog_path, slug_from_title, Catalog, CatalogEntry, Title};
pub use records::{record_path, LanguageText};
