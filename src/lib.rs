//! mutun - multilingual devotional-text ingestion toolkit
//!
//! Maintains a data repository of ziyarat, duas, and dhikr: raw
//! blank-line-delimited source files are parsed into per-language JSON
//! text records, and a per-category `index.json` catalog tracks every
//! item by slug id.
//!
//! # Architecture
//!
//! Everything is a deterministic file-to-file transformation:
//! - A source document splits into blocks (one heading line or one
//!   line per language) which project into per-language records
//! - The catalog is read-modify-written whole on every ingest
//! - Rebuilding the raw source from records is the designed inverse
//!
//! # Modules
//!
//! - `ingest`: Block parsing, item manifests, the shared pipeline
//! - `library`: Catalog and text-record storage
//! - `config`: `.mutun/config.yaml` discovery and resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Ingest raw.txt as the item described by item.yaml
//! mutun add --manifest item.yaml --input raw.txt
//!
//! # Rename an item (records move with it)
//! mutun rename dua-nudba --title "Dua al-Nudba"
//!
//! # Reconstruct raw.txt from the stored records
//! mutun rebuild-raw dua-al-nudba --output raw.txt
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod library;

// Re-export main types at crate root for convenience
pub use error::{MutunError, Result};
pub use ingest::{HeadingPrefixes, ItemManifest, Pipeline};
pub use library::{slug_from_title, Catalog, CatalogEntry, LanguageText, Title};
