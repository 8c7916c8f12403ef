//! Source-file ingestion: block parsing, item manifests, and the
//! shared pipeline that turns raw text into records plus a catalog
//! entry.

pub mod blocks;
pub mod manifest;
pub mod pipeline;

pub use blocks::{normalize_blocks, parse_blocks, read_blocks, Block, HeadingPrefixes};
pub use manifest::ItemManifest;
pub use pipeline::Pipeline;
