//! Command-line interface for mutun.
//!
//! Provides commands for ingesting raw source files, renaming items,
//! rebuilding raw sources from stored records, and re-sorting catalogs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{load_config, ResolvedConfig};
use crate::ingest::{ItemManifest, Pipeline};

/// mutun - multilingual devotional-text ingestion toolkit
#[derive(Parser, Debug)]
#[command(name = "mutun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a raw source file described by an item manifest
    Add {
        /// Item manifest (defaults to the configured manifest path)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Raw source file (defaults to the configured input path)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Replace an unparseable catalog with an empty one instead of
        /// failing. Discards every existing entry.
        #[arg(long)]
        reset_corrupt: bool,
    },

    /// Rename an item and/or replace its description
    Rename {
        /// Current item id
        id: String,

        /// New display title (the id is re-derived from it)
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// Category (defaults to the configured category)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Rebuild a raw source file from the stored text records
    RebuildRaw {
        /// Item id
        id: String,

        /// Category (defaults to the configured category)
        #[arg(short, long)]
        category: Option<String>,

        /// Output file (defaults to the configured input path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-sort a catalog file by id
    Sort {
        /// Category (defaults to the configured category)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let config = load_config()?;
        let pipeline = Pipeline::new(config.root.clone(), config.prefixes.clone());

        match self.command {
            Commands::Add {
                manifest,
                input,
                reset_corrupt,
            } => {
                let manifest_path = manifest.unwrap_or_else(|| config.default_manifest.clone());
                let input_path = input.unwrap_or_else(|| config.default_input.clone());

                let manifest = ItemManifest::from_file(&manifest_path)?;
                let entry = pipeline
                    .ingest(&manifest, &input_path, reset_corrupt)
                    .with_context(|| format!("Failed to ingest '{}'", manifest.name))?;

                println!("Added: {}", entry.id);
                println!("  Category:  {}", manifest.category);
                println!("  Blocks:    {}", entry.total_lines);
                println!(
                    "  Text:      {}",
                    entry
                        .total_lines_text
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                println!("  Languages: {}", entry.languages.join(", "));
                Ok(())
            }
            Commands::Rename {
                id,
                title,
                description,
                category,
            } => {
                let category = config.category(category.as_deref())?;
                let new_id = pipeline
                    .rename(category, &id, title.as_deref(), description.as_deref())
                    .with_context(|| format!("Failed to rename '{id}'"))?;

                if new_id == id {
                    println!("Updated: {id}");
                } else {
                    println!("Renamed: {id} -> {new_id}");
                }
                Ok(())
            }
            Commands::RebuildRaw {
                id,
                category,
                output,
            } => {
                let category = config.category(category.as_deref())?;
                let output = output.unwrap_or_else(|| config.default_input.clone());

                let blocks = pipeline
                    .rebuild_raw(category, &id, &output)
                    .with_context(|| format!("Failed to rebuild raw source for '{id}'"))?;

                println!("Rebuilt {} with {} blocks", output.display(), blocks);
                Ok(())
            }
            Commands::Sort { category } => {
                let category = config.category(category.as_deref())?;
                let entries = pipeline
                    .sort_catalog(category)
                    .with_context(|| format!("Failed to sort catalog for '{category}'"))?;

                println!("Sorted {entries} entries in {category}/index.json");
                Ok(())
            }
            Commands::Config => {
                show_config(&config);
                Ok(())
            }
        }
    }
}

fn show_config(config: &ResolvedConfig) {
    println!("Resolved configuration:");
    println!("  Root:      {}", config.root.display());
    println!(
        "  Category:  {}",
        config.default_category.as_deref().unwrap_or("(none)")
    );
    println!("  Input:     {}", config.default_input.display());
    println!("  Manifest:  {}", config.default_manifest.display());
    println!("  Prefixes:  {:?}", config.prefixes.prefixes);
    match &config.config_file {
        Some(path) => println!("  Config:    {}", path.display()),
        None => println!("  Config:    (none found)"),
    }
}
