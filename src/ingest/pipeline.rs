//! The shared ingestion pipeline.
//!
//! Every operation works against one data-repository root and is a
//! complete, sequential batch: read, validate, then write. There is no
//! locking; concurrent runs against the same catalog are last-writer-wins.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{MutunError, Result};
use crate::library::{
    catalog_path, record_path, slug_from_title, Catalog, CatalogEntry, LanguageText, Title,
};

use super::blocks::{column, normalize_blocks, read_blocks, text_block_count, HeadingPrefixes};
use super::manifest::ItemManifest;

/// Ingestion pipeline bound to a data-repository root.
#[derive(Debug, Clone)]
pub struct Pipeline {
    root: PathBuf,
    prefixes: HeadingPrefixes,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, prefixes: HeadingPrefixes) -> Self {
        Self {
            root: root.into(),
            prefixes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ingest one item from a raw source file.
    ///
    /// Parses the file into blocks, validates arity, writes one text
    /// record per language, and upserts the catalog entry. Validation
    /// happens before any write, so a malformed source leaves both the
    /// records and the catalog untouched.
    ///
    /// `reset_corrupt` controls what happens when the existing catalog
    /// is unparseable: `false` fails the run, `true` starts fresh and
    /// discards the old file on save.
    pub fn ingest(
        &self,
        manifest: &ItemManifest,
        input: &Path,
        reset_corrupt: bool,
    ) -> Result<CatalogEntry> {
        prepare_source(input)?;

        info!(input = %input.display(), "reading source");
        let blocks = read_blocks(input)?;
        info!(blocks = blocks.len(), "parsed source");

        let blocks = normalize_blocks(blocks, manifest.languages.len(), &self.prefixes)?;

        let id = manifest.id();
        for (idx, language) in manifest.languages.iter().enumerate() {
            let record = LanguageText {
                id: id.clone(),
                title: manifest.title_for(language).to_string(),
                language: language.clone(),
                text: column(&blocks, idx),
            };

            let path = record_path(&self.root, &manifest.category, language, &id);
            record.save(&path)?;
            info!(path = %path.display(), lines = record.text.len(), "wrote text record");
        }

        let entry = CatalogEntry {
            id: id.clone(),
            title: manifest.catalog_title(),
            description: manifest.description.trim().to_string(),
            total_lines: blocks.len(),
            languages: manifest.languages.clone(),
            total_lines_text: Some(text_block_count(&blocks, &self.prefixes)),
            audio_id: manifest.audio_id.clone(),
            item_type: manifest.item_type.clone(),
        };

        let index_path = catalog_path(&self.root, &manifest.category);
        let mut catalog = if reset_corrupt {
            Catalog::load_or_reset(&index_path)?
        } else {
            Catalog::load(&index_path)?
        };
        catalog.upsert(entry.clone());
        catalog.save(&index_path)?;
        info!(id = %id, catalog = %index_path.display(), "updated catalog");

        Ok(entry)
    }

    /// Rename an item and/or replace its description.
    ///
    /// The new id is derived from the new title; with no new title the
    /// id is unchanged and only the description moves. Returns the
    /// (possibly unchanged) id. An unknown id fails without touching
    /// the catalog file.
    pub fn rename(
        &self,
        category: &str,
        id: &str,
        new_title: Option<&str>,
        new_description: Option<&str>,
    ) -> Result<String> {
        let index_path = catalog_path(&self.root, category);
        let mut catalog = Catalog::load(&index_path)?;

        let entry = catalog
            .get(id)
            .cloned()
            .ok_or_else(|| MutunError::EntryNotFound { id: id.to_string() })?;

        let updated_title = match new_title {
            Some(t) => Title::Flat(t.to_string()),
            None => entry.title.clone(),
        };
        let updated_id = match new_title {
            Some(t) => slug_from_title(t),
            None => id.to_string(),
        };
        let updated_description = match new_description {
            Some(d) => d.trim().to_string(),
            None => entry.description.clone(),
        };

        catalog.remove(id);
        catalog.upsert(CatalogEntry {
            id: updated_id.clone(),
            title: updated_title,
            description: updated_description,
            ..entry.clone()
        });
        catalog.save(&index_path)?;
        info!(old = %id, new = %updated_id, "updated catalog entry");

        // Record files only move when the title changed; a pure
        // description edit leaves them alone.
        if let Some(title) = new_title {
            for language in &entry.languages {
                let old_path = record_path(&self.root, category, language, id);
                let new_path = record_path(&self.root, category, language, &updated_id);

                let mut record = match LanguageText::load(&old_path) {
                    Ok(record) => record,
                    Err(MutunError::MissingTextFile { path }) => {
                        warn!(path = %path.display(), "text record missing, skipping");
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                record.id = updated_id.clone();
                record.title = title.to_string();
                record.save(&new_path)?;

                if old_path != new_path {
                    fs::remove_file(&old_path).map_err(|e| MutunError::io(&old_path, e))?;
                }
                info!(from = %old_path.display(), to = %new_path.display(), "moved text record");
            }
        }

        Ok(updated_id)
    }

    /// Rebuild a raw source file from the stored text records.
    ///
    /// The designed inverse of ingestion: a line that reads identically
    /// in every language is emitted once as a heading, anything else as
    /// one line per language, each block followed by a blank line.
    /// Returns the number of blocks written.
    pub fn rebuild_raw(&self, category: &str, id: &str, output: &Path) -> Result<usize> {
        let index_path = catalog_path(&self.root, category);
        let catalog = Catalog::load(&index_path)?;

        let entry = catalog
            .get(id)
            .ok_or_else(|| MutunError::EntryNotFound { id: id.to_string() })?;

        let mut texts: Vec<(String, Vec<String>)> = Vec::new();
        for language in &entry.languages {
            let path = record_path(&self.root, category, language, id);
            let record = LanguageText::load(&path)?;
            texts.push((language.clone(), record.text));
        }

        let total = texts.first().map(|(_, t)| t.len()).unwrap_or(0);
        if texts.iter().any(|(_, t)| t.len() != total) {
            return Err(MutunError::LineCountMismatch {
                id: id.to_string(),
                counts: texts
                    .into_iter()
                    .map(|(lang, t)| (lang, t.len()))
                    .collect(),
            });
        }

        let mut out = String::new();
        for i in 0..total {
            let lines: Vec<&str> = texts.iter().map(|(_, t)| t[i].trim()).collect();
            if lines.iter().all(|l| *l == lines[0]) {
                out.push_str(&self.prefixes.apply(lines[0]));
                out.push_str("\n\n");
            } else {
                for line in lines {
                    out.push_str(line);
                    out.push('\n');
                }
                out.push('\n');
            }
        }

        fs::write(output, out).map_err(|e| MutunError::io(output, e))?;
        info!(output = %output.display(), blocks = total, "rebuilt raw source");

        Ok(total)
    }

    /// Re-sort a catalog file by id and rewrite it with canonical key
    /// order. Used to normalize hand-edited index files.
    pub fn sort_catalog(&self, category: &str) -> Result<usize> {
        let index_path = catalog_path(&self.root, category);
        let mut catalog = Catalog::load(&index_path)?;
        catalog.sort();
        catalog.save(&index_path)?;
        info!(catalog = %index_path.display(), entries = catalog.len(), "sorted catalog");
        Ok(catalog.len())
    }
}

/// Ensure the source file exists, creating parent directories and an
/// empty file when absent. A missing source is recoverable: the run
/// continues with zero blocks.
fn prepare_source(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            warn!(dir = %parent.display(), "source directory missing, creating it");
            fs::create_dir_all(parent).map_err(|e| MutunError::io(parent, e))?;
        }
    }

    if !path.exists() {
        warn!(path = %path.display(), "source file missing, creating empty file");
        fs::write(path, "").map_err(|e| MutunError::io(path, e))?;
    }

    Ok(())
}
