//! Item manifests.
//!
//! One YAML manifest describes one content item to ingest: its display
//! name, category, languages, and optional extras. The manifest plus a
//! raw source file is everything the pipeline needs, so the same run
//! works for any ziyarah, dua, or dhikr.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::library::{slug_from_title, Title};

fn default_languages() -> Vec<String> {
    vec![
        "ar".to_string(),
        "transliteration".to_string(),
        "en".to_string(),
    ]
}

/// Description of one content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemManifest {
    /// Display name; the slug id is derived from it.
    pub name: String,

    /// Category directory the item belongs to (duas, ziyarah, dhikr, ...).
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Language codes in source-column order.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Per-language display names (e.g. the Arabic title). Languages
    /// without an entry fall back to `name`.
    #[serde(default)]
    pub title_translations: BTreeMap<String, String>,

    #[serde(default)]
    pub audio_id: Option<String>,

    #[serde(default)]
    pub item_type: Option<String>,
}

impl ItemManifest {
    /// Load a manifest from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let manifest: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate manifest contents.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Manifest name cannot be empty");
        }
        if self.category.trim().is_empty() {
            anyhow::bail!("Manifest category cannot be empty");
        }
        if self.languages.is_empty() {
            anyhow::bail!("Manifest must declare at least one language");
        }
        Ok(())
    }

    /// Slug id derived from the display name.
    pub fn id(&self) -> String {
        slug_from_title(&self.name)
    }

    /// Display title for one language.
    pub fn title_for(&self, language: &str) -> &str {
        self.title_translations
            .get(language)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    /// Catalog title: a per-language map when translations exist,
    /// otherwise the flat name.
    pub fn catalog_title(&self) -> Title {
        if self.title_translations.is_empty() {
            Title::Flat(self.name.clone())
        } else {
            let map = self
                .languages
                .iter()
                .map(|lang| (lang.clone(), self.title_for(lang).to_string()))
                .collect();
            Title::PerLanguage(map)
        }
    }
}
