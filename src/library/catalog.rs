//! The per-category catalog: `<category>/index.json`.
//!
//! A catalog is a JSON array of entries keyed by slug id. The file is
//! the authoritative index for its category; per-language text records
//! are derived artifacts kept in lockstep with it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MutunError, Result};

/// Derive a slug id from a display title: lowercased, spaces to hyphens.
pub fn slug_from_title(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

/// Path of the catalog file for a category, relative to the data root.
pub fn catalog_path(root: &Path, category: &str) -> PathBuf {
    root.join(category).join("index.json")
}

/// An entry title. Older catalogs store a flat string, newer ones a
/// per-language map; both forms are read and preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Title {
    Flat(String),
    PerLanguage(BTreeMap<String, String>),
}

impl Title {
    /// The title shown for a given language, falling back to the flat
    /// form or the "en" slot.
    pub fn for_language(&self, language: &str) -> Option<&str> {
        match self {
            Title::Flat(s) => Some(s),
            Title::PerLanguage(map) => map
                .get(language)
                .or_else(|| map.get("en"))
                .map(String::as_str),
        }
    }

    /// The canonical display form, used when re-deriving a slug.
    pub fn display(&self) -> &str {
        match self {
            Title::Flat(s) => s,
            Title::PerLanguage(map) => map
                .get("en")
                .or_else(|| map.values().next())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

/// One catalog entry.
///
/// The key set is the superset of every variant that has existed in
/// the data repository; optional fields are omitted when absent so
/// older readers keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Slug id, unique within the catalog.
    pub id: String,

    pub title: Title,

    #[serde(default)]
    pub description: String,

    /// Number of blocks in the source document.
    pub total_lines: usize,

    /// Ordered language codes this item is stored in.
    pub languages: Vec<String>,

    /// Number of non-heading blocks, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_lines_text: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

/// The catalog for one category. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the catalog at `path`.
    ///
    /// An absent file is an empty catalog. A present but unparseable
    /// file is [`MutunError::CorruptCatalog`] — the historical "start
    /// fresh" fallback silently discarded every prior entry on the
    /// next save, so it now requires [`Catalog::load_or_reset`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| MutunError::io(path, e))?;

        serde_json::from_str(&content).map_err(|source| MutunError::CorruptCatalog {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the catalog, replacing an unparseable file with an empty
    /// catalog. Prior entries are lost on the next save; the caller
    /// must have confirmed that is intended.
    pub fn load_or_reset(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(MutunError::CorruptCatalog { path, .. }) => {
                tracing::warn!(path = %path.display(), "catalog unparseable, starting fresh");
                Ok(Self::new())
            }
            other => other,
        }
    }

    /// Rewrite the catalog file in its entirety.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MutunError::io(parent, e))?;
        }

        // to_string_pretty is deterministic, so repeated saves of the
        // same entries produce byte-identical files.
        let mut content = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            MutunError::CorruptCatalog {
                path: path.to_path_buf(),
                source,
            }
        })?;
        content.push('\n');

        fs::write(path, content).map_err(|e| MutunError::io(path, e))
    }

    /// Replace any entry with the same id, append the new one, and
    /// re-sort by id.
    pub fn upsert(&mut self, entry: CatalogEntry) {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.push(entry);
        self.sort();
    }

    /// Sort entries by id, ascending, case-sensitive ordinal.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.id.cmp(&b.id));
    }

    /// Get an entry by id.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Remove every entry with the given id (stale duplicates included).
    pub fn remove(&mut self, id: &str) -> Option<CatalogEntry> {
        let removed = self.get(id).cloned();
        self.entries.retain(|e| e.id != id);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(id: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title: Title::Flat(id.to_string()),
            description: String::new(),
            total_lines: 3,
            languages: vec!["ar".into(), "transliteration".into(), "en".into()],
            total_lines_text: None,
            audio_id: None,
            item_type: None,
        }
    }

    #[test]
    fn test_slug_from_title() {
        assert_eq!(slug_from_title("Dua Nudba"), "dua-nudba");
        assert_eq!(slug_from_title("After Salat"), "after-salat");
        assert_eq!(slug_from_title("already-slugged"), "already-slugged");
    }

    #[test]
    fn test_upsert_replaces_and_sorts() {
        let mut catalog = Catalog::new();
        catalog.upsert(entry("ziyarat-ashura"));
        catalog.upsert(entry("dua-kumayl"));
        catalog.upsert(entry("ziyarat-ashura"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries[0].id, "dua-kumayl");
        assert_eq!(catalog.entries[1].id, "ziyarat-ashura");
    }

    #[test]
    fn test_upsert_drops_stale_duplicates() {
        let mut catalog = Catalog::new();
        catalog.entries.push(entry("dup"));
        catalog.entries.push(entry("dup"));

        catalog.upsert(entry("dup"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let catalog = Catalog::load(&temp.path().join("index.json")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_corrupt_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Catalog::load(&path).unwrap_err();
        assert!(matches!(err, MutunError::CorruptCatalog { .. }));

        // Explicit opt-in downgrades to an empty catalog.
        let catalog = Catalog::load_or_reset(&path).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_save_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");

        let mut catalog = Catalog::new();
        catalog.upsert(entry("dua-kumayl"));
        catalog.save(&path).unwrap();
        let first = std::fs::read(&path).unwrap();

        let mut again = Catalog::load(&path).unwrap();
        again.upsert(entry("dua-kumayl"));
        again.save(&path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_title_forms_round_trip() {
        let flat: Title = serde_json::from_str(r#""After Salat""#).unwrap();
        assert_eq!(flat.display(), "After Salat");

        let map: Title =
            serde_json::from_str(r#"{"ar": "بعد الصلاة", "en": "After Salat"}"#).unwrap();
        assert_eq!(map.for_language("ar"), Some("بعد الصلاة"));
        assert_eq!(map.for_language("transliteration"), Some("After Salat"));
        assert_eq!(map.display(), "After Salat");
    }
}
