//! Per-language text records: `<category>/text/<language>/<id>.json`.
//!
//! A record holds one item's full line sequence in one language. Line i
//! of every language for the same id refers to the same source block,
//! so records for one item must stay equal in length.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MutunError, Result};

/// One item's text in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageText {
    /// Slug id, matching the catalog entry.
    pub id: String,

    /// Display title in this language.
    pub title: String,

    /// Language code ("ar", "transliteration", "en", ...).
    pub language: String,

    /// Ordered lines, index-aligned across languages.
    pub text: Vec<String>,
}

/// Path of a text record, relative to the data root.
pub fn record_path(root: &Path, category: &str, language: &str, id: &str) -> PathBuf {
    root.join(category)
        .join("text")
        .join(language)
        .join(format!("{id}.json"))
}

impl LanguageText {
    /// Load a record from `path`. Absence is [`MutunError::MissingTextFile`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MutunError::MissingTextFile {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| MutunError::io(path, e))?;

        serde_json::from_str(&content).map_err(|source| MutunError::CorruptRecord {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the record to `path`, creating intermediate directories
    /// and overwriting any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MutunError::io(parent, e))?;
        }

        let mut content = serde_json::to_string_pretty(self).map_err(|source| {
            MutunError::CorruptRecord {
                path: path.to_path_buf(),
                source,
            }
        })?;
        content.push('\n');

        fs::write(path, content).map_err(|e| MutunError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_path_layout() {
        let path = record_path(Path::new("/data"), "duas", "ar", "dua-kumayl");
        assert_eq!(path, PathBuf::from("/data/duas/text/ar/dua-kumayl.json"));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = record_path(temp.path(), "duas", "en", "dua-kumayl");

        let record = LanguageText {
            id: "dua-kumayl".into(),
            title: "Dua Kumayl".into(),
            language: "en".into(),
            text: vec!["INFO: Opening".into(), "O Allah".into()],
        };
        record.save(&path).unwrap();

        let loaded = LanguageText::load(&path).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_missing_is_typed_error() {
        let temp = TempDir::new().unwrap();
        let err = LanguageText::load(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, MutunError::MissingTextFile { .. }));
    }

    #[test]
    fn test_save_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = record_path(temp.path(), "duas", "en", "x");

        let mut record = LanguageText {
            id: "x".into(),
            title: "X".into(),
            language: "en".into(),
            text: vec!["old".into()],
        };
        record.save(&path).unwrap();

        record.text = vec!["new".into()];
        record.save(&path).unwrap();

        assert_eq!(LanguageText::load(&path).unwrap().text, vec!["new"]);
    }
}
