//! Configuration for mutun paths and defaults.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (MUTUN_ROOT)
//! 2. Config file (.mutun/config.yaml)
//! 3. Defaults (current directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .mutun/config.yaml
//! - Paths in config file are relative to the config file's parent directory
//!
//! The resolved config is a plain value handed to each operation; there
//! is no process-global configuration state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ingest::HeadingPrefixes;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Recognized heading markers, primary first.
    #[serde(default)]
    pub heading_prefixes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Data repository root (relative to config file)
    pub root: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsConfig {
    /// Category used when a command does not name one
    pub category: Option<String>,
    /// Default raw source file name
    pub input: Option<String>,
    /// Default item manifest file name
    pub manifest: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the data repository root
    pub root: PathBuf,
    /// Category used when a command does not name one
    pub default_category: Option<String>,
    /// Raw source file used when a command does not name one
    pub default_input: PathBuf,
    /// Item manifest used when a command does not name one
    pub default_manifest: PathBuf,
    /// Recognized heading markers
    pub prefixes: HeadingPrefixes,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// The category for a command: explicit flag first, then the
    /// configured default.
    pub fn category<'a>(&'a self, flag: Option<&'a str>) -> Result<&'a str> {
        flag.or(self.default_category.as_deref()).context(
            "No category given; pass --category or set defaults.category in .mutun/config.yaml",
        )
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".mutun").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let config_file = find_config_file();

    let (root, defaults, prefixes) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .mutun/ (i.e., grandparent of config.yaml)
        let base_dir = config_path
            .parent() // .mutun/
            .and_then(|p| p.parent()) // repo root
            .unwrap_or(Path::new("."));

        let root = if let Ok(env_root) = std::env::var("MUTUN_ROOT") {
            PathBuf::from(env_root)
        } else if let Some(ref root_path) = config.paths.root {
            resolve_path(base_dir, root_path)
        } else {
            base_dir.to_path_buf()
        };

        let prefixes = config
            .heading_prefixes
            .map(|prefixes| HeadingPrefixes { prefixes })
            .unwrap_or_default();

        (root, config.defaults, prefixes)
    } else {
        let root = std::env::var("MUTUN_ROOT")
            .map(PathBuf::from)
            .unwrap_or(cwd);

        (root, DefaultsConfig::default(), HeadingPrefixes::default())
    };

    Ok(ResolvedConfig {
        root,
        default_category: defaults.category,
        default_input: PathBuf::from(defaults.input.as_deref().unwrap_or("raw.txt")),
        default_manifest: PathBuf::from(defaults.manifest.as_deref().unwrap_or("item.yaml")),
        prefixes,
        config_file,
    })
}
