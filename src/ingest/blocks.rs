//! Block parsing for raw source documents.
//!
//! A source document is plain UTF-8 text, grouped into blocks by blank
//! lines. Each block is either a single heading line or one line per
//! configured language, in declaration order (Arabic first, then
//! transliteration, then English in the usual setup).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MutunError, Result};

/// One blank-line-delimited group of non-empty, trimmed lines.
pub type Block = Vec<String>;

/// Recognized heading-line markers.
///
/// The first prefix is the one prepended to unmarked heading lines;
/// the rest are accepted on input without re-prefixing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingPrefixes {
    pub prefixes: Vec<String>,
}

impl Default for HeadingPrefixes {
    fn default() -> Self {
        Self {
            prefixes: vec!["INFO: ".to_string(), "DESC: ".to_string()],
        }
    }
}

impl HeadingPrefixes {
    /// Whether a line already starts with a recognized marker.
    pub fn is_heading(&self, line: &str) -> bool {
        self.prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }

    /// Mark a line as a heading, unless it already is one.
    pub fn apply(&self, line: &str) -> String {
        if self.is_heading(line) || self.prefixes.is_empty() {
            line.to_string()
        } else {
            format!("{}{}", self.prefixes[0], line)
        }
    }
}

/// Split document content into blocks.
///
/// Lines are trimmed; blank lines separate blocks and consecutive
/// blanks are collapsed. A final block needs no trailing blank line.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Block = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if !line.is_empty() {
            current.push(line.to_string());
        } else if !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Read a source file and split it into blocks.
pub fn read_blocks(path: &Path) -> Result<Vec<Block>> {
    let content = fs::read_to_string(path).map_err(|e| MutunError::io(path, e))?;
    Ok(parse_blocks(&content))
}

/// Expand heading blocks to full arity and validate every block.
///
/// A 1-line block is marked as a heading (if not already) and
/// replicated `languages` times, so the heading reads identically in
/// every language slot. Any other arity besides `languages` fails with
/// the 1-based block index and its content; nothing is written on that
/// path because normalization runs before any output.
pub fn normalize_blocks(
    blocks: Vec<Block>,
    languages: usize,
    prefixes: &HeadingPrefixes,
) -> Result<Vec<Block>> {
    blocks
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            if block.len() == 1 {
                let heading = prefixes.apply(&block[0]);
                Ok(vec![heading; languages])
            } else if block.len() == languages {
                Ok(block)
            } else {
                Err(MutunError::BlockArity {
                    index: i + 1,
                    expected: languages,
                    found: block.len(),
                    lines: block,
                })
            }
        })
        .collect()
}

/// Project one language's column across all normalized blocks.
pub fn column(blocks: &[Block], index: usize) -> Vec<String> {
    blocks.iter().map(|b| b[index].clone()).collect()
}

/// Count blocks that carry text rather than a heading.
pub fn text_block_count(blocks: &[Block], prefixes: &HeadingPrefixes) -> usize {
    blocks
        .iter()
        .filter(|b| !b.is_empty() && !prefixes.is_heading(&b[0]))
        .count()
}
