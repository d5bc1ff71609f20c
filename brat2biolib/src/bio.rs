//! BIO output model.
//!
//! A converted file is a flat sequence of [`TaggedToken`] rows. Each row is
//! written as three tab-separated columns: entity id, BIO tag, token text.
//!
//! ```text
//! T25	MET-B	обеспеченности
//! T25	MET-I	населения
//! T26	O	увеличения
//! ```

use std::fmt;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Brat2BioError;
use crate::Result;

/// Column delimiter used in converted files.
pub const DELIMITER: char = '\t';

/// Tag assigned to a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BioTag {
    /// Outside any multi-token entity (`O`)
    Outside,
    /// First token of a span (`TAG-B`)
    Begin(String),
    /// Continuation token of a span (`TAG-I`)
    Inside(String),
}

impl fmt::Display for BioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BioTag::Outside => f.write_str("O"),
            BioTag::Begin(tag) => write!(f, "{tag}-B"),
            BioTag::Inside(tag) => write!(f, "{tag}-I"),
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    /// Entity id carried over from the annotation line
    pub entity_id: String,
    pub bio_tag: BioTag,
    /// Token text with commas removed
    pub token: String,
}

impl TaggedToken {
    /// Build a row, stripping every comma from the token text.
    pub fn new(entity_id: impl Into<String>, bio_tag: BioTag, raw_token: &str) -> Self {
        Self {
            entity_id: entity_id.into(),
            bio_tag,
            token: raw_token.replace(',', ""),
        }
    }
}

/// All rows produced for one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    pub tokens: Vec<TaggedToken>,
}

impl ConversionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty result means there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn extend(&mut self, tokens: impl IntoIterator<Item = TaggedToken>) {
        self.tokens.extend(tokens);
    }

    /// Serialize as BIO text: one row per token, no header.
    pub fn to_bio_string(&self) -> String {
        let mut out = String::new();
        for row in &self.tokens {
            out.push_str(&row.entity_id);
            out.push(DELIMITER);
            out.push_str(&row.bio_tag.to_string());
            out.push(DELIMITER);
            out.push_str(&row.token);
            out.push('\n');
        }
        out
    }

    /// Write the BIO text to `path`, replacing any existing file.
    ///
    /// The text goes to a temporary file in the same directory first and is
    /// renamed into place, so `path` never holds a partial result.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let write_error = |source: std::io::Error| Brat2BioError::FileWrite {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(write_error)?;
        staged
            .write_all(self.to_bio_string().as_bytes())
            .map_err(write_error)?;
        staged.persist(path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}
