//! BRAT standoff parsing and BIO tagging.
//!
//! Each standoff line has the shape
//!
//! ```text
//! <entity_id> <tag> <start_offset> <end_offset> <token_1> ... <token_n>
//! ```
//!
//! The character offsets are discarded. Tokens are tagged as follows:
//!
//! - a span with a single token is tagged `O`
//! - in a longer span the first token is tagged `TAG-B` and every following
//!   token `TAG-I`
//! - under [`ShortTokenPolicy::Demote`], any token of two characters or fewer
//!   is tagged `O` instead; the other tokens keep their positional tag

use std::fs;
use std::path::Path;

use crate::bio::{BioTag, ConversionResult, TaggedToken};
use crate::error::{Brat2BioError, LineError, LineIssue};
use crate::options::ShortTokenPolicy;
use crate::Result;

/// Fields before the first token: id, tag, start offset, end offset.
const TOKEN_OFFSET: usize = 4;

const BOM: char = '\u{feff}';

/// One parsed standoff line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationLine {
    pub entity_id: String,
    pub tag: String,
    pub tokens: Vec<String>,
}

impl AnnotationLine {
    /// Parse a single standoff line.
    ///
    /// Returns `Ok(None)` for blank lines. A line with exactly four fields
    /// parses to an annotation with no tokens.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, LineError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            return Ok(None);
        }
        if fields.len() < TOKEN_OFFSET {
            return Err(LineError::TooFewFields {
                found: fields.len(),
            });
        }

        Ok(Some(Self {
            entity_id: fields[0].to_string(),
            tag: fields[1].to_string(),
            tokens: fields[TOKEN_OFFSET..]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }))
    }

    /// Tag every token of this annotation.
    pub fn tag_tokens(&self, policy: ShortTokenPolicy) -> Vec<TaggedToken> {
        match self.tokens.as_slice() {
            [] => Vec::new(),
            [single] => vec![TaggedToken::new(&self.entity_id, BioTag::Outside, single)],
            tokens => tokens
                .iter()
                .enumerate()
                .map(|(position, token)| {
                    let bio_tag = if policy.demotes(token) {
                        BioTag::Outside
                    } else if position == 0 {
                        BioTag::Begin(self.tag.clone())
                    } else {
                        BioTag::Inside(self.tag.clone())
                    };
                    TaggedToken::new(&self.entity_id, bio_tag, token)
                })
                .collect(),
        }
    }
}

/// Rows and line-level problems collected from one annotation document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAnnotations {
    pub result: ConversionResult,
    /// Lines that could not be parsed and were skipped
    pub issues: Vec<LineIssue>,
}

/// Parse and tag a whole standoff document.
///
/// Malformed lines are recorded in [`ParsedAnnotations::issues`] and skipped;
/// the rest of the document is still converted.
///
/// # Example
///
/// ```rust
/// use brat2biolib::annotation::parse_string;
/// use brat2biolib::ShortTokenPolicy;
///
/// let parsed = parse_string("T1\tORG 0 9\tBank of Russia\n", ShortTokenPolicy::Demote);
/// assert_eq!(
///     parsed.result.to_bio_string(),
///     "T1\tORG-B\tBank\nT1\tO\tof\nT1\tORG-I\tRussia\n"
/// );
/// ```
pub fn parse_string(content: &str, policy: ShortTokenPolicy) -> ParsedAnnotations {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut parsed = ParsedAnnotations::default();

    for (index, line) in content.lines().enumerate() {
        match AnnotationLine::parse(line) {
            Ok(Some(annotation)) => parsed.result.extend(annotation.tag_tokens(policy)),
            Ok(None) => {}
            Err(error) => parsed.issues.push(LineIssue {
                line: index + 1,
                error,
            }),
        }
    }

    parsed
}

/// Read a standoff file as UTF-8 and parse it.
pub fn parse_file(path: impl AsRef<Path>, policy: ShortTokenPolicy) -> Result<ParsedAnnotations> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Brat2BioError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_string(&content, policy))
}
