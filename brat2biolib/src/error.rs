//! Error types for brat2biolib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or converting annotation files
#[derive(Error, Debug)]
pub enum Brat2BioError {
    /// Failed to read an input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a converted file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catalog does not exist
    #[error("directory not found: {0}")]
    PathNotFound(PathBuf),

    /// Catalog exists but is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Unknown short-token policy name
    #[error("unknown short-token policy '{0}' (expected 'demote' or 'keep')")]
    InvalidPolicy(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A problem with a single annotation line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than the four leading fields (id, tag, start, end)
    #[error("expected at least 4 whitespace-separated fields, found {found}")]
    TooFewFields { found: usize },
}

/// A line-level error together with its 1-based line number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {error}")]
pub struct LineIssue {
    pub line: usize,
    pub error: LineError,
}
