//! # brat2biolib
//!
//! Converts entity annotations in the BRAT standoff format into token-per-line
//! BIO tagging for sequence-labeling training data.
//!
//! ## Overview
//!
//! A standoff line such as
//!
//! ```text
//! T25	MET 864 922	обеспеченности населения качественными торговыми площадями
//! ```
//!
//! becomes one row per token:
//!
//! ```text
//! T25	MET-B	обеспеченности
//! T25	MET-I	населения
//! T25	MET-I	качественными
//! T25	MET-I	торговыми
//! T25	MET-I	площадями
//! ```
//!
//! The pipeline has two stages:
//!
//! - **Discovery** ([`locate`]): find `.ann` files in a catalog, skipping files
//!   that are already conversion outputs
//! - **Conversion** ([`Converter`]): parse, tag and write each file next to its
//!   input, skipping inputs whose output already exists
//!
//! ## Example
//!
//! ```rust
//! use brat2biolib::{locate, ConvertOptions, Converter, FilterConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("doc.ann"), "T1\tORG 0 14\tBank of Russia\n").unwrap();
//!
//! let files = locate(dir.path(), &FilterConfig::new()).unwrap();
//! let converter = Converter::new(ConvertOptions::new());
//! let report = converter.convert_all(&files);
//!
//! assert_eq!(report.converted_count(), 1);
//! assert_eq!(
//!     fs::read_to_string(dir.path().join("doc_bio.ann")).unwrap(),
//!     "T1\tORG-B\tBank\nT1\tO\tof\nT1\tORG-I\tRussia\n"
//! );
//! ```

pub mod annotation;
pub mod bio;
pub mod converter;
pub mod error;
pub mod filter;
pub mod options;

pub use annotation::{parse_file, parse_string, AnnotationLine, ParsedAnnotations};
pub use bio::{BioTag, ConversionResult, TaggedToken};
pub use converter::{
    ConvertOptions, ConvertReport, ConvertedFile, Converter, FailedFile, FileOutcome,
};
pub use error::{Brat2BioError, LineError, LineIssue};
pub use filter::{locate, resolve_catalog, FilterConfig};
pub use options::ShortTokenPolicy;

/// Result type for brat2biolib operations
pub type Result<T> = std::result::Result<T, Brat2BioError>;
