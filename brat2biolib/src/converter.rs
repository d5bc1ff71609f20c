//! High-level conversion API.
//!
//! A [`Converter`] turns each located standoff file into a BIO file next to
//! it, named `<stem><suffix><output_extension>`. Files whose output already
//! exists are skipped, so running a converter twice over the same inputs
//! writes every output once.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;

use crate::annotation::parse_file;
use crate::filter::{DEFAULT_EXTENSION, DEFAULT_SUFFIX};
use crate::options::ShortTokenPolicy;
use crate::Result;

/// Options for converting files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Suffix appended to the input stem to name the output
    pub suffix: String,
    /// Extension stripped from input file names
    pub input_extension: String,
    /// Extension of written files
    pub output_extension: String,
    pub short_tokens: ShortTokenPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            input_extension: DEFAULT_EXTENSION.to_string(),
            output_extension: DEFAULT_EXTENSION.to_string(),
            short_tokens: ShortTokenPolicy::default(),
        }
    }
}

impl ConvertOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn input_extension(mut self, extension: impl Into<String>) -> Self {
        self.input_extension = extension.into();
        self
    }

    pub fn output_extension(mut self, extension: impl Into<String>) -> Self {
        self.output_extension = extension.into();
        self
    }

    pub fn short_tokens(mut self, policy: ShortTokenPolicy) -> Self {
        self.short_tokens = policy;
        self
    }

    /// Derive the output path for an input file.
    ///
    /// The input extension is stripped from the file name when present,
    /// otherwise the last extension is.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let name = input.file_name().unwrap_or_default();
        let name_bytes = name.as_encoded_bytes();
        let extension = self.input_extension.as_bytes();

        let mut file_name = if !extension.is_empty() && name_bytes.ends_with(extension) {
            let stem = &name_bytes[..name_bytes.len() - extension.len()];
            // SAFETY: `stem` comes from `name` split immediately before the
            // non-empty UTF-8 string `input_extension`.
            unsafe { OsStr::from_encoded_bytes_unchecked(stem) }.to_os_string()
        } else {
            input.file_stem().unwrap_or_default().to_os_string()
        };

        file_name.push(&self.suffix);
        file_name.push(&self.output_extension);
        input.with_file_name(file_name)
    }
}

/// What happened to a single input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output written
    Converted {
        output: PathBuf,
        rows: usize,
        /// Malformed lines left out of the output
        skipped_lines: usize,
    },
    /// Output already existed; nothing was read or written
    AlreadyConverted { output: PathBuf },
    /// No tokens found; nothing was written
    Empty,
}

/// A file written during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub skipped_lines: usize,
}

/// A file that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub input: PathBuf,
    pub error: String,
}

/// Summary of one [`Converter::convert_all`] batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    pub converted: Vec<ConvertedFile>,
    pub already_converted: Vec<PathBuf>,
    pub empty: Vec<PathBuf>,
    pub failed: Vec<FailedFile>,
    /// Number of files written in this batch
    pub converted_count: usize,
}

impl ConvertReport {
    /// Number of files written in this batch.
    pub fn converted_count(&self) -> usize {
        self.converted_count
    }

    fn record(&mut self, input: PathBuf, outcome: Result<FileOutcome>) {
        match outcome {
            Ok(FileOutcome::Converted {
                output,
                rows,
                skipped_lines,
            }) => {
                self.converted.push(ConvertedFile {
                    input,
                    output,
                    rows,
                    skipped_lines,
                });
                self.converted_count += 1;
            }
            Ok(FileOutcome::AlreadyConverted { .. }) => self.already_converted.push(input),
            Ok(FileOutcome::Empty) => self.empty.push(input),
            Err(e) => {
                tracing::warn!("failed to convert {}: {}", input.display(), e);
                self.failed.push(FailedFile {
                    input,
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Converts BRAT standoff files to BIO files.
///
/// The converter owns a running count of written files that persists across
/// batches.
#[derive(Debug, Default)]
pub struct Converter {
    options: ConvertOptions,
    parallel: bool,
    converted: AtomicUsize,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            parallel: false,
            converted: AtomicUsize::new(0),
        }
    }

    /// Convert files of a batch on the rayon thread pool.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Total number of files written by this converter.
    pub fn converted_count(&self) -> usize {
        self.converted.load(Ordering::SeqCst)
    }

    /// Convert a single file.
    ///
    /// Skips the file when its output already exists. Writes nothing and
    /// leaves the count untouched when the file yields no tokens.
    pub fn convert_one(&self, path: impl AsRef<Path>) -> Result<FileOutcome> {
        let path = path.as_ref();
        let output = self.options.output_path(path);

        if output.exists() {
            tracing::info!(
                "{} already converted to {}, skipping",
                path.display(),
                output.display()
            );
            return Ok(FileOutcome::AlreadyConverted { output });
        }

        let parsed = parse_file(path, self.options.short_tokens)?;
        for issue in &parsed.issues {
            tracing::warn!("{}: skipping {}", path.display(), issue);
        }

        if parsed.result.is_empty() {
            tracing::debug!("{}: no tokens, nothing to write", path.display());
            return Ok(FileOutcome::Empty);
        }

        parsed.result.write_to(&output)?;
        self.converted.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            "converted {} -> {} ({} rows)",
            path.display(),
            output.display(),
            parsed.result.len()
        );

        Ok(FileOutcome::Converted {
            output,
            rows: parsed.result.len(),
            skipped_lines: parsed.issues.len(),
        })
    }

    /// Convert every file in `paths`.
    ///
    /// A failure on one file is recorded in the report and the batch carries
    /// on with the next path.
    pub fn convert_all(&self, paths: &[PathBuf]) -> ConvertReport {
        let outcomes: Vec<Result<FileOutcome>> = if self.parallel {
            paths.par_iter().map(|p| self.convert_one(p)).collect()
        } else {
            paths.iter().map(|p| self.convert_one(p)).collect()
        };

        let mut report = ConvertReport::default();
        for (path, outcome) in paths.iter().zip(outcomes) {
            report.record(path.clone(), outcome);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{locate, FilterConfig};
    use std::fs;
    use tempfile::tempdir;

    const DATA_ONE: &str = "T25\tMET 864 922\tобеспеченности населения качественными торговыми площадями\n\
                            T26\tCMP 853 863\tувеличения\n";
    const DATA_TWO: &str = "T1\tORG 0 14\tBank of Russia\nT2\tPER 20 25\tIvanov,\n";

    fn create_test_files(dir: &Path) {
        fs::write(dir.join("data_one.ann"), DATA_ONE).unwrap();
        fs::write(dir.join("data_two.ann"), DATA_TWO).unwrap();
    }

    #[test]
    fn test_output_path_default() {
        let options = ConvertOptions::new();
        assert_eq!(
            options.output_path(Path::new("test/data_one.ann")),
            PathBuf::from("test/data_one_bio.ann")
        );
    }

    #[test]
    fn test_output_path_custom() {
        let options = ConvertOptions::new()
            .suffix("_conv")
            .input_extension(".txt")
            .output_extension(".tsv");
        assert_eq!(
            options.output_path(Path::new("corpus/doc.v1.txt")),
            PathBuf::from("corpus/doc.v1_conv.tsv")
        );
    }

    #[test]
    fn test_output_path_other_extension() {
        let options = ConvertOptions::new();
        assert_eq!(
            options.output_path(Path::new("corpus/doc.brat")),
            PathBuf::from("corpus/doc_bio.ann")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_output_path_keeps_non_utf8_names_apart() {
        use std::os::unix::ffi::OsStrExt;

        let options = ConvertOptions::new();
        let a = Path::new("corpus").join(OsStr::from_bytes(b"doc\xff.ann"));
        let b = Path::new("corpus").join(OsStr::from_bytes(b"doc\xfe.ann"));

        let out_a = options.output_path(&a);
        let out_b = options.output_path(&b);

        assert_ne!(out_a, out_b);
        assert_eq!(
            out_a,
            Path::new("corpus").join(OsStr::from_bytes(b"doc\xff_bio.ann"))
        );
        assert_eq!(
            out_b,
            Path::new("corpus").join(OsStr::from_bytes(b"doc\xfe_bio.ann"))
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_convert_all_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let temp = tempdir().unwrap();
        let paths = vec![
            temp.path().join(OsStr::from_bytes(b"doc\xfe.ann")),
            temp.path().join(OsStr::from_bytes(b"doc\xff.ann")),
        ];
        for path in &paths {
            fs::write(path, "T1 ORG 0 9 Alpha Beta\n").unwrap();
        }

        let converter = Converter::new(ConvertOptions::new());
        let report = converter.convert_all(&paths);

        assert_eq!(report.converted_count(), 2);
        assert!(report.already_converted.is_empty());
        assert!(temp
            .path()
            .join(OsStr::from_bytes(b"doc\xfe_bio.ann"))
            .exists());
        assert!(temp
            .path()
            .join(OsStr::from_bytes(b"doc\xff_bio.ann"))
            .exists());
    }

    #[test]
    fn test_convert_one_example() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let converter = Converter::new(ConvertOptions::new());
        let outcome = converter
            .convert_one(temp.path().join("data_one.ann"))
            .unwrap();

        let output = temp.path().join("data_one_bio.ann");
        assert_eq!(
            outcome,
            FileOutcome::Converted {
                output: output.clone(),
                rows: 6,
                skipped_lines: 0,
            }
        );
        assert_eq!(converter.converted_count(), 1);

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 6);
        assert_eq!(written.lines().next().unwrap(), "T25\tMET-B\tобеспеченности");
        assert_eq!(written.lines().last().unwrap(), "T26\tO\tувеличения");
    }

    #[test]
    fn test_convert_one_is_idempotent() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());
        let input = temp.path().join("data_one.ann");

        let converter = Converter::new(ConvertOptions::new());
        converter.convert_one(&input).unwrap();
        let first = fs::read_to_string(temp.path().join("data_one_bio.ann")).unwrap();

        let outcome = converter.convert_one(&input).unwrap();
        assert_eq!(
            outcome,
            FileOutcome::AlreadyConverted {
                output: temp.path().join("data_one_bio.ann")
            }
        );
        assert_eq!(converter.converted_count(), 1);

        let second = fs::read_to_string(temp.path().join("data_one_bio.ann")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_existing_output_is_not_overwritten() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());
        fs::write(temp.path().join("data_one_bio.ann"), "hand edited\n").unwrap();

        let converter = Converter::new(ConvertOptions::new());
        converter
            .convert_one(temp.path().join("data_one.ann"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("data_one_bio.ann")).unwrap(),
            "hand edited\n"
        );
        assert_eq!(converter.converted_count(), 0);
    }

    #[test]
    fn test_convert_one_empty_file() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("empty.ann");
        fs::write(&input, "\nR1 Rel 1 2\n").unwrap();

        let converter = Converter::new(ConvertOptions::new());
        assert_eq!(converter.convert_one(&input).unwrap(), FileOutcome::Empty);
        assert_eq!(converter.converted_count(), 0);
        assert!(!temp.path().join("empty_bio.ann").exists());
    }

    #[test]
    fn test_convert_one_skips_malformed_lines() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("mixed.ann");
        fs::write(&input, "T1 ORG 0 5 Alpha Beta\nT2 PER\nT3 LOC 6 9 Gamma\n").unwrap();

        let converter = Converter::new(ConvertOptions::new());
        let outcome = converter.convert_one(&input).unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Converted {
                output: temp.path().join("mixed_bio.ann"),
                rows: 3,
                skipped_lines: 1,
            }
        );
    }

    #[test]
    fn test_convert_one_keep_policy() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let options = ConvertOptions::new().short_tokens(ShortTokenPolicy::Keep);
        let converter = Converter::new(options);
        converter
            .convert_one(temp.path().join("data_two.ann"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("data_two_bio.ann")).unwrap(),
            "T1\tORG-B\tBank\nT1\tORG-I\tof\nT1\tORG-I\tRussia\nT2\tO\tIvanov\n"
        );
    }

    #[test]
    fn test_convert_one_missing_file() {
        let converter = Converter::new(ConvertOptions::new());
        assert!(converter.convert_one("/nonexistent/data.ann").is_err());
        assert_eq!(converter.converted_count(), 0);
    }

    #[test]
    fn test_convert_all_continues_after_failure() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let paths = vec![
            temp.path().join("data_one.ann"),
            temp.path().join("missing.ann"),
            temp.path().join("data_two.ann"),
        ];

        let converter = Converter::new(ConvertOptions::new());
        let report = converter.convert_all(&paths);

        assert_eq!(report.converted_count(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].input, paths[1]);
        assert_eq!(converter.converted_count(), 2);
        assert!(temp.path().join("data_one_bio.ann").exists());
        assert!(temp.path().join("data_two_bio.ann").exists());
    }

    #[test]
    fn test_convert_all_twice() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let paths = locate(temp.path(), &FilterConfig::new()).unwrap();
        let converter = Converter::new(ConvertOptions::new());

        let first = converter.convert_all(&paths);
        assert_eq!(first.converted_count(), 2);

        // Outputs are not picked up again by discovery
        let paths = locate(temp.path(), &FilterConfig::new()).unwrap();
        assert_eq!(paths.len(), 2);

        let second = converter.convert_all(&paths);
        assert_eq!(second.converted_count(), 0);
        assert_eq!(second.already_converted, paths);
        assert_eq!(converter.converted_count(), 2);
    }

    #[test]
    fn test_convert_all_parallel() {
        let temp = tempdir().unwrap();
        for i in 0..16 {
            fs::write(
                temp.path().join(format!("doc_{i:02}.ann")),
                format!("T{i} ORG 0 9 Alpha Beta Gamma\n"),
            )
            .unwrap();
        }
        fs::write(temp.path().join("doc_empty.ann"), "").unwrap();

        let paths = locate(temp.path(), &FilterConfig::new()).unwrap();
        let converter = Converter::new(ConvertOptions::new()).with_parallelism(true);
        let report = converter.convert_all(&paths);

        assert_eq!(report.converted_count(), 16);
        assert_eq!(report.empty.len(), 1);
        assert_eq!(converter.converted_count(), 16);

        let inputs: Vec<&PathBuf> = report.converted.iter().map(|c| &c.input).collect();
        let mut sorted = inputs.clone();
        sorted.sort();
        assert_eq!(inputs, sorted);
    }
}
