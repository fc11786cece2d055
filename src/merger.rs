//! Multi-file merging.
//!
//! The merger is the isolation boundary of the engine: every file is
//! detected and parsed on its own, and a file that fails is reported and
//! skipped while the others still contribute. Features are concatenated in
//! input order and tagged with their file name in `properties.source`,
//! since `id` and `related` are only unique within one file.
//!
//! # Example
//!
//! ```rust
//! use chatmap::config::ParseConfig;
//! use chatmap::merger::{FileStatus, merge};
//!
//! let files = [
//!     ("chat.txt", "[2024-03-02 09:05] Alice: geo:1.0,2.0"),
//!     ("broken.json", r#"{"messages": [ {"id": "#),
//! ];
//!
//! let output = merge(files, &ParseConfig::default());
//! assert_eq!(output.geojson.len(), 1);
//! assert_eq!(output.geojson.features[0].properties.source.as_deref(), Some("chat.txt"));
//! assert!(matches!(output.files[1].status, FileStatus::Skipped { .. }));
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::config::ParseConfig;
use crate::detect::detect_parser;
use crate::error::ChatmapError;
use crate::geojson::FeatureCollection;
use crate::index::MessageIndex;
use crate::parser::Platform;

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    /// Parsed; contributed `features` features out of `messages` records
    Parsed { features: usize, messages: usize },
    /// Blank input, nothing to contribute
    Empty,
    /// Detection or parsing failed
    Skipped { reason: String },
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Parsed { features, messages } => {
                write!(f, "{features} locations from {messages} messages")
            }
            FileStatus::Empty => write!(f, "empty"),
            FileStatus::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

/// Per-file entry of a [`MergeOutput`].
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub name: String,
    /// Detected platform, `None` when detection failed
    pub platform: Option<Platform>,
    pub status: FileStatus,
    /// The file's message index, empty unless the file was parsed
    #[serde(skip)]
    pub messages: MessageIndex,
}

impl FileReport {
    fn skipped(name: String, platform: Option<Platform>, error: &ChatmapError) -> Self {
        tracing::warn!(file = %name, error = %error, "skipping file");
        Self {
            name,
            platform,
            status: FileStatus::Skipped {
                reason: error.to_string(),
            },
            messages: MessageIndex::new(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, FileStatus::Skipped { .. })
    }
}

/// Result of merging a set of files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeOutput {
    /// Features of all files, in file order
    pub geojson: FeatureCollection,
    /// One report per input file, in input order
    pub files: Vec<FileReport>,
}

impl MergeOutput {
    /// Returns the report for `name`, if that file was part of the merge.
    pub fn file(&self, name: &str) -> Option<&FileReport> {
        self.files.iter().find(|report| report.name == name)
    }

    /// Number of files that were skipped.
    pub fn skipped_count(&self) -> usize {
        self.files.iter().filter(|report| report.is_skipped()).count()
    }

    fn push(&mut self, (report, features): (FileReport, FeatureCollection)) {
        self.geojson.extend(features);
        self.files.push(report);
    }
}

/// Detects and parses one file.
fn process_file(name: String, content: &str, config: &ParseConfig) -> (FileReport, FeatureCollection) {
    if content.trim().is_empty() {
        return (empty_report(name, None), FeatureCollection::new());
    }

    let parser = match detect_parser(content) {
        Ok(parser) => parser,
        Err(_) => {
            let error = ChatmapError::unrecognized_format(Some(name.clone()));
            return (FileReport::skipped(name, None, &error), FeatureCollection::new());
        }
    };
    let platform = Some(parser.platform());

    match parser.parse_str(content, config) {
        Ok(Some(mut output)) => {
            for feature in &mut output.geojson.features {
                feature.properties.source = Some(name.clone());
            }
            tracing::info!(
                file = %name,
                platform = parser.name(),
                features = output.geojson.len(),
                messages = output.messages.len(),
                "parsed file"
            );
            let report = FileReport {
                name,
                platform,
                status: FileStatus::Parsed {
                    features: output.geojson.len(),
                    messages: output.messages.len(),
                },
                messages: output.messages,
            };
            (report, output.geojson)
        }
        Ok(None) => (empty_report(name, platform), FeatureCollection::new()),
        Err(error) => (FileReport::skipped(name, platform, &error), FeatureCollection::new()),
    }
}

fn empty_report(name: String, platform: Option<Platform>) -> FileReport {
    tracing::info!(file = %name, "empty file");
    FileReport {
        name,
        platform,
        status: FileStatus::Empty,
        messages: MessageIndex::new(),
    }
}

/// Merges text files given as `(name, content)` pairs, in iteration order.
///
/// Never fails: unusable files show up as
/// [`FileStatus::Skipped`] in [`MergeOutput::files`].
pub fn merge<I, N, T>(files: I, config: &ParseConfig) -> MergeOutput
where
    I: IntoIterator<Item = (N, T)>,
    N: Into<String>,
    T: AsRef<str>,
{
    let mut output = MergeOutput::default();
    for (name, content) in files {
        output.push(process_file(name.into(), content.as_ref(), config));
    }
    output
}

/// Like [`merge`], for raw bytes. Files that are not valid UTF-8 are skipped.
pub fn merge_bytes<I, N, B>(files: I, config: &ParseConfig) -> MergeOutput
where
    I: IntoIterator<Item = (N, B)>,
    N: Into<String>,
    B: AsRef<[u8]>,
{
    let mut output = MergeOutput::default();
    for (name, bytes) in files {
        output.push(process_bytes(name.into(), bytes.as_ref(), config));
    }
    output
}

/// Reads and merges files from disk, named by their displayed path.
///
/// A file that cannot be read is skipped with the IO error as its reason;
/// the remaining files are still merged.
pub fn merge_paths<I, P>(paths: I, config: &ParseConfig) -> MergeOutput
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut output = MergeOutput::default();
    for path in paths {
        let path = path.as_ref();
        let name = path.display().to_string();
        match fs::read(path) {
            Ok(bytes) => output.push(process_bytes(name, &bytes, config)),
            Err(err) => {
                let error = ChatmapError::from(err);
                output.push((FileReport::skipped(name, None, &error), FeatureCollection::new()));
            }
        }
    }
    output
}

fn process_bytes(name: String, bytes: &[u8], config: &ParseConfig) -> (FileReport, FeatureCollection) {
    match String::from_utf8(bytes.to_vec()) {
        Ok(content) => process_file(name, &content, config),
        Err(err) => {
            let error = ChatmapError::Utf8 {
                context: name.clone(),
                source: err,
            };
            (FileReport::skipped(name, None, &error), FeatureCollection::new())
        }
    }
}

/// Like [`merge`], parsing the files on the rayon thread pool.
///
/// Files share no state, so the result is identical to [`merge`] on the
/// same input: reports and features keep the input order.
#[cfg(feature = "parallel")]
pub fn merge_parallel<N, T>(files: &[(N, T)], config: &ParseConfig) -> MergeOutput
where
    N: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
{
    let results: Vec<(FileReport, FeatureCollection)> = files
        .par_iter()
        .map(|(name, content)| process_file(name.as_ref().to_string(), content.as_ref(), config))
        .collect();

    let mut output = MergeOutput::default();
    for result in results {
        output.push(result);
    }
    output
}
