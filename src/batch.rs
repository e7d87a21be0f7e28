//! Directory batch processing.
//!
//! Every `*.pdf` file in an input directory is run through the outline
//! pipeline and the result is written as `<stem>.json` into an output
//! directory. Documents are independent: a failure on one is recorded in the
//! [`BatchReport`] and the rest of the batch continues.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::parser::OutlineOptions;
use crate::render::{to_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Per-document extraction options
    pub outline: OutlineOptions,

    /// JSON layout of the written files
    pub format: JsonFormat,

    /// Process documents on the Rayon thread pool
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            outline: OutlineOptions::default(),
            format: JsonFormat::Pretty,
            parallel: true,
        }
    }
}

impl BatchOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set per-document extraction options.
    pub fn with_outline_options(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }

    /// Set the JSON output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// An outline was written to this path
    Written(PathBuf),
    /// The document had no extractable text; nothing was written
    Skipped,
}

/// Progress notification emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// The batch found this many input files
    Started { total: usize },
    /// A file finished, successfully or not
    Finished {
        input: &'a Path,
        outcome: &'a Result<FileOutcome>,
    },
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written, in input order
    pub written: Vec<PathBuf>,
    /// Inputs without extractable text
    pub skipped: Vec<PathBuf>,
    /// Inputs that failed, with their error
    pub failed: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    /// Number of inputs processed.
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len() + self.failed.len()
    }

    /// Whether every input was processed without error.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// List the PDF files directly inside `dir`, sorted by path.
///
/// A file qualifies when its name ends in `.pdf`, compared
/// case-insensitively, so a file named just `.pdf` is included.
/// Subdirectories are not entered.
pub fn scan_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}

/// Output path for an input file: `<output_dir>/<stem>.json`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.json", stem))
}

/// Extract one document and write its outline into `output_dir`.
pub fn process_file(input: &Path, output_dir: &Path, options: &BatchOptions) -> Result<FileOutcome> {
    let result = match crate::extract_outline_with_options(input, &options.outline)? {
        Some(result) => result,
        None => {
            log::info!("No text found in {}; skipped", input.display());
            return Ok(FileOutcome::Skipped);
        }
    };

    let path = output_path(input, output_dir);
    fs::write(&path, to_json(&result, options.format)?)?;
    log::debug!(
        "Wrote {} ({} headings) for {}",
        path.display(),
        result.len(),
        input.display()
    );
    Ok(FileOutcome::Written(path))
}

/// Process every PDF in `input_dir`, writing outlines into `output_dir`.
///
/// The output directory is created if needed. `on_event` is called once
/// with [`BatchEvent::Started`] and then once per file as it finishes; in
/// parallel mode files may finish in any order, but the returned report
/// lists them in input order.
pub fn run_batch<F>(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    on_event: F,
) -> Result<BatchReport>
where
    F: Fn(&BatchEvent<'_>) + Sync,
{
    options.outline.heuristics.validate()?;

    let inputs = scan_pdfs(input_dir)?;
    fs::create_dir_all(output_dir)?;

    log::info!(
        "Processing {} PDF files from {} into {}",
        inputs.len(),
        input_dir.display(),
        output_dir.display()
    );
    on_event(&BatchEvent::Started {
        total: inputs.len(),
    });

    let process = |input: &PathBuf| {
        let outcome = process_file(input, output_dir, options);
        on_event(&BatchEvent::Finished {
            input,
            outcome: &outcome,
        });
        outcome
    };

    let outcomes: Vec<Result<FileOutcome>> = if options.parallel {
        inputs.par_iter().map(process).collect()
    } else {
        inputs.iter().map(process).collect()
    };

    let mut report = BatchReport::default();
    for (input, outcome) in inputs.into_iter().zip(outcomes) {
        match outcome {
            Ok(FileOutcome::Written(path)) => report.written.push(path),
            Ok(FileOutcome::Skipped) => report.skipped.push(input),
            Err(e) => {
                log::warn!("Failed to process {}: {}", input.display(), e);
                report.failed.push((input, e));
            }
        }
    }

    Ok(report)
}
