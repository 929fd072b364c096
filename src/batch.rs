//! Directory batch processing.
//!
//! Every PDF is an independent unit: a document that fails to extract still
//! gets a degraded result file, and one failure never stops its siblings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::analysis::{AnalyzerConfig, OutlineAnalyzer};
use crate::error::Result;
use crate::model::DocumentResult;
use crate::parser::{ExtractOptions, SpanExtractor};
use crate::render::{validate_result, write_json, JsonFormat, SchemaValidator, ValidationReport};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory receiving one `<stem>.json` per input
    pub output_dir: PathBuf,
    /// JSON layout of the output files
    pub json_format: JsonFormat,
    /// Schema to validate each result against (advisory)
    pub schema: Option<SchemaValidator>,
    /// Process documents on the rayon pool
    pub parallel: bool,
    /// Analyzer thresholds
    pub config: AnalyzerConfig,
    /// Span extraction options
    pub extract: ExtractOptions,
}

impl BatchOptions {
    /// Create options writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            json_format: JsonFormat::Pretty,
            schema: None,
            parallel: true,
            config: AnalyzerConfig::default(),
            extract: ExtractOptions::default(),
        }
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Validate results against a schema.
    pub fn with_schema(mut self, schema: SchemaValidator) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set analyzer thresholds.
    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set span extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }
}

/// Progress notification emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// A document was picked up.
    Started { input: PathBuf },
    /// A document's result was written.
    Finished {
        input: PathBuf,
        output: PathBuf,
        headings: usize,
        valid: bool,
    },
    /// A document could not be processed; a degraded result may exist.
    Failed { input: PathBuf, error: String },
}

/// Outcome for a single input file.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Input PDF
    pub input: PathBuf,
    /// Written JSON file, if any write succeeded
    pub output: Option<PathBuf>,
    /// Pages in the document (0 if it could not be opened)
    pub pages: u32,
    /// Headings in the written outline
    pub headings: usize,
    /// Schema validation outcome
    pub validation: ValidationReport,
    /// Extraction or write error, if the document failed
    pub error: Option<String>,
}

impl DocumentReport {
    /// Whether the document was processed without error.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Totals for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Documents attempted
    pub processed: usize,
    /// Documents processed without error
    pub succeeded: usize,
    /// Documents that failed (degraded or missing output)
    pub failed: usize,
    /// Documents whose result did not match the schema
    pub invalid: usize,
    /// Pages across all opened documents
    pub total_pages: u64,
    /// Wall-clock time of the run
    pub elapsed: Duration,
    /// Per-document outcomes, in input order
    pub reports: Vec<DocumentReport>,
}

impl BatchSummary {
    fn from_reports(reports: Vec<DocumentReport>, elapsed: Duration) -> Self {
        let failed = reports.iter().filter(|r| !r.succeeded()).count();
        Self {
            processed: reports.len(),
            succeeded: reports.len() - failed,
            failed,
            invalid: reports.iter().filter(|r| !r.validation.valid).count(),
            total_pages: reports.iter().map(|r| u64::from(r.pages)).sum(),
            elapsed,
            reports,
        }
    }

    /// Average wall-clock time per document.
    pub fn average_time(&self) -> Duration {
        match u32::try_from(self.processed) {
            Ok(n) if n > 0 => self.elapsed / n,
            _ => Duration::ZERO,
        }
    }
}

/// Processes a set of PDFs into JSON outline files.
#[derive(Debug)]
pub struct BatchProcessor {
    options: BatchOptions,
    analyzer: OutlineAnalyzer,
}

impl BatchProcessor {
    /// Create a processor.
    pub fn new(options: BatchOptions) -> Self {
        let analyzer = OutlineAnalyzer::with_config(options.config.clone());
        Self { options, analyzer }
    }

    /// The active options.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// PDF files directly inside `input_dir`, sorted by name.
    ///
    /// The `.pdf` extension is matched case-insensitively.
    pub fn discover<P: AsRef<Path>>(input_dir: P) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Process `files`, writing results into the output directory.
    ///
    /// Only failing to create the output directory aborts the run;
    /// per-document problems end up in the summary.
    pub fn run(
        &self,
        files: &[PathBuf],
        events: Option<Sender<BatchEvent>>,
    ) -> Result<BatchSummary> {
        fs::create_dir_all(&self.options.output_dir)?;
        let start = Instant::now();

        let process = |input: &PathBuf| {
            let started = BatchEvent::Started {
                input: input.clone(),
            };
            emit(&events, started);
            let report = self.process_file(input);
            let event = match (&report.error, &report.output) {
                (None, Some(output)) => BatchEvent::Finished {
                    input: input.clone(),
                    output: output.clone(),
                    headings: report.headings,
                    valid: report.validation.valid,
                },
                (error, _) => BatchEvent::Failed {
                    input: input.clone(),
                    error: error.clone().unwrap_or_default(),
                },
            };
            emit(&events, event);
            report
        };

        let reports: Vec<DocumentReport> = if self.options.parallel {
            files.par_iter().map(process).collect()
        } else {
            files.iter().map(process).collect()
        };

        let summary = BatchSummary::from_reports(reports, start.elapsed());
        log::info!(
            "processed {} documents ({} succeeded, {} failed, {} invalid) in {:.2}s",
            summary.processed,
            summary.succeeded,
            summary.failed,
            summary.invalid,
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }

    /// Process one file. Never fails; problems are recorded in the report.
    pub fn process_file(&self, input: &Path) -> DocumentReport {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let output = self.output_path(input);

        let mut error = None;
        let mut pages = 0;
        let result = match self.analyze(input) {
            Ok((result, page_count)) => {
                pages = page_count;
                result
            }
            Err(e) => {
                log::warn!("{}: {}", file_name, e);
                error = Some(e.to_string());
                DocumentResult::failed()
            }
        };

        let validation = validate_result(self.options.schema.as_ref(), &result)
            .unwrap_or_else(|e| ValidationReport {
                valid: false,
                skipped: false,
                errors: vec![e.to_string()],
            });
        if !validation.valid {
            log::warn!(
                "{}: output does not match schema: {}",
                file_name,
                validation.errors.join("; ")
            );
        }

        let mut headings = result.outline.len();
        let written = match write_json(&result, &output, self.options.json_format) {
            Ok(()) => Some(output),
            Err(e) => {
                log::error!("{}: cannot write result: {}", file_name, e);
                error.get_or_insert_with(|| e.to_string());
                headings = 0;
                let fallback = DocumentResult::failed_file(&file_name);
                write_json(&fallback, &output, self.options.json_format)
                    .ok()
                    .map(|()| output)
            }
        };

        DocumentReport {
            input: input.to_path_buf(),
            output: written,
            pages,
            headings,
            validation,
            error,
        }
    }

    fn analyze(&self, input: &Path) -> Result<(DocumentResult, u32)> {
        let extractor = SpanExtractor::open_with_options(input, self.options.extract.clone())?;
        let document = extractor.extract_document()?;
        Ok((self.analyzer.analyze(&document), document.page_count))
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        self.options.output_dir.join(format!("{}.json", stem))
    }
}

fn emit(events: &Option<Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::from_json;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "A.PDF", "notes.txt", "c.Pdf"] {
            std::fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = BatchProcessor::discover(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf", "c.Pdf"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        assert!(BatchProcessor::discover("/definitely/not/here").is_err());
    }

    #[test]
    fn test_unreadable_document_degrades() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let input = input_dir.path().join("broken.pdf");
        std::fs::write(&input, b"%PDF-1.4\nthis is not a real document").unwrap();

        let processor = BatchProcessor::new(BatchOptions::new(output_dir.path()));
        let report = processor.process_file(&input);

        assert!(!report.succeeded());
        assert_eq!(report.pages, 0);
        let output = report.output.unwrap();
        assert_eq!(output, output_dir.path().join("broken.json"));
        let written = from_json(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(written, DocumentResult::failed());
    }

    #[test]
    fn test_run_emits_events() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let input = input_dir.path().join("junk.pdf");
        std::fs::write(&input, b"not a pdf").unwrap();

        let (tx, rx) = crossbeam_channel::unbounded();
        let processor = BatchProcessor::new(BatchOptions::new(output_dir.path()).sequential());
        let summary = processor.run(&[input.clone()], Some(tx)).unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.invalid, 0);

        let events: Vec<BatchEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], BatchEvent::Started { input: input.clone() });
        assert!(matches!(&events[1], BatchEvent::Failed { input: i, .. } if *i == input));
    }

    #[test]
    fn test_summary_average_time() {
        let summary = BatchSummary {
            processed: 4,
            elapsed: Duration::from_secs(2),
            ..BatchSummary::default()
        };
        assert_eq!(summary.average_time(), Duration::from_millis(500));
        assert_eq!(BatchSummary::default().average_time(), Duration::ZERO);
    }
}
