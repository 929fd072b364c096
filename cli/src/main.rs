//! pdf-outline CLI - PDF title and heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::render::{self, DEFAULT_SCHEMA_PATHS};
use pdf_outline::{
    AnalyzerConfig, BatchEvent, BatchOptions, BatchProcessor, BatchSummary, JsonFormat, PdfOutline,
    SchemaValidator, SpanExtractor,
};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Infer the title and heading outline of PDF documents", long_about = None)]
struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of a single PDF as JSON
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Analyzer configuration (JSON)
        #[arg(long, value_name = "FILE", env = "PDF_OUTLINE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Extract outlines of every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory receiving one JSON file per PDF
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// JSON Schema to validate results against
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// Analyzer configuration (JSON)
        #[arg(long, value_name = "FILE", env = "PDF_OUTLINE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Dump the text spans extracted from a PDF
    Spans {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only show this page (1-indexed)
        #[arg(long)]
        page: Option<u32>,
    },

    /// Validate an outline JSON file against a schema
    Validate {
        /// Outline JSON file
        #[arg(value_name = "JSON")]
        input: PathBuf,

        /// JSON Schema file
        #[arg(long, value_name = "FILE")]
        schema: PathBuf,
    },

    /// Show version information
    Version,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            compact,
            config,
        }) => cmd_extract(&input, output.as_deref(), compact, config.as_deref()),
        Some(Commands::Batch {
            input,
            output,
            schema,
            compact,
            sequential,
            config,
        }) => cmd_batch(
            &input,
            &output,
            schema.as_deref(),
            compact,
            sequential,
            config.as_deref(),
            cli.verbose,
        ),
        Some(Commands::Spans { input, page }) => cmd_spans(&input, page),
        Some(Commands::Validate { input, schema }) => cmd_validate(&input, &schema),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdf-outline <COMMAND>".yellow());
            println!("       pdf-outline --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(AnalyzerConfig::from_json_file(path)?),
        None => Ok(AnalyzerConfig::default()),
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    config: Option<&Path>,
) -> CliResult {
    let config = load_config(config)?;
    let result = PdfOutline::new().with_config(config).outline(input);
    if result.is_failed() {
        eprintln!("{} could not read {}", "Warning:".yellow(), input.display());
    }
    let json = render::to_json(&result, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, format!("{}\n", json))?;
        println!(
            "{} {} ({} headings)",
            "Saved to".green(),
            path.display(),
            result.outline.len()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    schema: Option<&Path>,
    compact: bool,
    sequential: bool,
    config: Option<&Path>,
    verbose: bool,
) -> CliResult {
    let files = BatchProcessor::discover(input)?;
    if files.is_empty() {
        println!("{} no PDF files in {}", "Nothing to do:".yellow(), input.display());
        return Ok(());
    }

    let schema = match schema {
        Some(path) => Some(SchemaValidator::from_file(path)?),
        None => SchemaValidator::discover(DEFAULT_SCHEMA_PATHS)?,
    };
    if schema.is_none() {
        log::info!("no schema found; validation skipped");
    }

    let mut options = BatchOptions::new(output)
        .with_json_format(json_format(compact))
        .with_parallel(!sequential)
        .with_config(load_config(config)?);
    if let Some(schema) = schema {
        options = options.with_schema(schema);
    }
    let processor = BatchProcessor::new(options);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let (processor, files_ref) = (&processor, &files);
    let summary = std::thread::scope(|scope| {
        let worker = scope.spawn(move || processor.run(files_ref, Some(tx)));

        for event in rx.iter() {
            match event {
                BatchEvent::Started { input } => pb.set_message(file_name(&input)),
                BatchEvent::Finished {
                    input,
                    output,
                    headings,
                    valid,
                } => {
                    pb.inc(1);
                    if verbose || !valid {
                        let mark = if valid { "✓".green().bold() } else { "!".yellow().bold() };
                        pb.println(format!(
                            "{} {} -> {} ({} headings)",
                            mark,
                            file_name(&input).bright_white(),
                            file_name(&output).bright_black(),
                            headings
                        ));
                    }
                }
                BatchEvent::Failed { input, error } => {
                    pb.inc(1);
                    pb.println(format!(
                        "{} {} - {}",
                        "✗".red().bold(),
                        file_name(&input).bright_white(),
                        error.red()
                    ));
                }
            }
        }

        worker.join()
    })
    .map_err(|_| "batch worker panicked")??;

    pb.finish_and_clear();
    print_summary(&summary, output);

    Ok(())
}

fn print_summary(summary: &BatchSummary, output: &Path) {
    eprintln!("\n{}", "=== Batch Summary ===".bold());
    eprintln!(
        "{:<16} {}",
        "Processed:",
        summary.processed.to_string().cyan()
    );
    eprintln!(
        "{:<16} {}",
        "Succeeded:",
        summary.succeeded.to_string().green()
    );
    eprintln!(
        "{:<16} {}",
        "Failed:",
        if summary.failed > 0 {
            summary.failed.to_string().red()
        } else {
            summary.failed.to_string().normal()
        }
    );
    eprintln!(
        "{:<16} {}",
        "Schema invalid:",
        if summary.invalid > 0 {
            summary.invalid.to_string().yellow()
        } else {
            summary.invalid.to_string().normal()
        }
    );
    eprintln!("{:<16} {}", "Pages:", summary.total_pages);
    eprintln!(
        "{:<16} {:.2}s",
        "Total time:",
        summary.elapsed.as_secs_f64()
    );
    eprintln!(
        "{:<16} {:.2}s per file",
        "Average time:",
        summary.average_time().as_secs_f64()
    );
    eprintln!("{:<16} {}", "Output:", output.display());
}

fn cmd_spans(input: &Path, page: Option<u32>) -> CliResult {
    let extractor = SpanExtractor::open(input)?;
    let spans = match page {
        Some(page) => extractor.extract_page(page)?,
        None => extractor.extract_document()?.spans,
    };

    println!(
        "{}",
        format!(
            "{:>4} {:>7} {:>7} {:>5} {:<2} {:<24} {}",
            "page", "y", "x", "size", "", "font", "text"
        )
        .cyan()
        .bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    for span in &spans {
        let flags = format!(
            "{}{}",
            if span.bold { "B" } else { "" },
            if span.italic { "I" } else { "" }
        );
        println!(
            "{:>4} {:>7.1} {:>7.1} {:>5.1} {:<2} {:<24} {}",
            span.page,
            span.y,
            span.x,
            span.size,
            flags,
            span.font_name.dimmed(),
            span.text
        );
    }

    println!("\n{} {} spans", "Total:".bold(), spans.len());

    Ok(())
}

fn cmd_validate(input: &Path, schema: &Path) -> CliResult {
    let validator = SchemaValidator::from_file(schema)?;
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(input)?)?;
    let report = validator.validate_value(&value);

    if report.valid {
        println!("{} {}", "Valid:".green().bold(), input.display());
        return Ok(());
    }

    println!("{} {}", "Invalid:".red().bold(), input.display());
    for error in &report.errors {
        println!("  {} {}", "-".dimmed(), error);
    }

    // The outline itself must still parse, otherwise say so explicitly
    if render::from_json(&value.to_string()).is_err() {
        println!("  {} not a title/outline document", "-".dimmed());
    }

    Err(format!("{} schema violation(s)", report.errors.len()).into())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdf-outline".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}
