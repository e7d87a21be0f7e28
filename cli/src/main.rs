//! pdfoutline CLI - PDF title and heading outline inference

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{run_batch, BatchEvent, BatchOptions, FileOutcome};
use pdfoutline::render::{to_json, JsonFormat};
use pdfoutline::{
    FontStatistics, Heuristics, LineSource, LopdfSource, OutlineOptions, PageSelection,
    StructureExtractor,
};

/// Default input directory when no arguments are given
const DEFAULT_INPUT: &str = "input";
/// Default output directory when no arguments are given
const DEFAULT_OUTPUT: &str = "output_jsons";

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer a PDF's title and heading outline as JSON", long_about = None)]
struct Cli {
    /// Input PDF file or directory of PDFs
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output directory (batch) or file (single document)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags shared by every extraction command.
#[derive(Args, Clone)]
struct CommonArgs {
    /// JSON file with heuristic thresholds
    #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Skip unreadable pages instead of failing the document
    #[arg(long, global = true)]
    lenient: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long, global = true)]
    pages: Option<String>,

    /// Output compact JSON
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Extract outlines for every PDF in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Show font statistics and block counts for a PDF
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let common = cli.common;

    let result = match cli.command {
        Some(Commands::Outline { input, output }) => {
            cmd_outline(&input, output.as_deref(), &common)
        }
        Some(Commands::Batch {
            input,
            output,
            sequential,
        }) => cmd_batch(&input, &output, sequential, &common),
        Some(Commands::Inspect { input }) => cmd_inspect(&input, &common),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: directories run as a batch, files as a single outline
            let input = cli.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
            if input.is_dir() {
                let output = cli.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
                cmd_batch(&input, &output, false, &common)
            } else if input.is_file() {
                cmd_outline(&input, cli.output.as_deref(), &common)
            } else {
                println!("{}", "Usage: pdfoutline <INPUT> [OUTPUT]".yellow());
                println!("       pdfoutline --help for more information");
                Err(format!("input not found: {}", input.display()).into())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn outline_options(common: &CommonArgs) -> Result<OutlineOptions, Box<dyn std::error::Error>> {
    let heuristics = match &common.config {
        Some(path) => {
            log::debug!("Loading heuristics from {}", path.display());
            Heuristics::from_file(path)?
        }
        None => Heuristics::default(),
    };
    heuristics.validate()?;

    let pages = match &common.pages {
        Some(p) => PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?,
        None => PageSelection::All,
    };

    let mut options = OutlineOptions::new()
        .with_heuristics(heuristics)
        .with_pages(pages);
    if common.lenient {
        options = options.lenient();
    }
    Ok(options)
}

fn json_format(common: &CommonArgs) -> JsonFormat {
    if common.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_outline(input: &Path, output: Option<&Path>, common: &CommonArgs) -> CliResult {
    let options = outline_options(common)?;

    let result = match pdfoutline::extract_outline_with_options(input, &options)? {
        Some(result) => result,
        None => {
            println!(
                "{} {} has no extractable text",
                "Skipped:".yellow(),
                input.display()
            );
            return Ok(());
        }
    };

    let json = to_json(&result, json_format(common))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(input: &Path, output: &Path, sequential: bool, common: &CommonArgs) -> CliResult {
    let mut options = BatchOptions::new()
        .with_outline_options(outline_options(common)?)
        .with_format(json_format(common));
    if sequential {
        options = options.sequential();
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = run_batch(input, output, &options, |event| match event {
        BatchEvent::Started { total } => {
            log::info!("Processing {} PDF files from {}", total, input.display());
            pb.set_length(*total as u64)
        }
        BatchEvent::Finished { input, outcome } => {
            let name = input.file_name().unwrap_or_default().to_string_lossy();
            match outcome {
                Ok(FileOutcome::Written(path)) => {
                    log::debug!("{} -> {}", input.display(), path.display());
                    pb.set_message(name.into_owned())
                }
                Ok(FileOutcome::Skipped) => {
                    log::debug!("{}: no extractable text", input.display());
                    pb.println(format!("  {} {} (no text)", "skip".yellow(), name))
                }
                Err(e) => {
                    log::warn!("{}: {}", input.display(), e);
                    pb.println(format!("  {} {}: {}", "fail".red(), name, e))
                }
            }
            pb.inc(1);
        }
    })?;

    pb.finish_and_clear();
    log::info!(
        "Batch finished: {} written, {} skipped, {} failed",
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );

    if report.total() == 0 {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    println!("{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Written".bold(), report.written.len().to_string().green());
    println!("{}: {}", "Skipped".bold(), report.skipped.len().to_string().yellow());
    println!("{}: {}", "Failed".bold(), report.failed.len().to_string().red());
    println!("{}: {}", "Output".bold(), output.display());

    if !report.is_success() {
        return Err(format!("{} of {} files failed", report.failed.len(), report.total()).into());
    }
    Ok(())
}

fn cmd_inspect(input: &Path, common: &CommonArgs) -> CliResult {
    let options = outline_options(common)?;
    let source = LopdfSource::load_file(input)?;
    let blocks = StructureExtractor::new(&options).extract(&source)?;
    let stats = FontStatistics::from_blocks(&blocks);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.version());
    println!("{}: {}", "Pages".bold(), source.page_count());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if source.is_encrypted() { "Yes" } else { "No" }
    );

    println!();
    println!("{}", "Typography".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Blocks".bold(), blocks.len());
    println!("{}: {:.2}pt", "Body size".bold(), stats.body_size);

    if stats.heading_sizes.is_empty() {
        println!("{}: {}", "Heading tiers".bold(), "none".dimmed());
    } else {
        println!("{}:", "Heading tiers".bold());
        for &size in &stats.heading_sizes {
            if let Some(level) = stats.tier_level(size) {
                println!("  {} {:.2}pt", format!("{}", level).green(), size);
            }
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline inference");
    println!();
    println!("License: MIT");
}
