//! pagemerge CLI - native/OCR text reconciliation tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagemerge::source::{discover_documents, FormFeedSource};
use pagemerge::{
    AssemblyMode, BatchReport, DirectoryWriter, DocumentStatus, JsonFormat, Normalizer,
    OutputFormat, Pipeline, PipelineOptions, Reconciler, SourceKind,
};

/// Default output directory name inside the input directory.
const DEFAULT_OUTPUT_DIR: &str = "output_txt";

#[derive(Parser)]
#[command(name = "pagemerge")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reconcile native PDF text and OCR text into clean, sentence-aligned output", long_about = None)]
struct Cli {
    /// Input directory
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every document found in a directory
    Run {
        /// Directory holding `<doc>.<suffix>.txt` files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output directory (default: INPUT_DIR/output_txt)
        #[arg(value_name = "OUTPUT_DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Reconcile two single-page text files and show the decision
    Compare {
        /// Native text file
        #[arg(value_name = "NATIVE_FILE")]
        native: PathBuf,

        /// OCR text file
        #[arg(value_name = "OCR_FILE")]
        ocr: PathBuf,

        /// Agreement threshold in (0, 1)
        #[arg(short, long, default_value = "0.8")]
        threshold: f64,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Output layout
    #[arg(short, long, value_enum, default_value = "chunked")]
    mode: Mode,

    /// Target words per chunk (chunked mode)
    #[arg(short, long, default_value = "100")]
    words: usize,

    /// Agreement threshold in (0, 1); lower trusts OCR more
    #[arg(short, long, default_value = "0.8")]
    threshold: f64,

    /// Output file format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// File suffix of native text files
    #[arg(long, default_value = "native")]
    native_suffix: String,

    /// File suffix of OCR text files
    #[arg(long, default_value = "ocr")]
    ocr_suffix: String,

    /// Keep running headers and footers
    #[arg(long)]
    keep_boilerplate: bool,

    /// Process pages and documents on one thread
    #[arg(long)]
    sequential: bool,

    /// Write the batch report as JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            mode: Mode::Chunked,
            words: 100,
            threshold: 0.8,
            format: Format::Text,
            native_suffix: "native".into(),
            ocr_suffix: "ocr".into(),
            keep_boilerplate: false,
            sequential: false,
            report: None,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One section per page with a page header
    Paged,
    /// Sentence-preserving chunks of about --words words
    Chunked,
}

impl From<Mode> for AssemblyMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Paged => AssemblyMode::Paged,
            Mode::Chunked => AssemblyMode::Chunked,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Rendered plain text
    Text,
    /// JSON pages or chunks
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run { input, output, run }) => cmd_run(&input, output.as_deref(), &run),
        Some(Commands::Compare {
            native,
            ocr,
            threshold,
        }) => cmd_compare(&native, &ocr, threshold),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: run with default options if input is provided
            if let Some(input) = cli.input {
                cmd_run(&input, cli.output.as_deref(), &RunArgs::default())
            } else {
                println!("{}", "Usage: pagemerge <INPUT_DIR> [OUTPUT_DIR]".yellow());
                println!("       pagemerge --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_run(
    input: &Path,
    output: Option<&Path>,
    args: &RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = PipelineOptions::new()
        .with_mode(args.mode.into())
        .with_chunk_target_words(args.words)
        .with_similarity_threshold(args.threshold)
        .with_boilerplate_removal(!args.keep_boilerplate)
        .with_parallel(!args.sequential);

    let native = Arc::new(FormFeedSource::new(
        input,
        args.native_suffix.as_str(),
        SourceKind::Native,
    ));
    let ocr = Arc::new(FormFeedSource::new(
        input,
        args.ocr_suffix.as_str(),
        SourceKind::Ocr,
    ));
    // Validates options before anything is read
    let pipeline = Pipeline::new(options, native, ocr)?;

    let docs = discover_documents(
        input,
        &[args.native_suffix.as_str(), args.ocr_suffix.as_str()],
    )?;
    log::debug!("Discovered {} documents in {}", docs.len(), input.display());
    if docs.is_empty() {
        println!(
            "{} no *.{}.txt or *.{}.txt files in {}",
            "Nothing to do:".yellow(),
            args.native_suffix,
            args.ocr_suffix,
            input.display()
        );
        return Ok(());
    }

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join(DEFAULT_OUTPUT_DIR));
    let writer = DirectoryWriter::new(&output_dir).with_format(args.format.into());

    let mode = match args.mode {
        Mode::Paged => "paged".to_string(),
        Mode::Chunked => format!("chunks of ~{} words", args.words),
    };
    println!(
        "{} {} documents ({}, threshold {})",
        "Processing".cyan().bold(),
        docs.len(),
        mode,
        args.threshold
    );

    let pb = ProgressBar::new(docs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let batch = pipeline.process_batch_with(&docs, &writer, |report| {
        pb.set_message(report.id.clone());
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    print_summary(&batch, &output_dir);

    if let Some(path) = &args.report {
        fs::write(path, batch.to_json(JsonFormat::Pretty)?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(())
}

fn print_summary(batch: &BatchReport, output_dir: &Path) {
    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(72).dimmed());

    for doc in &batch.documents {
        let status = match doc.status {
            DocumentStatus::Succeeded => "ok".green(),
            DocumentStatus::Degraded => "degraded".yellow(),
            DocumentStatus::Failed => "failed".red(),
        };
        match &doc.error {
            Some(error) => println!("  {:<40} {:>8}  {}", doc.id, status, error.dimmed()),
            None => println!(
                "  {:<40} {:>8}  {:>8} words, {:>4} chunks, {:>3} pages",
                doc.id,
                status,
                doc.stats.word_count,
                doc.stats.chunk_count,
                doc.stats.page_count
            ),
        }
    }

    let totals = &batch.totals;
    println!("{}", "─".repeat(72).dimmed());
    println!(
        "  {:<40} {:>8}  {:>8} words, {:>4} chunks, {:>3} pages",
        "TOTAL:".bold(),
        "",
        totals.word_count,
        totals.chunk_count,
        totals.page_count
    );
    println!(
        "  {} succeeded, {} degraded, {} failed in {:.1}s",
        batch.succeeded.to_string().green(),
        batch.degraded.to_string().yellow(),
        batch.failed.to_string().red(),
        batch.duration().num_milliseconds() as f64 / 1000.0
    );
    println!("  {} {}", "Output:".bold(), output_dir.display());
}

fn cmd_compare(
    native: &Path,
    ocr: &Path,
    threshold: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    PipelineOptions::new()
        .with_similarity_threshold(threshold)
        .validate()?;

    let normalizer = Normalizer::shared();
    let native_text = normalizer.normalize_bytes(&fs::read(native)?);
    let ocr_text = normalizer.normalize_bytes(&fs::read(ocr)?);

    let result = Reconciler::new(threshold).reconcile(&native_text, &ocr_text);

    println!("{}", "Comparison".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {:.3}",
        "Similarity".bold(),
        pagemerge::similarity(&native_text, &ocr_text)
    );
    println!("{}: {}", "Threshold".bold(), threshold);
    println!("{}: {}", "Decision".bold(), serde_json::to_string(&result.decision)?);
    println!();
    println!("{}", result.text);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagemerge".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Native/OCR text reconciliation tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_lesson(dir: &Path) {
        fs::write(
            dir.join("lesson1.native.txt"),
            "Il teorema vale.\n1\x0cLa dimostrazione segue.\n2\x0c",
        )
        .unwrap();
        fs::write(
            dir.join("lesson1.ocr.txt"),
            "Il teorema vaIe.\n1\x0cLa dimostrazione segue.\n2\x0c",
        )
        .unwrap();
    }

    #[test]
    fn test_run_writes_default_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_lesson(dir.path());

        cmd_run(dir.path(), None, &RunArgs::default()).unwrap();

        let written = fs::read_to_string(dir.path().join(DEFAULT_OUTPUT_DIR).join("lesson1.txt"))
            .unwrap();
        assert_eq!(written, "Il teorema vale. La dimostrazione segue.");
    }

    #[test]
    fn test_run_paged_json_with_report() {
        let dir = tempfile::tempdir().unwrap();
        write_lesson(dir.path());
        let out = dir.path().join("out");
        let report = dir.path().join("report.json");
        let args = RunArgs {
            mode: Mode::Paged,
            format: Format::Json,
            sequential: true,
            report: Some(report.clone()),
            ..RunArgs::default()
        };

        cmd_run(dir.path(), Some(&out), &args).unwrap();

        let output: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("lesson1.json")).unwrap()).unwrap();
        assert_eq!(output["mode"], "paged");
        assert_eq!(output["items"].as_array().unwrap().len(), 2);

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(report["succeeded"], 1);
        assert_eq!(report["failed"], 0);
    }

    #[test]
    fn test_run_rejects_invalid_threshold() {
        let dir = tempfile::tempdir().unwrap();
        write_lesson(dir.path());
        let args = RunArgs {
            threshold: 1.5,
            ..RunArgs::default()
        };

        assert!(cmd_run(dir.path(), None, &args).is_err());
        assert!(!dir.path().join(DEFAULT_OUTPUT_DIR).exists());
    }

    #[test]
    fn test_compare_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let native = dir.path().join("page.native.txt");
        let ocr = dir.path().join("page.ocr.txt");
        fs::write(&native, "Theorem 1 holds.").unwrap();
        fs::write(&ocr, "Theorem 1 holds. See Figure 3 for details.").unwrap();

        cmd_compare(&native, &ocr, 0.8).unwrap();
        assert!(cmd_compare(&native, &dir.path().join("missing.txt"), 0.8).is_err());
        assert!(cmd_compare(&native, &ocr, 0.0).is_err());
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "pagemerge",
            "run",
            "input",
            "--mode",
            "paged",
            "--words",
            "50",
            "--keep-boilerplate",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run { input, output, run }) => {
                assert_eq!(input, PathBuf::from("input"));
                assert!(output.is_none());
                assert!(run.mode == Mode::Paged);
                assert_eq!(run.words, 50);
                assert!(run.keep_boilerplate);
                assert!(!run.sequential);
            }
            _ => panic!("expected run command"),
        }
    }
}
