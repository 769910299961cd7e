//! # CLI Module
//!
//! Command-line interface for the duplicate image mover.
//!
//! ## Usage
//! ```bash
//! # Move byte-identical copies out of ~/Pictures
//! image-dedup scan ~/Pictures ~/Pictures-duplicates
//!
//! # Perceptual matching, keep the first copy of every group in place
//! image-dedup scan ~/Pictures ~/dupes --strategy perceptual --policy keep-first
//!
//! # JSON output
//! image-dedup scan ~/Pictures ~/dupes --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use duplicate_image_mover::core::hasher::StrategyKind;
use duplicate_image_mover::core::pipeline::{
    ScanEngine, ScanOutcome, ScanRequest, ScanResult, ScanService,
};
use duplicate_image_mover::core::relocate::RelocationPolicy;
use duplicate_image_mover::error::Result;
use duplicate_image_mover::events::{
    ErrorEvent, Event, EventChannel, FingerprintEvent, PipelineEvent, RelocateEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

/// Duplicate Image Mover - move duplicates into a review folder
#[derive(Parser, Debug)]
#[command(name = "image-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a folder and move duplicates into another folder
    Scan {
        /// Folder to scan (subfolders are not entered)
        source: PathBuf,

        /// Folder that receives the duplicates
        destination: PathBuf,

        /// How files are fingerprinted
        #[arg(short, long, default_value = "exact")]
        strategy: Strategy,

        /// Which group members get moved
        #[arg(short, long, default_value = "move-all")]
        policy: Policy,

        /// Number of fingerprinting workers (default: all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// SHA-256 of the file bytes - identical copies only
    Exact,
    /// Average hash - fast, tolerates resizing
    Average,
    /// Mean color - very coarse, many false positives
    MeanColor,
    /// Perceptual hash - most robust, slowest
    Perceptual,
}

impl From<Strategy> for StrategyKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Exact => StrategyKind::Exact,
            Strategy::Average => StrategyKind::AveragePerceptual,
            Strategy::MeanColor => StrategyKind::MeanColor,
            Strategy::Perceptual => StrategyKind::FrequencyPerceptual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Move every member of a duplicate group (default)
    MoveAll,
    /// Leave the first member of each group in the source folder
    KeepFirst,
}

impl From<Policy> for RelocationPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::MoveAll => RelocationPolicy::MoveAll,
            Policy::KeepFirst => RelocationPolicy::KeepFirst,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

struct ScanOptions {
    source: PathBuf,
    destination: PathBuf,
    strategy: StrategyKind,
    policy: RelocationPolicy,
    threads: Option<usize>,
    output: OutputFormat,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            source,
            destination,
            strategy,
            policy,
            threads,
            output,
            verbose,
        } => run_scan(ScanOptions {
            source,
            destination,
            strategy: strategy.into(),
            policy: policy.into(),
            threads,
            output,
            verbose,
        }),
    }
}

fn run_scan(options: ScanOptions) -> Result<ExitCode> {
    duplicate_image_mover::init_tracing(if options.verbose {
        "duplicate_image_mover=debug"
    } else {
        "duplicate_image_mover=warn"
    });

    let term = Term::stderr();
    let pretty = matches!(options.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Duplicate Image Mover").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {} ({})",
            options.strategy,
            style(options.strategy.description()).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let mut builder = ScanEngine::builder().policy(options.policy);
    if let Some(threads) = options.threads {
        builder = builder.worker_threads(threads);
    }
    let service = ScanService::new(builder.build());

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if pretty {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = options.verbose;

    // Handle events in a separate thread; per-file errors are kept for the report
    let event_thread = thread::spawn(move || {
        let mut errors: Vec<ErrorEvent> = Vec::new();
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    if let Some(ref pb) = progress_clone {
                        if phase.is_terminal() {
                            pb.finish_and_clear();
                        } else {
                            pb.set_message(format!("{}", phase));
                        }
                    }
                }
                Event::Fingerprint(FingerprintEvent::Started { total_files, .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_files as u64);
                    }
                }
                Event::Fingerprint(FingerprintEvent::Progress(p)) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(p.completed as u64);
                        if verbose {
                            pb.set_message(
                                p.current_path
                                    .file_name()
                                    .unwrap_or_default()
                                    .to_string_lossy()
                                    .to_string(),
                            );
                        }
                    }
                }
                Event::Relocate(RelocateEvent::FileMoved { from, to }) => {
                    if let (Some(pb), true) = (&progress_clone, verbose) {
                        pb.println(format!("  moved {} -> {}", from.display(), to.display()));
                    }
                }
                Event::Error(error) if error.file_path.is_some() => errors.push(error),
                _ => {}
            }
        }
        errors
    });

    let request = ScanRequest::new(options.source, options.destination, options.strategy);
    let result = service.submit(request, sender).and_then(|handle| handle.join());

    // The sender went down with the scan thread, so the event thread ends
    let errors = event_thread.join().unwrap_or_default();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    // Failed scans are rendered like finished ones, then reported through the exit code
    let code = if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    match (options.output, &result) {
        (OutputFormat::Pretty, Ok(result)) => {
            print_pretty_results(&term, result, &errors, options.verbose)
        }
        (OutputFormat::Pretty, Err(_)) => {
            print_pretty_failure(&term, &ScanOutcome::from_result(&result), &errors)
        }
        (OutputFormat::Json, _) => print_json(&json_report(&result, &errors))?,
    }

    Ok(code)
}

fn print_pretty_results(term: &Term, result: &ScanResult, errors: &[ErrorEvent], verbose: bool) {
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files scanned in {}",
        style(result.total_files_scanned).cyan(),
        result.elapsed_display()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate groups found",
        style(result.duplicate_groups_found).cyan()
    ))
    .ok();
    term.write_line(&format!("  {} files moved", style(result.files_moved).cyan()))
        .ok();

    if result.files_skipped > 0 {
        term.write_line(&format!(
            "  {} files skipped (unreadable)",
            style(result.files_skipped).yellow()
        ))
        .ok();
    }
    if result.relocation_failures > 0 {
        term.write_line(&format!(
            "  {} files could not be moved",
            style(result.relocation_failures).red()
        ))
        .ok();
    }

    print_problems(term, errors);

    if verbose && !result.moved.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Moved:").bold().underlined()))
            .ok();
        for moved in &result.moved {
            term.write_line(&format!(
                "  {} {}",
                style("→").dim(),
                moved.to.display()
            ))
            .ok();
        }
    }

    term.write_line("").ok();
    term.write_line(&format!("{}", style(result.outcome()).bold()))
        .ok();
}

fn print_pretty_failure(term: &Term, outcome: &ScanOutcome, errors: &[ErrorEvent]) {
    term.write_line(&format!("{} {}", style("✗").red().bold(), style(outcome).bold()))
        .ok();
    print_problems(term, errors);
}

fn print_problems(term: &Term, errors: &[ErrorEvent]) {
    if errors.is_empty() {
        return;
    }

    term.write_line("").ok();
    term.write_line(&format!("{}", style("Problems:").bold().underlined()))
        .ok();
    for error in errors {
        term.write_line(&format!(
            "  {} {}",
            style(format!("[{}]", error.kind)).yellow(),
            error.message
        ))
        .ok();
    }
}

/// JSON document for `--output json`, for finished and failed scans alike
fn json_report(result: &Result<ScanResult>, errors: &[ErrorEvent]) -> serde_json::Value {
    let outcome = ScanOutcome::from_result(result).to_string();

    match result {
        Ok(result) => serde_json::json!({
            "outcome": outcome,
            "elapsed": result.elapsed_display(),
            "result": result,
            "errors": errors,
        }),
        Err(e) => serde_json::json!({
            "outcome": outcome,
            "error": {
                "kind": e.kind(),
                "message": e.to_string(),
            },
            "errors": errors,
        }),
    }
}

fn print_json(report: &serde_json::Value) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| {
        duplicate_image_mover::DedupError::Internal(format!("failed to render JSON: {}", e))
    })?;
    println!("{}", json);
    Ok(())
}
