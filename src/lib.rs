//! dupesweep - Duplicate File Finder
//!
//! A cross-platform Rust CLI application for finding duplicate files by
//! content hash (BLAKE3) or name heuristics, and deleting them safely via
//! the system trash with a permanent-delete fallback.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use bytesize::ByteSize;

use crate::actions::{DeleteBatchResult, DeleteEventCallback, DeletePipeline, DeleteTask};
use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::ScanConfig;
use crate::duplicates::{detect, DuplicateGroup, Strategy};
use crate::error::ExitCode;
use crate::output::{CsvOutput, HistoryCsvOutput, JsonOutput, ScanSummary};
use crate::progress::{ProgressCallback, Reporter};
use crate::scanner::Walker;
use crate::signal::ShutdownHandler;

/// Run the application with parsed CLI arguments.
///
/// Initializes logging, dispatches to the requested subcommand and maps the
/// result onto an exit code. Fatal errors bubble up as `anyhow::Error` for
/// `main` to report.
///
/// # Errors
///
/// Returns an error for invalid configuration, unwritable output targets
/// and other conditions that prevent the scan from running at all.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scan(args) => run_scan(args, cli.quiet),
    }
}

fn run_scan(args: ScanArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let config = build_config(&args)?;
    config.validate().context("configuration rejected")?;

    let handler = signal::install_handler()?;
    let roots = dedupe_roots(&args.paths);
    let started = Instant::now();

    // Progress bars stay off in quiet mode and for machine-readable output
    let show_progress = !quiet && args.output == OutputFormat::Table;
    let reporter = Arc::new(Reporter::new(!show_progress));

    let walker = Walker::new(config.walker_config())
        .with_categories(config.category_map())
        .with_shutdown_flag(handler.get_flag());
    let scan = walker.walk(&roots, Some(reporter.as_ref()));

    if handler.is_shutdown_requested() {
        log::warn!("scan interrupted");
        return Ok(ExitCode::Interrupted);
    }

    let strategy: Strategy = args.strategy.into();
    let detector_config = config
        .detector_config()
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(reporter.clone());
    let (groups, stats) = detect(&scan.files, strategy, &detector_config);

    if stats.interrupted {
        return Ok(ExitCode::Interrupted);
    }

    let summary = ScanSummary {
        total_files: scan.files.len(),
        total_size: scan.files.iter().map(|f| f.size).sum(),
        duplicate_groups: groups.len(),
        duplicate_files: groups.iter().map(DuplicateGroup::len).sum(),
        reclaimable_space: groups.iter().map(DuplicateGroup::potential_savings).sum(),
        scan_errors: scan.errors.len(),
        scan_duration_ms: started.elapsed().as_millis() as u64,
        strategy: Some(strategy),
        interrupted: false,
    };

    let delete_result = if args.delete && !groups.is_empty() {
        Some(run_delete(
            &args,
            &config,
            &groups,
            strategy,
            &handler,
            reporter.as_ref(),
        )?)
    } else {
        None
    };

    let exit_code = resolve_exit_code(&summary, delete_result.as_ref());

    match args.output {
        OutputFormat::Table => print_table(&groups, &summary, delete_result.as_ref()),
        OutputFormat::Json => {
            let document = JsonOutput::new(&groups, &summary, exit_code);
            println!("{}", document.to_json_pretty()?);
        }
        OutputFormat::Csv => {
            CsvOutput::new(&groups)
                .write_to(std::io::stdout())
                .context("writing CSV to stdout")?;
        }
    }

    Ok(exit_code)
}

/// Layer CLI flags over the config file (or defaults).
fn build_config(args: &ScanArgs) -> anyhow::Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ScanConfig::default(),
    };

    if let Some(min) = args.min_size {
        config.min_file_size = min;
    }
    if let Some(max) = args.max_size {
        config.max_file_size = max;
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if let Some(threads) = args.io_threads {
        config.io_threads = threads;
    }
    if let Some(delay) = args.delay_ms {
        config.delay_between_files_ms = delay;
    }
    for dir in &args.exclude_dirs {
        if !config.excluded_directories.contains(dir) {
            config.excluded_directories.push(dir.clone());
        }
    }
    if !args.categories.is_empty() {
        config.enabled_categories = args.categories.iter().map(|c| (*c).into()).collect();
    }

    Ok(config)
}

/// Drop repeated roots while preserving order, so a directory passed twice
/// is not scanned (and its files reported) twice.
fn dedupe_roots(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .filter(|p| seen.insert((*p).clone()))
        .cloned()
        .collect()
}

/// Forwards deletion events onto the progress reporter.
struct DeleteProgress<'a> {
    reporter: &'a Reporter,
    done: AtomicUsize,
}

impl DeleteEventCallback for DeleteProgress<'_> {
    fn on_file_finished(&self, task: &DeleteTask) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.reporter
            .on_progress(done, &task.path.to_string_lossy());
    }
}

/// Delete every file but the best-ranked one in each group.
fn run_delete(
    args: &ScanArgs,
    config: &ScanConfig,
    groups: &[DuplicateGroup],
    strategy: Strategy,
    handler: &ShutdownHandler,
    reporter: &Reporter,
) -> anyhow::Result<DeleteBatchResult> {
    let victims: Vec<_> = groups
        .iter()
        .flat_map(|g| g.files.iter().skip(1).cloned())
        .collect();

    log::info!(
        "deleting {} duplicate(s) across {} group(s)",
        victims.len(),
        groups.len()
    );

    let options = config
        .delete_options()
        .with_reason(strategy.name())
        .with_shutdown_flag(handler.get_flag());
    let pipeline = DeletePipeline::new(options);

    reporter.on_phase_start("deleting", victims.len());
    let progress = DeleteProgress {
        reporter,
        done: AtomicUsize::new(0),
    };
    let result = pipeline.run(&victims, Some(&progress));
    reporter.on_phase_end("deleting");

    if let Some(history_path) = &args.history {
        let file = std::fs::File::create(history_path)
            .with_context(|| format!("creating history file {}", history_path.display()))?;
        HistoryCsvOutput::new(&result.records)
            .write_to(file)
            .context("writing deletion history")?;
        log::info!("deletion history written to {}", history_path.display());
    }

    Ok(result)
}

fn resolve_exit_code(summary: &ScanSummary, delete_result: Option<&DeleteBatchResult>) -> ExitCode {
    if let Some(result) = delete_result {
        if result.cancelled {
            return ExitCode::Interrupted;
        }
        if result.failure_count() > 0 {
            return ExitCode::PartialSuccess;
        }
    }
    if summary.duplicate_groups == 0 {
        return ExitCode::NoDuplicates;
    }
    if summary.scan_errors > 0 {
        return ExitCode::PartialSuccess;
    }
    ExitCode::Success
}

fn print_table(
    groups: &[DuplicateGroup],
    summary: &ScanSummary,
    delete_result: Option<&DeleteBatchResult>,
) {
    if groups.is_empty() {
        println!(
            "No duplicates found ({} files, {} scanned).",
            summary.total_files,
            ByteSize::b(summary.total_size)
        );
    }

    for group in groups {
        println!(
            "Group {} [{}] {} in {} file(s), reclaimable {}",
            group.id,
            group.strategy,
            ByteSize::b(group.total_size),
            group.len(),
            ByteSize::b(group.potential_savings())
        );
        for (rank, file) in group.files.iter().enumerate() {
            let marker = if rank == 0 { "keep" } else { "dup " };
            println!("  {}  {:>10}  {}", marker, ByteSize::b(file.size).to_string(), file.path.display());
        }
    }

    if !groups.is_empty() {
        println!(
            "\n{} group(s), {} duplicate file(s), {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            ByteSize::b(summary.reclaimable_space)
        );
    }
    if summary.scan_errors > 0 {
        println!("{} path(s) could not be scanned.", summary.scan_errors);
    }
    if let Some(result) = delete_result {
        println!("{}", result.summary());
    }
}
