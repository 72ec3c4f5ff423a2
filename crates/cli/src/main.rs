//! blockscope - Extract visual blocks from rendered HTML pages
//!
//! Renders every HTML file under a folder with headless Chromium, merges the
//! visible elements into numbered blocks, samples a few of them and writes
//! screenshots, crops and JSON reports for downstream robustness tests.

mod chrome;
mod output;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use url::Url;

use blockscope_core::analyze_page;
use blockscope_core::layout::AnalysisParams;

use chrome::{ChromeOptions, ChromePage};

/// Render HTML pages, extract their visual blocks and write annotation fixtures.
#[derive(Parser, Debug)]
#[command(name = "blockscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folder searched recursively for .html/.htm files
    input: PathBuf,

    /// Output folder (default: ./layout_analysis_<timestamp>)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Merge options ===
    /// Max center offset (px) for two elements to count as aligned
    #[arg(long = "align-tolerance", default_value = "8.0")]
    align_tolerance: f64,

    /// Max gap (px) between aligned elements for them to count as touching
    #[arg(long = "adj-tolerance", default_value = "4.0")]
    adj_tolerance: f64,

    /// Drop elements nested inside an earlier collected element before merging
    #[arg(long = "dedupe-nested", action = ArgAction::SetTrue)]
    dedupe_nested: bool,

    // === Sampling options ===
    /// Number of blocks to sample per page
    #[arg(short = 'k', long = "samples", default_value = "4")]
    samples: usize,

    /// Failed draws allowed before the sampler gives up
    #[arg(long = "max-attempts", default_value = "50")]
    max_attempts: usize,

    /// Seed for the sampler (random if not given)
    #[arg(long)]
    seed: Option<u64>,

    // === Report options ===
    /// Minimum width (px) of a listed visual component
    #[arg(long = "min-component-width", default_value = "30.0")]
    min_component_width: f64,

    /// Minimum height (px) of a listed visual component
    #[arg(long = "min-component-height", default_value = "30.0")]
    min_component_height: f64,

    // === Browser options ===
    /// Chrome/Chromium executable
    #[arg(long = "chrome")]
    chrome: Option<PathBuf>,

    /// Navigation and script timeout in seconds
    #[arg(long = "timeout-secs", default_value = "60")]
    timeout_secs: u64,

    /// Browser viewport width
    #[arg(long = "window-width", default_value = "1280")]
    window_width: u32,

    /// Browser viewport height
    #[arg(long = "window-height", default_value = "800")]
    window_height: u32,
}

/// Build AnalysisParams from command line arguments.
fn build_params(args: &Args) -> Result<AnalysisParams> {
    let params = AnalysisParams {
        align_tolerance: args.align_tolerance,
        adj_tolerance: args.adj_tolerance,
        dedupe_nested: args.dedupe_nested,
        sample_count: args.samples,
        max_attempts: args.max_attempts,
        min_component_width: args.min_component_width,
        min_component_height: args.min_component_height,
    };
    params.validate()?;
    Ok(params)
}

fn init_logging(debug: bool, log_file: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    let file = File::create(log_file)
        .with_context(|| format!("failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

fn to_file_url(path: &Path) -> Result<Url> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    Url::from_file_path(&canonical)
        .map_err(|_| anyhow!("invalid file path for URL: {}", canonical.display()))
}

/// Analyze one HTML file and write its artifacts into `page_dir`.
fn process_file(
    html_file: &Path,
    page_dir: &Path,
    params: &AnalysisParams,
    chrome: &ChromeOptions,
    rng: &mut StdRng,
) -> Result<()> {
    let url = to_file_url(html_file)?;
    let analysis = {
        let mut page = ChromePage::open(&url, chrome)?;
        analyze_page(&mut page, params, rng)
            .with_context(|| format!("failed to analyze {}", html_file.display()))?
        // Browser closes here, before any artifact is written.
    };
    output::write_page_artifacts(page_dir, html_file, &analysis)
}

fn run(args: &Args) -> Result<(usize, usize)> {
    let params = build_params(args)?;

    let html_files = output::find_html_files(&args.input)?;
    if html_files.is_empty() {
        return Err(anyhow!(
            "no HTML files found in {}",
            args.input.display()
        ));
    }

    let output_dir = match &args.output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output dir {}", dir.display()))?;
            dir.clone()
        }
        None => output::create_unique_output_dir(Path::new("."), "layout_analysis")?,
    };
    init_logging(args.debug, &output_dir.join("analysis.log"))?;
    tracing::info!(output = %output_dir.display(), files = html_files.len(), "starting analysis");

    let chrome = ChromeOptions {
        executable: args.chrome.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
        window_size: (args.window_width, args.window_height),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let pb = ProgressBar::new(html_files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut success = 0usize;
    for html_file in &html_files {
        let name = html_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name);

        let span = tracing::info_span!("page", file = %html_file.display());
        let _guard = span.enter();

        let page_dir = output::page_output_dir(&output_dir, html_file)?;
        match process_file(html_file, &page_dir, &params, &chrome, &mut rng) {
            Ok(()) => {
                success += 1;
                tracing::info!("analysis completed");
            }
            Err(err) => {
                tracing::error!("analysis failed: {err:#}");
                output::remove_page_dir(&page_dir);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    tracing::info!(
        "successfully analyzed {}/{} files, results in {}",
        success,
        html_files.len(),
        output_dir.display()
    );
    Ok((success, html_files.len()))
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok((success, total)) => {
            println!("Analyzed {success}/{total} files.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
