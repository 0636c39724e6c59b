use clap::{Parser, Subcommand};
use qr_locator::config::parse_zoom_list;
use qr_locator::tools::{describe_outcome, load_page, page_iter, summarize};
use qr_locator::{Locator, PixelBuffer, ScanOptions};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrlocate", version, about = "Locate QR codes on rendered pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct TuningArgs {
    /// Comma separated zoom factors, e.g. "1.5,2"
    #[arg(long)]
    zoom: Option<String>,
    /// Edge density a region must exceed to be decoded
    #[arg(long)]
    edge_threshold: Option<f32>,
    /// Lower bound of the page dark-pixel ratio
    #[arg(long)]
    contrast_min: Option<f32>,
    /// Upper bound of the page dark-pixel ratio
    #[arg(long)]
    contrast_max: Option<f32>,
}

impl TuningArgs {
    fn options(&self) -> Result<ScanOptions, String> {
        let mut options = ScanOptions::from_env();
        if let Some(zoom) = &self.zoom {
            options.zoom_levels =
                parse_zoom_list(zoom).ok_or_else(|| format!("bad zoom list {:?}", zoom))?;
        }
        if let Some(t) = self.edge_threshold {
            options.edge_density_threshold = t;
        }
        if let Some(min) = self.contrast_min {
            options.contrast_bounds.0 = min;
        }
        if let Some(max) = self.contrast_max {
            options.contrast_bounds.1 = max;
        }
        options.validate().map_err(|e| e.to_string())?;
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Scan a single page image
    Scan {
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Print the contrast check and region scores for a page
    Regions {
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Scan every image under a directory in parallel
    Batch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        tuning: TuningArgs,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Scan { image, tuning } => {
            tuning.options().and_then(|options| scan_cmd(&image, options))
        }
        Command::Regions { image, tuning } => {
            tuning.options().and_then(|options| regions_cmd(&image, &options))
        }
        Command::Batch { dir, limit, tuning } => {
            tuning.options().and_then(|options| batch_cmd(&dir, limit, options))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{}", msg);
            ExitCode::FAILURE
        }
    }
}

fn load(image: &Path) -> Result<PixelBuffer, String> {
    load_page(image).map_err(|err| format!("Failed to load image {}: {}", image.display(), err))
}

fn scan_cmd(image: &Path, options: ScanOptions) -> Result<(), String> {
    let page = load(image)?;
    let locator = Locator::new().with_options(options);
    let start = Instant::now();
    let (outcome, report) = locator.scan_with_report(&page);
    let outcome = outcome.map_err(|e| e.to_string())?;

    println!("Image: {} ({}x{})", image.display(), page.width(), page.height());
    println!("Result: {}", describe_outcome(&outcome));
    if let Some(found) = outcome.as_match() {
        println!("Payload:\n{}", found.text);
    }
    println!(
        "decode calls={} errors={} zoom passes={} phases={:?} in {:.1}ms",
        report.decode_calls,
        report.decode_errors,
        report.zoom_levels_tried,
        report.phases,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn regions_cmd(image: &Path, options: &ScanOptions) -> Result<(), String> {
    let page = load(image)?;
    let summary = summarize(&page, options);
    println!("Image: {} ({}x{})", image.display(), summary.width, summary.height);
    println!(
        "Dark ratio: {:.3} (bounds {:?}) -> {}",
        summary.dark_ratio,
        options.contrast_bounds,
        if summary.has_contrast { "scan" } else { "skip" }
    );
    for scored in &summary.regions {
        println!(
            "  {:<40} edge_density={:.4} decode={}",
            scored.region.to_string(),
            scored.edge_density,
            scored.worth_decoding
        );
    }
    Ok(())
}

fn batch_cmd(dir: &Path, limit: Option<usize>, options: ScanOptions) -> Result<(), String> {
    let paths: Vec<PathBuf> = page_iter(dir, limit).collect();
    if paths.is_empty() {
        return Err(format!("No images found under {}", dir.display()));
    }
    let locator = Locator::new().with_options(options);
    let start = Instant::now();

    let lines: Vec<(bool, String)> = paths
        .par_iter()
        .map(|path| match load(path) {
            Ok(page) => match locator.scan(&page) {
                Ok(outcome) => (
                    outcome.is_match(),
                    format!("{}: {}", path.display(), describe_outcome(&outcome)),
                ),
                Err(err) => (false, format!("{}: error: {}", path.display(), err)),
            },
            Err(msg) => (false, msg),
        })
        .collect();

    let found = lines.iter().filter(|(hit, _)| *hit).count();
    for (_, line) in &lines {
        println!("{}", line);
    }
    println!(
        "\nFound codes on {}/{} pages ({:.1}%) in {:.2}s",
        found,
        lines.len(),
        100.0 * found as f64 / lines.len() as f64,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
