use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use watermarker::{
    Config,
    batch::{BatchProcessor, DedupMode, FailurePolicy, ItemResult},
    selection::Selection,
    startup_checks,
    watermark::{Placement, WatermarkAssets, WatermarkError},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Overrides the log level from the config file
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark a batch of images
    Apply {
        /// Image files (jpg, jpeg, png) or folders containing them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output folder, created if missing
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Placement::Center)]
        placement: Placement,

        /// Folder holding watermark_left.png, watermark_center.png and watermark_right.png
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Appended to each output file name before the extension
        #[arg(long)]
        suffix: Option<String>,

        /// JPEG quality for lossy outputs
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// What to do when an image fails
        #[arg(long, value_enum)]
        on_error: Option<FailurePolicy>,

        #[arg(long, value_enum)]
        dedup: Option<DedupMode>,

        /// Descend into sub-folders of input folders
        #[arg(short, long)]
        recursive: bool,

        /// Open the output folder when done
        #[arg(long)]
        open: bool,
    },

    /// Show how many distinct images a selection contains
    Status {
        inputs: Vec<PathBuf>,

        #[arg(short, long)]
        recursive: bool,
    },

    /// Verify watermark assets and the output folder
    Check {
        #[arg(long)]
        assets: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_exists = cli.config.exists();
    let mut config = if config_exists {
        let config_content = std::fs::read_to_string(&cli.config)?;
        Config::from_toml(&config_content)?
    } else {
        Config::default()
    };

    // Set up logging before doing any work
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.app.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting {}", config.app.name);
    if config_exists {
        info!("Configuration loaded from: {:?}", cli.config);
    } else {
        info!("Config file not found at {:?}, using defaults", cli.config);
    }

    match cli.command {
        Commands::Apply {
            inputs,
            output,
            placement,
            assets,
            suffix,
            quality,
            on_error,
            dedup,
            recursive,
            open,
        } => {
            if let Some(output) = output {
                config.output.directory = output;
            }
            if let Some(assets) = assets {
                config.watermark.asset_directory = Some(assets);
            }
            if let Some(suffix) = suffix {
                config.output.settings.suffix = suffix;
            }
            if let Some(quality) = quality {
                config.output.settings.jpeg_quality = quality;
            }
            if let Some(policy) = on_error {
                config.batch.failure_policy = policy;
            }
            if let Some(dedup) = dedup {
                config.batch.dedup = dedup;
            }
            config.batch.recursive |= recursive;

            run_apply(&config, &inputs, placement, open)
        }
        Commands::Status { inputs, recursive } => {
            let mut selection = Selection::new().recursive(recursive || config.batch.recursive);
            selection.add_paths(&inputs);
            println!("{}", selection.status_line());
            Ok(())
        }
        Commands::Check { assets } => {
            if let Some(assets) = assets {
                config.watermark.asset_directory = Some(assets);
            }
            match startup_checks::perform_startup_checks(&config) {
                Ok(_) => {
                    println!("All startup checks passed");
                    Ok(())
                }
                Err(errors) => {
                    for error in &errors {
                        eprintln!("Startup check failed: {}", error);
                    }
                    std::process::exit(1);
                }
            }
        }
    }
}

fn run_apply(
    config: &Config,
    inputs: &[PathBuf],
    placement: Placement,
    open: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut selection = Selection::new().recursive(config.batch.recursive);
    selection.add_paths(inputs);
    info!("{}", selection.status_line());

    let job = selection.to_job(
        config.output.directory.clone(),
        placement,
        config.batch.dedup,
    );
    if job.is_empty() {
        report_failure(&WatermarkError::NoInput);
    }

    let assets = match WatermarkAssets::load(&config.watermark.resolved_asset_directory()) {
        Ok(assets) => assets,
        Err(e) => report_failure(&e),
    };
    info!("Using watermark assets from {:?}", assets.directory());

    let processor = BatchProcessor::new(&assets)
        .with_layout(config.watermark.layout)
        .with_output(config.output.settings.clone())
        .with_policy(config.batch.failure_policy);

    let mut progress = |current: usize, total: usize, result: &ItemResult| match result {
        ItemResult::Written { output, .. } => info!("[{}/{}] {:?}", current, total, output),
        ItemResult::Failed { input, error } => {
            warn!("[{}/{}] {:?} failed: {}", current, total, input, error)
        }
    };

    let report = match processor.apply_all(&job, &mut progress) {
        Ok(report) => report,
        Err(e) => report_failure(&e),
    };

    println!(
        "Successfully watermarked {} images.\n\nSaved to:\n{}",
        report.processed,
        report.output_dir.display()
    );

    let failures: Vec<&ItemResult> = report.failures().collect();
    if !failures.is_empty() {
        eprintln!("\n{} images failed:", failures.len());
        for failure in &failures {
            if let ItemResult::Failed { input, error } = failure {
                eprintln!("  {}: {}", input.display(), error);
            }
        }
    }

    if open {
        open_folder(&report.output_dir);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn report_failure(e: &WatermarkError) -> ! {
    error!("Watermark failed: {}", e);
    match e {
        WatermarkError::ItemProcess { path, source } => {
            eprintln!("Watermark Error\n{}\n\n{}", path.display(), source)
        }
        other => eprintln!("Error: {}", other),
    }
    std::process::exit(1);
}

/// Best effort; failures are only logged
fn open_folder(path: &Path) {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    match std::process::Command::new(opener).arg(path).spawn() {
        Ok(_) => info!("Opened {:?} with {}", path, opener),
        Err(e) => warn!("Could not open {:?} with {}: {}", path, opener, e),
    }
}
