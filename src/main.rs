// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use bookmark_classifier::utils::logging::{format_error, format_info};
use bookmark_classifier::{
    BatchDriver, Classifier, Config, JsonExporter, OpenAiClassifier, RunOutcome, RunSummary,
    Validator,
};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "bookmark_classifier")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Resumable LLM categorization of bookmark exports", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every bookmark not yet present in the output file
    Run {
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(long, value_name = "MS")]
        throttle_ms: Option<u64>,

        #[arg(long)]
        no_progress: bool,
    },

    /// Print the category distribution of an output file
    Stats {
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also write the summary as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the category tree sent to the model
    Taxonomy,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    bookmark_classifier::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Bookmark Classifier");

    let config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        info!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    let command = cli.command.unwrap_or(Commands::Run {
        input: None,
        output: None,
        throttle_ms: None,
        no_progress: false,
    });

    match command {
        Commands::Run {
            input,
            output,
            throttle_ms,
            no_progress,
        } => {
            let mut config = config;
            if let Some(input) = input {
                config.pipeline.input_file = input;
            }
            if let Some(output) = output {
                config.pipeline.output_file = output;
            }
            if let Some(throttle_ms) = throttle_ms {
                config.pipeline.throttle_ms = throttle_ms;
            }
            if no_progress {
                config.pipeline.show_progress = false;
            }
            config.validate().context("Invalid configuration")?;

            if let Err(e) = cmd_run(&config, cli.color).await {
                error!("{}", format_error(&format!("Error processing bookmarks: {:#}", e)));
                std::process::exit(1);
            }
        }
        Commands::Stats {
            output,
            json,
            pretty,
        } => {
            let path = output.unwrap_or_else(|| config.pipeline.output_file.clone());
            cmd_stats(path, json, pretty)?;
        }
        Commands::Taxonomy => {
            println!("{}", config.taxonomy.render());
        }
    }

    Ok(())
}

async fn cmd_run(config: &Config, color: bool) -> Result<()> {
    let start_time = Instant::now();

    let classifier: Arc<dyn Classifier> = Arc::new(
        OpenAiClassifier::from_config(&config.classifier)
            .context("Failed to create classifier client")?,
    );
    info!(
        "Using model {} at {}",
        config.classifier.model, config.classifier.base_url
    );

    let driver = BatchDriver::new(classifier, config).with_color(color);

    match driver.run().await? {
        RunOutcome::NothingToDo { already_processed } => {
            info!(
                "{}",
                format_info(&format!(
                    "{} bookmarks already categorized in {}",
                    already_processed,
                    config.pipeline.output_file.display()
                ))
            );
        }
        RunOutcome::Completed(report) => {
            let stats = &report.stats;
            info!("Results saved to {}", config.pipeline.output_file.display());
            info!(
                "Processed {} bookmarks in {:.2}s ({} uncategorized by failure, {:.1}% labeled)",
                stats.records_processed,
                start_time.elapsed().as_secs_f64(),
                stats.classification_failures,
                stats.success_rate()
            );
            info!("Throughput: {:.1} bookmarks/min", stats.records_per_minute());
            if stats.duplicates_skipped > 0 {
                warn!("Skipped {} duplicate urls", stats.duplicates_skipped);
            }
            report.summary.log();
        }
    }

    Ok(())
}

fn cmd_stats(path: PathBuf, json: Option<PathBuf>, pretty: bool) -> Result<()> {
    Validator::validate_file_path(&path)
        .with_context(|| format!("Output file {} not found", path.display()))?;

    let summary = RunSummary::from_output(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    summary.log();

    if let Some(json_path) = json {
        let exporter = JsonExporter::new(json_path)?;
        exporter.export_summary(&summary, &path, pretty)?;
    }

    Ok(())
}
