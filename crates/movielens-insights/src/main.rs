//! CLI entry point for the MovieLens analysis.

use anyhow::{Result, anyhow};
use clap::Parser;
use movielens_insights::{AnalysisConfig, AnalysisError, AnalysisReport, Pipeline};
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Null audit and most-common tag/genre rankings for MovieLens data",
    long_about = "Loads ratings.csv, tags.csv and movies.csv from a MovieLens directory, \
                  prints a null audit and a preview of each table, then ranks the most \
                  common tag per movie title and the most common genre per user.\n\n\
                  EXAMPLES:\n  \
                  # Audit the current directory\n  \
                  movielens-insights\n\n  \
                  # Show the rankings too\n  \
                  movielens-insights -d data/ml-latest-small --show-results\n\n  \
                  # Machine-readable report\n  \
                  movielens-insights -d data/ml-latest-small --json | jq .most_common_tags"
)]
struct Args {
    /// Directory holding the MovieLens CSV files
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Ratings file name inside the data directory
    #[arg(long, default_value = "ratings.csv")]
    ratings_file: String,

    /// Tags file name inside the data directory
    #[arg(long, default_value = "tags.csv")]
    tags_file: String,

    /// Movies file name inside the data directory
    #[arg(long, default_value = "movies.csv")]
    movies_file: String,

    /// Upper bound on hash partitions used when grouping
    #[arg(long, default_value = "8")]
    partitions: usize,

    /// Always use the full partition count instead of sizing it to the data
    #[arg(long)]
    no_adaptive: bool,

    /// Rows shown in each table preview
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Extra cell text to read as null (repeatable)
    #[arg(long = "null-marker", value_name = "TEXT")]
    null_markers: Vec<String>,

    /// Print the most-common tag and genre tables
    #[arg(long)]
    show_results: bool,

    /// Maximum rows printed per result table
    #[arg(long, default_value = "20")]
    limit: usize,

    /// Output JSON to stdout instead of human-readable tables
    ///
    /// Disables all logs; only the final JSON report is written.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let builder = AnalysisConfig::builder()
        .data_dir(&args.data_dir)
        .ratings_file(&args.ratings_file)
        .tags_file(&args.tags_file)
        .movies_file(&args.movies_file)
        .partition_count(args.partitions)
        .adaptive_execution(!args.no_adaptive)
        .preview_rows(args.preview_rows);

    let config = args
        .null_markers
        .iter()
        .fold(builder, |builder, marker| builder.null_marker(marker))
        .build()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    debug!("Configuration: {:?}", config);

    if !config.data_dir.is_dir() {
        let err = AnalysisError::load(&config.data_dir, "data directory not found");
        return fail(err, args.json);
    }

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            debug!("[{:.0}%] {}", update.progress * 100.0, update.message);
        })
        .build()?;

    let report = match pipeline.run_directory() {
        Ok(report) => report,
        Err(e) => return fail(e, args.json),
    };

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    print_report(&report, &args);
    Ok(())
}

/// Report a failed run. With `--json` the error goes to stdout as a
/// `{code, message}` object, since logging is off in that mode.
fn fail(e: AnalysisError, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&e)?);
    } else {
        error!("Analysis failed [{}]: {}", e.error_code(), e);
    }
    Err(anyhow!("Analysis failed: {}", e))
}

/// Print audits, previews and (optionally) rankings.
///
/// This uses `println!` intentionally: it is the program's output, not
/// logging, and must show regardless of log level.
fn print_report(report: &AnalysisReport, args: &Args) {
    for audit in &report.null_audits {
        println!("{}", audit);
    }

    for preview in &report.previews {
        println!("{}", preview);
    }

    if args.show_results {
        println!(
            "Most common tag per title ({} of {} titles):",
            report.most_common_tags.len().min(args.limit),
            report.most_common_tags.len()
        );
        println!("{}", report.tags_table(Some(args.limit)));

        println!(
            "Most common genre per user ({} of {} users):",
            report.most_common_genres.len().min(args.limit),
            report.most_common_genres.len()
        );
        println!("{}", report.genres_table(Some(args.limit)));
    }

    info!(
        "Done in {} ms: {} titles ranked by tag, {} users ranked by genre",
        report.duration_ms,
        report.most_common_tags.len(),
        report.most_common_genres.len()
    );
}
