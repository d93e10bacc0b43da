//! Company-Census main entry point
//!
//! This is the command-line interface for the Company-Census crawler.

use anyhow::Context;
use clap::Parser;
use company_census::config::{load_config, Config};
use company_census::crawler::CrawlPipeline;
use company_census::prompt::confirm;
use company_census::snapshot::{load_or_empty, SnapshotStore, XlsxSnapshotStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Company-Census: a resumable job-board company crawler
///
/// Walks the company listing of the job board, counts each company's
/// postings in the target city, and appends newly discovered companies to
/// the workbook as a new sheet.
#[derive(Parser, Debug)]
#[command(name = "company-census")]
#[command(version)]
#[command(about = "A resumable job-board company crawler", long_about = None)]
struct Cli {
    /// Optional TOML file overriding the built-in configuration
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    let confirmed = {
        let stdin = std::io::stdin();
        confirm(stdin.lock(), std::io::stdout(), &config.output.workbook_path)?
    };
    if !confirmed {
        tracing::info!("Run declined, nothing changed");
        return Ok(());
    }

    run(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("company_census=info,warn"),
            1 => EnvFilter::new("company_census=debug,info"),
            2 => EnvFilter::new("company_census=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the snapshot, crawls every listing page and saves the new sheet
async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting...");

    let store = XlsxSnapshotStore::from_config(&config.output);
    let registry = load_or_empty(&store);

    let config = Arc::new(config);
    tracing::info!(
        "Crawling {} listing pages, counting jobs in {}",
        config.site.max_page,
        config.crawler.target_city
    );

    let pipeline = CrawlPipeline::new(Arc::clone(&config))?;
    let stats = pipeline.run(&registry).await;
    stats.log_summary();

    match store.save(&registry) {
        Ok(report) => {
            tracing::info!(
                "Wrote {} new companies to sheet '{}'",
                report.rows_written,
                report.sheet_name
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Saving {} failed, crawl results are lost: {}",
                store.path().display(),
                e
            );
            Err(e).context("failed to save snapshot")
        }
    }
}
