use anyhow::Result;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use chrono::Local;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use sales_analytics::models::FilterOptions;
use sales_analytics::{run_pipeline_with_options, PipelineOptions};

#[derive(Parser, Debug)]
#[command(about = "Sales transaction analytics and enrichment")]
struct Args {
    /// Pipe-delimited sales data file
    #[arg(long, default_value = "data/sales_data.txt")]
    data_file: PathBuf,

    /// Where to write the enriched transactions
    #[arg(long, default_value = "data/enriched_sales_data.txt")]
    enriched_file: PathBuf,

    /// Where to write the text report
    #[arg(long, default_value = "output/sales_report.txt")]
    report_file: PathBuf,

    /// Product catalog endpoint
    #[arg(long, default_value = sales_analytics::catalog::DEFAULT_CATALOG_URL)]
    catalog_url: String,

    /// Maximum number of catalog products to fetch
    #[arg(long, default_value_t = sales_analytics::catalog::DEFAULT_CATALOG_LIMIT)]
    catalog_limit: usize,

    /// Catalog request timeout in seconds
    #[arg(long, default_value_t = 10)]
    catalog_timeout_secs: u64,

    /// Only keep transactions from this region
    #[arg(long)]
    region: Option<String>,

    /// Only keep transactions with at least this amount
    #[arg(long)]
    min_amount: Option<f64>,

    /// Only keep transactions with at most this amount
    #[arg(long)]
    max_amount: Option<f64>,

    /// Number of products in the top-selling list
    #[arg(long, default_value_t = sales_analytics::analytics::DEFAULT_TOP_PRODUCTS)]
    top_n: usize,

    /// Products selling fewer units than this are low performers
    #[arg(long, default_value_t = sales_analytics::analytics::DEFAULT_LOW_THRESHOLD)]
    low_threshold: i64,

    /// Log directory (defaults to logs/)
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

impl Args {
    fn pipeline_options(self) -> PipelineOptions {
        PipelineOptions {
            data_file: self.data_file,
            enriched_file: self.enriched_file,
            report_file: self.report_file,
            catalog_url: self.catalog_url,
            catalog_limit: self.catalog_limit,
            catalog_timeout: Duration::from_secs(self.catalog_timeout_secs),
            filters: FilterOptions {
                region: self.region,
                min_amount: self.min_amount,
                max_amount: self.max_amount,
            },
            top_n: self.top_n,
            low_threshold: self.low_threshold,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Create logs directory if it doesn't exist
    if !args.log_dir.exists() {
        fs::create_dir_all(&args.log_dir)?;
    }

    // One log file per run, named after the start time
    let datetime = Local::now().format("%Y%m%d_%H%M%S");
    let log_file = args.log_dir.join(format!("sales_analytics_{}.log", datetime));

    // Initialize logging to a file
    let file_appender = tracing_appender::rolling::never(&args.log_dir, log_file.file_name().unwrap_or_default());
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Run the pipeline; any stage failure ends the process with a non-zero exit
    let options = args.pipeline_options();
    if let Err(e) = run_pipeline_with_options(&options).await {
        tracing::error!("Pipeline failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
