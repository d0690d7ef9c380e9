use crate::analytics::{SalesAnalytics, DEFAULT_LOW_THRESHOLD, DEFAULT_TOP_PRODUCTS};
use crate::catalog::{CatalogClient, DEFAULT_CATALOG_LIMIT, DEFAULT_CATALOG_TIMEOUT, DEFAULT_CATALOG_URL};
use crate::enrichment::{create_product_mapping, enrich_sales_data, matched_count};
use crate::models::{FilterOptions, ValidationSummary};
use crate::parser::parse_transactions;
use crate::reader::read_sales_data;
use crate::report::{format_amount, write_report, SalesReport};
use crate::validator::validate_and_filter;
use crate::writer::save_enriched_data;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

const TOTAL_STEPS: usize = 10;
const BANNER_WIDTH: usize = 50;

/// Options for a single pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub data_file: PathBuf,
    pub enriched_file: PathBuf,
    pub report_file: PathBuf,
    pub catalog_url: String,
    pub catalog_limit: usize,
    pub catalog_timeout: Duration,
    pub filters: FilterOptions,
    pub top_n: usize,
    pub low_threshold: i64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/sales_data.txt"),
            enriched_file: PathBuf::from("data/enriched_sales_data.txt"),
            report_file: PathBuf::from("output/sales_report.txt"),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
            filters: FilterOptions::default(),
            top_n: DEFAULT_TOP_PRODUCTS,
            low_threshold: DEFAULT_LOW_THRESHOLD,
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub parsed_count: usize,
    pub validation: ValidationSummary,
    pub enriched_count: usize,
    pub enriched_file: PathBuf,
    pub report_file: PathBuf,
}

fn step(number: usize, message: &str) {
    println!("\n[{}/{}] {}", number, TOTAL_STEPS, message);
    info!("Step {}/{}: {}", number, TOTAL_STEPS, message);
}

fn banner(title: &str) {
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("{}", title);
    println!("{}", "=".repeat(BANNER_WIDTH));
}

/// Run the whole pipeline once with default options
pub async fn run_pipeline() -> Result<PipelineSummary> {
    run_pipeline_with_options(&PipelineOptions::default()).await
}

/// Read, validate, analyse, enrich and report, printing progress to stdout
pub async fn run_pipeline_with_options(options: &PipelineOptions) -> Result<PipelineSummary> {
    info!("Running sales pipeline on {:?}", options.data_file);

    // Track processing time
    let start_time = Instant::now();

    banner("SALES ANALYTICS SYSTEM");

    // Read the raw lines; a missing or unreadable file yields none
    step(1, "Reading sales data...");
    let raw_lines = read_sales_data(&options.data_file).await;
    println!("✓ Read {} data lines from {}", raw_lines.len(), options.data_file.display());

    // Parse, dropping malformed lines
    step(2, "Parsing and cleaning data...");
    let parsed = parse_transactions(&raw_lines);
    let parsed_count = parsed.len();
    println!("✓ Parsed {} records", parsed_count);

    // The validation pass also observes regions and amounts of every record
    step(3, "Filter options available:");
    let outcome = validate_and_filter(parsed, &options.filters);
    println!("Regions: {}", outcome.observation.regions().join(", "));
    match outcome.observation.amount_range() {
        Some((min, max)) => println!("Amount Range: {} - {}", format_amount(min), format_amount(max)),
        None => println!("Amount Range: N/A"),
    }

    step(4, "Validating transactions...");
    println!(
        "✓ Valid: {}, Invalid: {}, Filtered out: {}",
        outcome.summary.final_count,
        outcome.invalid_count,
        outcome.summary.filtered_out()
    );
    let valid = outcome.valid;

    // Every analysis runs over the valid-and-kept records only
    step(5, "Analyzing sales data...");
    let analytics = SalesAnalytics::compute(&valid, options.top_n, options.low_threshold);
    println!("Total revenue: {}", format_amount(analytics.total_revenue));
    if let Some(date) = &analytics.peak_day.date {
        println!(
            "Peak day: {} ({}, {} transactions)",
            date,
            format_amount(analytics.peak_day.revenue),
            analytics.peak_day.transaction_count
        );
    }
    println!("Low-performing products: {}", analytics.low_performers.len());
    println!("✓ Analysis completed");

    // Catalog failures degrade to an empty mapping
    step(6, "Fetching product data from API...");
    let client = CatalogClient::new(&options.catalog_url, options.catalog_timeout)
        .context("Failed to create catalog client")?;
    let products = client.fetch_all_products(options.catalog_limit).await;
    println!("✓ Fetched {} products", products.len());
    let mapping = create_product_mapping(products);

    step(7, "Enriching sales data...");
    let enriched = enrich_sales_data(&valid, &mapping);
    let enriched_count = matched_count(&enriched);
    println!("✓ Enriched {} transactions", enriched_count);

    // Write the enriched records
    step(8, "Saving enriched data...");
    save_enriched_data(&enriched, &options.enriched_file)
        .with_context(|| format!("Failed to save enriched data to {:?}", options.enriched_file))?;
    println!("✓ Saved to {}", options.enriched_file.display());

    // Render and write the report
    step(9, "Generating report...");
    let report = SalesReport::new(&valid, analytics, &enriched);
    let generated_on = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    write_report(&report, &generated_on, &options.report_file)
        .with_context(|| format!("Failed to write report to {:?}", options.report_file))?;
    println!("✓ Report saved to {}", options.report_file.display());

    step(10, "Process Complete");
    banner("✓ All tasks completed successfully");

    // Calculate elapsed time
    info!("Pipeline completed in {:.2?}", start_time.elapsed());

    Ok(PipelineSummary {
        parsed_count,
        validation: outcome.summary,
        enriched_count,
        enriched_file: options.enriched_file.clone(),
        report_file: options.report_file.clone(),
    })
}
