use crate::analytics::{top_selling_products, SalesAnalytics};
use crate::enrichment::matched_count;
use crate::error::SalesAnalyticsError;
use crate::models::{EnrichedTransaction, ProductSales, Transaction};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

/// Rows shown in the product and customer rankings
const REPORT_TOP_N: usize = 5;

/// Everything the text report shows, gathered from one run of the pipeline
#[derive(Debug, Clone)]
pub struct SalesReport {
    pub records_processed: usize,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub date_range: Option<(String, String)>,
    pub analytics: SalesAnalytics,
    /// Always the top five, whatever top-N the analytics were computed with
    pub top_products: Vec<ProductSales>,
    pub enriched_count: usize,
    pub enrichment_rate: f64,
    /// Distinct product ids without a catalog match, sorted
    pub unmatched_products: Vec<String>,
}

impl SalesReport {
    pub fn new(transactions: &[Transaction], analytics: SalesAnalytics, enriched: &[EnrichedTransaction]) -> Self {
        let records_processed = transactions.len();
        let total_revenue = analytics.total_revenue;
        let avg_order_value = if records_processed > 0 {
            total_revenue / records_processed as f64
        } else {
            0.0
        };

        let date_range = match (
            transactions.iter().map(|tx| &tx.date).min(),
            transactions.iter().map(|tx| &tx.date).max(),
        ) {
            (Some(first), Some(last)) => Some((first.clone(), last.clone())),
            _ => None,
        };

        let enriched_count = matched_count(enriched);
        let enrichment_rate = if enriched.is_empty() {
            0.0
        } else {
            enriched_count as f64 / enriched.len() as f64 * 100.0
        };
        let unmatched_products: BTreeSet<&str> = enriched
            .iter()
            .filter(|tx| !tx.api_match)
            .map(|tx| tx.transaction.product_id.as_str())
            .collect();

        Self {
            records_processed,
            total_revenue,
            avg_order_value,
            date_range,
            analytics,
            top_products: top_selling_products(transactions, REPORT_TOP_N),
            enriched_count,
            enrichment_rate,
            unmatched_products: unmatched_products.into_iter().map(str::to_string).collect(),
        }
    }

    /// Render the report; `generated_on` is printed verbatim in the header
    pub fn render(&self, generated_on: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_sections(&mut out, generated_on);
        out
    }

    fn write_sections(&self, out: &mut String, generated_on: &str) -> std::fmt::Result {
        writeln!(out, "SALES ANALYTICS REPORT")?;
        writeln!(out, "======================")?;
        writeln!(out, "Generated on: {}", generated_on)?;
        writeln!(out, "Records Processed: {}", self.records_processed)?;
        writeln!(out)?;

        writeln!(out, "OVERALL SUMMARY")?;
        writeln!(out, "----------------")?;
        writeln!(out, "Total Revenue: {}", format_amount(self.total_revenue))?;
        writeln!(out, "Total Transactions: {}", self.records_processed)?;
        writeln!(out, "Average Order Value: {}", format_amount(self.avg_order_value))?;
        match &self.date_range {
            Some((first, last)) => writeln!(out, "Date Range: {} to {}", first, last)?,
            None => writeln!(out, "Date Range: N/A")?,
        }
        writeln!(out)?;

        writeln!(out, "REGION-WISE PERFORMANCE")?;
        writeln!(out, "------------------------")?;
        writeln!(out, "Region | Sales | % of Total | Transactions")?;
        for region in &self.analytics.regions {
            writeln!(
                out,
                "{} | {} | {} | {}",
                region.region,
                format_amount(region.total_sales),
                format_percentage(region.percentage),
                region.transaction_count
            )?;
        }
        writeln!(out)?;

        writeln!(out, "TOP 5 PRODUCTS")?;
        writeln!(out, "----------------")?;
        writeln!(out, "Rank | Product | Quantity | Revenue")?;
        for (rank, product) in self.top_products.iter().enumerate() {
            writeln!(
                out,
                "{} | {} | {} | {}",
                rank + 1,
                product.product_name,
                product.quantity,
                format_amount(product.revenue)
            )?;
        }
        writeln!(out)?;

        writeln!(out, "TOP 5 CUSTOMERS")?;
        writeln!(out, "----------------")?;
        writeln!(out, "Rank | CustomerID | Total Spent")?;
        for (rank, customer) in self.analytics.customers.iter().take(REPORT_TOP_N).enumerate() {
            writeln!(
                out,
                "{} | {} | {}",
                rank + 1,
                customer.customer_id,
                format_amount(customer.total_spent)
            )?;
        }
        writeln!(out)?;

        writeln!(out, "DAILY SALES TREND")?;
        writeln!(out, "------------------")?;
        writeln!(out, "Date | Revenue | Transactions | Unique Customers")?;
        for day in &self.analytics.daily {
            writeln!(
                out,
                "{} | {} | {} | {}",
                day.date,
                format_amount(day.revenue),
                day.transaction_count,
                day.unique_customers
            )?;
        }
        writeln!(out)?;

        writeln!(out, "API ENRICHMENT SUMMARY")?;
        writeln!(out, "----------------------")?;
        writeln!(out, "Total Records Enriched: {}", self.enriched_count)?;
        writeln!(out, "Success Rate: {}", format_percentage(self.enrichment_rate))?;
        if !self.unmatched_products.is_empty() {
            writeln!(out, "Products not enriched:")?;
            for product_id in &self.unmatched_products {
                writeln!(out, "- {}", product_id)?;
            }
        }

        Ok(())
    }
}

/// Write the rendered report, creating the parent directory if needed
pub fn write_report(report: &SalesReport, generated_on: &str, file_path: &Path) -> Result<(), SalesAnalyticsError> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, report.render(generated_on))?;

    info!("Report written to {:?}", file_path);
    Ok(())
}

/// Two decimals with thousands separators (`1234567.891` -> `1,234,567.89`)
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // Beyond the Decimal range the f64 is already a whole number
    let plain = match Decimal::from_f64_retain(value) {
        Some(d) => format!("{:.2}", d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)),
        None => format!("{:.2}", value),
    };

    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Rounding can leave "-0.00"
    let sign = if grouped.chars().all(|c| c == '0' || c == ',') && fraction == "00" {
        ""
    } else {
        sign
    };
    format!("{}{}.{}", sign, grouped, fraction)
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}
