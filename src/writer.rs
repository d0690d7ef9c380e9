use crate::error::SalesAnalyticsError;
use crate::models::EnrichedTransaction;
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const ENRICHED_HEADERS: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

/// Write enriched transactions as a `|`-delimited file with a header line
pub fn save_enriched_data(enriched: &[EnrichedTransaction], file_path: &Path) -> Result<(), SalesAnalyticsError> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = fs::File::create(file_path)?;
    write_enriched_data(enriched, file)?;

    info!("Saved {} enriched transactions to {:?}", enriched.len(), file_path);
    Ok(())
}

/// Serialize enriched transactions to any writer
pub fn write_enriched_data<W: Write>(enriched: &[EnrichedTransaction], out: W) -> Result<(), SalesAnalyticsError> {
    let mut writer: Writer<W> = WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(QuoteStyle::Never)
        .from_writer(out);

    writer.write_record(ENRICHED_HEADERS)?;
    for tx in enriched {
        writer.write_record(enriched_row(tx))?;
    }
    writer.flush()?;

    Ok(())
}

fn enriched_row(enriched: &EnrichedTransaction) -> [String; 12] {
    let tx = &enriched.transaction;
    [
        tx.transaction_id.clone(),
        tx.date.clone(),
        tx.product_id.clone(),
        tx.product_name.clone(),
        tx.quantity.to_string(),
        display_float(tx.unit_price),
        tx.customer_id.clone(),
        tx.region.clone(),
        display_optional(enriched.api_category.as_deref()),
        display_optional(enriched.api_brand.as_deref()),
        enriched.api_rating.map(display_float).unwrap_or_else(|| "None".to_string()),
        display_bool(enriched.api_match),
    ]
}

/// Shortest round-trip form, always with a fractional part (`1200.0`)
fn display_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn display_optional(value: Option<&str>) -> String {
    value.unwrap_or("None").to_string()
}

fn display_bool(value: bool) -> String {
    let token = if value { "True" } else { "False" };
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_transaction;
    use tempfile::tempdir;

    fn enriched() -> Vec<EnrichedTransaction> {
        vec![
            EnrichedTransaction {
                transaction: sample_transaction("T001", "2024-12-01", ("P101", "Laptop"), 2, 45000.0, "C001", "North"),
                api_category: Some("laptops".to_string()),
                api_brand: Some("Apple".to_string()),
                api_rating: Some(4.56),
                api_match: true,
            },
            EnrichedTransaction {
                transaction: sample_transaction("T002", "2024-12-02", ("PX", "Mouse"), 3, 499.5, "C002", "South"),
                api_category: None,
                api_brand: None,
                api_rating: None,
                api_match: false,
            },
        ]
    }

    #[test]
    fn test_write_enriched_data() {
        let mut out = Vec::new();
        write_enriched_data(&enriched(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region|API_Category|API_Brand|API_Rating|API_Match"
        );
        assert_eq!(lines[1], "T001|2024-12-01|P101|Laptop|2|45000.0|C001|North|laptops|Apple|4.56|True");
        assert_eq!(lines[2], "T002|2024-12-02|PX|Mouse|3|499.5|C002|South|None|None|None|False");
        assert!(lines.iter().all(|l| l.split('|').count() == 12));
    }

    #[test]
    fn test_write_enriched_data_header_only() {
        let mut out = Vec::new();
        write_enriched_data(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_save_enriched_data_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("data").join("enriched.txt");

        save_enriched_data(&enriched(), &file_path).unwrap();

        let text = std::fs::read_to_string(&file_path).unwrap();
        assert!(text.starts_with("TransactionID|"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_display_float() {
        assert_eq!(display_float(1200.0), "1200.0");
        assert_eq!(display_float(0.99), "0.99");
        assert_eq!(display_float(4.5), "4.5");
    }
}
