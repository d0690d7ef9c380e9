use crate::models::Transaction;
use tracing::debug;

/// Number of `|`-separated fields in a sales line
const FIELD_COUNT: usize = 8;

/// Parse raw sales lines into transactions, preserving input order.
///
/// Lines with the wrong number of fields or an unparsable quantity or price
/// are dropped without being reported as errors.
pub fn parse_transactions<S: AsRef<str>>(lines: &[S]) -> Vec<Transaction> {
    let transactions: Vec<Transaction> = lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let parsed = parse_transaction(line.as_ref());
            if parsed.is_none() {
                debug!("Dropping malformed line {}: {}", index + 1, line.as_ref());
            }
            parsed
        })
        .collect();

    debug!("Parsed {} of {} lines", transactions.len(), lines.len());
    transactions
}

/// Parse a single `|`-delimited line into a Transaction
pub fn parse_transaction(line: &str) -> Option<Transaction> {
    let parts: Vec<&str> = line.split('|').map(|s| s.trim()).collect();

    if parts.len() != FIELD_COUNT {
        return None;
    }

    let quantity: i64 = parts[4].parse().ok()?;
    let unit_price: f64 = parts[5].replace(',', "").parse().ok()?;

    Some(Transaction {
        transaction_id: parts[0].to_string(),
        date: parts[1].to_string(),
        product_id: parts[2].to_string(),
        product_name: parts[3].replace(',', ""),
        quantity,
        unit_price,
        customer_id: parts[6].to_string(),
        region: parts[7].to_string(),
    })
}
