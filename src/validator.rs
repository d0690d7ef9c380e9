use crate::models::{FilterObservation, FilterOptions, Transaction, ValidationOutcome, ValidationSummary};
use tracing::info;

/// Split transactions into valid-and-kept records and invalid ones.
///
/// Every record is observed for the region/amount side channel. Records that
/// break a structural rule are counted as invalid and skip the filters.
/// Structurally valid records rejected by a filter are counted nowhere, so
/// `total_input - invalid - final_count` is the filtered-out count.
pub fn validate_and_filter(transactions: Vec<Transaction>, filters: &FilterOptions) -> ValidationOutcome {
    let total_input = transactions.len();
    let mut observation = FilterObservation::default();
    let mut valid = Vec::with_capacity(total_input);
    let mut invalid_count = 0;

    for tx in transactions {
        observation.observe(&tx);

        if !tx.is_structurally_valid() {
            invalid_count += 1;
            continue;
        }

        if filters.accepts(&tx) {
            valid.push(tx);
        }
    }

    info!("Available regions: {:?}", observation.regions());
    if let Some((min, max)) = observation.amount_range() {
        info!("Transaction amount range: {:.2} - {:.2}", min, max);
    }

    let summary = ValidationSummary {
        total_input,
        invalid: invalid_count,
        final_count: valid.len(),
    };
    info!(
        "Validation complete: total={}, invalid={}, filtered_out={}, kept={}",
        summary.total_input,
        summary.invalid,
        summary.filtered_out(),
        summary.final_count
    );

    ValidationOutcome {
        valid,
        invalid_count,
        summary,
        observation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_transaction;

    fn mixed_transactions() -> Vec<Transaction> {
        vec![
            // valid, amount 200
            sample_transaction("T001", "2024-12-01", ("P101", "Laptop"), 2, 100.0, "C001", "North"),
            // invalid id
            sample_transaction("X002", "2024-12-01", ("P102", "Mouse"), 1, 50.0, "C002", "South"),
            // valid, amount 1500
            sample_transaction("T003", "2024-12-02", ("P103", "Monitor"), 3, 500.0, "C003", "South"),
            // invalid quantity
            sample_transaction("T004", "2024-12-02", ("P104", "Cable"), 0, 10.0, "C004", "East"),
            // valid, amount 50
            sample_transaction("T005", "2024-12-03", ("P105", "Pen"), 5, 10.0, "C001", "North"),
        ]
    }

    #[test]
    fn test_validate_without_filters() {
        let outcome = validate_and_filter(mixed_transactions(), &FilterOptions::default());

        assert_eq!(outcome.valid.len(), 3);
        assert_eq!(outcome.invalid_count, 2);
        assert_eq!(
            outcome.summary,
            ValidationSummary {
                total_input: 5,
                invalid: 2,
                final_count: 3,
            }
        );
        assert_eq!(outcome.summary.filtered_out(), 0);
    }

    #[test]
    fn test_validate_with_region_filter() {
        let filters = FilterOptions {
            region: Some("North".to_string()),
            ..Default::default()
        };
        let outcome = validate_and_filter(mixed_transactions(), &filters);

        let ids: Vec<&str> = outcome.valid.iter().map(|tx| tx.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["T001", "T005"]);
        // Filtered records are not invalid
        assert_eq!(outcome.invalid_count, 2);
        assert_eq!(outcome.summary.filtered_out(), 1);
    }

    #[test]
    fn test_validate_with_amount_filters() {
        let filters = FilterOptions {
            region: None,
            min_amount: Some(100.0),
            max_amount: Some(1000.0),
        };
        let outcome = validate_and_filter(mixed_transactions(), &filters);

        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.valid[0].transaction_id, "T001");
        assert_eq!(outcome.summary.filtered_out(), 2);
    }

    #[test]
    fn test_invalid_records_skip_filters() {
        // The invalid South record would also fail the region filter, but it
        // must still be counted as invalid rather than filtered
        let filters = FilterOptions {
            region: Some("North".to_string()),
            ..Default::default()
        };
        let outcome = validate_and_filter(mixed_transactions(), &filters);
        assert_eq!(outcome.summary.invalid, 2);
    }

    #[test]
    fn test_counts_always_add_up() {
        let filter_sets = vec![
            FilterOptions::default(),
            FilterOptions {
                region: Some("South".to_string()),
                ..Default::default()
            },
            FilterOptions {
                region: None,
                min_amount: Some(0.0),
                max_amount: Some(0.0),
            },
            FilterOptions {
                region: Some("Nowhere".to_string()),
                min_amount: Some(60.0),
                max_amount: None,
            },
        ];

        for filters in filter_sets {
            let outcome = validate_and_filter(mixed_transactions(), &filters);
            let s = outcome.summary;
            assert_eq!(s.final_count + s.invalid + s.filtered_out(), s.total_input);
            assert_eq!(s.final_count, outcome.valid.len());
        }
    }

    #[test]
    fn test_zero_max_amount_is_applied() {
        let filters = FilterOptions {
            max_amount: Some(0.0),
            ..Default::default()
        };
        let outcome = validate_and_filter(mixed_transactions(), &filters);
        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.summary.filtered_out(), 3);
    }

    #[test]
    fn test_observation_includes_invalid_records() {
        let outcome = validate_and_filter(mixed_transactions(), &FilterOptions::default());

        assert_eq!(
            outcome.observation.regions(),
            vec!["East".to_string(), "North".to_string(), "South".to_string()]
        );
        // Smallest amount comes from the invalid zero-quantity record
        assert_eq!(outcome.observation.amount_range(), Some((0.0, 1500.0)));
    }

    #[test]
    fn test_validate_empty() {
        let outcome = validate_and_filter(Vec::new(), &FilterOptions::default());
        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.summary, ValidationSummary::default());
        assert_eq!(outcome.observation.amount_range(), None);
    }
}
