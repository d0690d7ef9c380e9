use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

/// Sales transaction parsed from one line of the input file
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub customer_id: String,
    pub region: String,
}

impl Transaction {
    /// Amount of the sale, always recomputed from quantity and unit price
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    /// Check the structural business rules every record must satisfy
    pub fn is_structurally_valid(&self) -> bool {
        self.transaction_id.starts_with('T')
            && self.product_id.starts_with('P')
            && self.customer_id.starts_with('C')
            && self.quantity > 0
            && self.unit_price > 0.0
            && !self.region.is_empty()
    }
}

/// Optional narrowing applied to structurally valid records.
///
/// `None` means "no constraint". A bound of `Some(0.0)` is a real bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl FilterOptions {
    /// Check a structurally valid transaction against the supplied filters
    pub fn accepts(&self, tx: &Transaction) -> bool {
        let amount = tx.amount();

        if let Some(region) = &self.region {
            if &tx.region != region {
                return false;
            }
        }
        if let Some(min) = self.min_amount {
            if amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if amount > max {
                return false;
            }
        }
        true
    }
}

/// Counts produced by a validation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub final_count: usize,
}

impl ValidationSummary {
    /// Records that were structurally valid but rejected by a filter
    pub fn filtered_out(&self) -> usize {
        self.total_input - self.invalid - self.final_count
    }
}

/// What the input looks like before any filter is applied: the distinct
/// regions and the range of amounts, valid or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterObservation {
    regions: BTreeSet<String>,
    amount_range: Option<(f64, f64)>,
}

impl FilterObservation {
    pub fn observe(&mut self, tx: &Transaction) {
        let amount = tx.amount();
        self.regions.insert(tx.region.clone());
        self.amount_range = match self.amount_range {
            Some((min, max)) => Some((min.min(amount), max.max(amount))),
            None => Some((amount, amount)),
        };
    }

    /// Distinct regions in lexical order
    pub fn regions(&self) -> Vec<String> {
        self.regions.iter().cloned().collect()
    }

    /// Smallest and largest amount seen, if any record was observed
    pub fn amount_range(&self) -> Option<(f64, f64)> {
        self.amount_range
    }
}

/// Result of validating and filtering a set of transactions
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<Transaction>,
    pub invalid_count: usize,
    pub summary: ValidationSummary,
    pub observation: FilterObservation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: f64,
    pub transaction_count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub product_name: String,
    pub quantity: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    pub avg_order_value: f64,
    /// Distinct product names, in lexical order
    pub products_bought: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

/// Best-selling day; `date` is `None` when there were no sales
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakDay {
    pub date: Option<String>,
    pub revenue: f64,
    pub transaction_count: usize,
}

/// Product as returned by the remote catalog
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogProduct {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Catalog attributes attached to matching transactions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInfo {
    pub title: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
}

/// Catalog attributes keyed by numeric product id
pub type ProductMapping = HashMap<i64, ProductInfo>;

/// Valid transaction joined with catalog attributes
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_rating: Option<f64>,
    pub api_match: bool,
}

#[cfg(test)]
pub(crate) fn sample_transaction(
    transaction_id: &str,
    date: &str,
    product: (&str, &str),
    quantity: i64,
    unit_price: f64,
    customer_id: &str,
    region: &str,
) -> Transaction {
    Transaction {
        transaction_id: transaction_id.to_string(),
        date: date.to_string(),
        product_id: product.0.to_string(),
        product_name: product.1.to_string(),
        quantity,
        unit_price,
        customer_id: customer_id.to_string(),
        region: region.to_string(),
    }
}
