//! Read-only analyses over the valid-and-kept transactions.
//!
//! Every function recomputes amounts from quantity and unit price and builds
//! a fresh result. Sorting is stable, so ties keep the order in which groups
//! were first seen.

use crate::models::{CustomerProfile, DailySales, PeakDay, ProductSales, RegionSales, Transaction};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Default number of products returned by [`top_selling_products`]
pub const DEFAULT_TOP_PRODUCTS: usize = 5;

/// Default quantity threshold for [`low_performing_products`]
pub const DEFAULT_LOW_THRESHOLD: i64 = 10;

/// Fold transactions into per-key accumulators, keeping keys in first-seen order
fn group_in_order<'a, A, K, F>(transactions: &'a [Transaction], key: K, mut step: F) -> Vec<(&'a str, A)>
where
    A: Default,
    K: Fn(&'a Transaction) -> &'a str,
    F: FnMut(&mut A, &'a Transaction),
{
    let (_, groups) = transactions.iter().fold(
        (HashMap::<&str, usize>::new(), Vec::<(&str, A)>::new()),
        |(mut index, mut groups), tx| {
            let k = key(tx);
            let slot = *index.entry(k).or_insert_with(|| {
                groups.push((k, A::default()));
                groups.len() - 1
            });
            step(&mut groups[slot].1, tx);
            (index, groups)
        },
    );
    groups
}

/// Sum of all transaction amounts
pub fn calculate_total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::amount).sum()
}

/// Revenue per region, highest first, with each region's share of the total
pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionSales> {
    let total_revenue = calculate_total_revenue(transactions);

    let mut regions: Vec<RegionSales> = group_in_order(
        transactions,
        |tx| tx.region.as_str(),
        |acc: &mut (f64, usize), tx| {
            acc.0 += tx.amount();
            acc.1 += 1;
        },
    )
    .into_iter()
    .map(|(region, (total_sales, transaction_count))| RegionSales {
        region: region.to_string(),
        total_sales,
        transaction_count,
        percentage: if total_revenue > 0.0 {
            total_sales / total_revenue * 100.0
        } else {
            0.0
        },
    })
    .collect();

    regions.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    regions
}

/// Quantity and revenue per product name, in first-seen order.
///
/// Quantities saturate at `i64::MAX` instead of overflowing.
fn product_totals(transactions: &[Transaction]) -> Vec<ProductSales> {
    group_in_order(
        transactions,
        |tx| tx.product_name.as_str(),
        |acc: &mut (i64, f64), tx| {
            acc.0 = acc.0.saturating_add(tx.quantity);
            acc.1 += tx.amount();
        },
    )
    .into_iter()
    .map(|(name, (quantity, revenue))| ProductSales {
        product_name: name.to_string(),
        quantity,
        revenue,
    })
    .collect()
}

/// The `n` products with the highest total quantity sold
pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    let mut products = product_totals(transactions);
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    products.truncate(n);
    products
}

/// Spending profile per customer, biggest spender first
pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerProfile> {
    #[derive(Default)]
    struct Spend<'a> {
        total: f64,
        count: usize,
        products: BTreeSet<&'a str>,
    }

    let mut customers: Vec<CustomerProfile> = group_in_order::<Spend, _, _>(
        transactions,
        |tx| tx.customer_id.as_str(),
        |acc, tx| {
            acc.total += tx.amount();
            acc.count += 1;
            acc.products.insert(tx.product_name.as_str());
        },
    )
    .into_iter()
    .map(|(customer, spend)| CustomerProfile {
        customer_id: customer.to_string(),
        total_spent: spend.total,
        purchase_count: spend.count,
        avg_order_value: if spend.count > 0 {
            spend.total / spend.count as f64
        } else {
            0.0
        },
        products_bought: spend.products.into_iter().map(str::to_string).collect(),
    })
    .collect();

    customers.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    customers
}

/// Revenue, transaction count and distinct customers per date, oldest first
pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailySales> {
    let days = transactions.iter().fold(
        BTreeMap::<&str, (f64, usize, HashSet<&str>)>::new(),
        |mut days, tx| {
            let day = days.entry(tx.date.as_str()).or_default();
            day.0 += tx.amount();
            day.1 += 1;
            day.2.insert(tx.customer_id.as_str());
            days
        },
    );

    days.into_iter()
        .map(|(date, (revenue, transaction_count, customers))| DailySales {
            date: date.to_string(),
            revenue,
            transaction_count,
            unique_customers: customers.len(),
        })
        .collect()
}

/// Date with the strictly highest revenue; the earliest date wins a tie
pub fn find_peak_sales_day(transactions: &[Transaction]) -> PeakDay {
    daily_sales_trend(transactions)
        .into_iter()
        .fold(PeakDay::default(), |peak, day| {
            if day.revenue > peak.revenue {
                PeakDay {
                    date: Some(day.date),
                    revenue: day.revenue,
                    transaction_count: day.transaction_count,
                }
            } else {
                peak
            }
        })
}

/// Products whose total quantity is below `threshold`, lowest first
pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductSales> {
    let mut products: Vec<ProductSales> = product_totals(transactions)
        .into_iter()
        .filter(|p| p.quantity < threshold)
        .collect();
    products.sort_by_key(|p| p.quantity);
    products
}

/// Every analysis computed once over the same transactions
#[derive(Debug, Clone, PartialEq)]
pub struct SalesAnalytics {
    pub total_revenue: f64,
    pub regions: Vec<RegionSales>,
    pub top_products: Vec<ProductSales>,
    pub customers: Vec<CustomerProfile>,
    pub daily: Vec<DailySales>,
    pub peak_day: PeakDay,
    pub low_performers: Vec<ProductSales>,
}

impl SalesAnalytics {
    pub fn compute(transactions: &[Transaction], top_n: usize, low_threshold: i64) -> Self {
        Self {
            total_revenue: calculate_total_revenue(transactions),
            regions: region_wise_sales(transactions),
            top_products: top_selling_products(transactions, top_n),
            customers: customer_analysis(transactions),
            daily: daily_sales_trend(transactions),
            peak_day: find_peak_sales_day(transactions),
            low_performers: low_performing_products(transactions, low_threshold),
        }
    }
}
