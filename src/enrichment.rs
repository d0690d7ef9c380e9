use crate::models::{CatalogProduct, EnrichedTransaction, ProductInfo, ProductMapping, Transaction};
use tracing::{debug, info};

/// Index catalog products by id; a later duplicate id replaces an earlier one
pub fn create_product_mapping(products: Vec<CatalogProduct>) -> ProductMapping {
    products
        .into_iter()
        .map(|p| {
            (
                p.id,
                ProductInfo {
                    title: p.title,
                    category: p.category,
                    brand: p.brand,
                    rating: p.rating,
                },
            )
        })
        .collect()
}

/// Numeric catalog id embedded in a product code (`P101` -> `101`)
pub fn product_numeric_id(product_id: &str) -> Option<i64> {
    product_id.strip_prefix('P')?.parse().ok()
}

/// Attach catalog attributes to each transaction.
///
/// Transactions whose product code has no numeric id, or whose id is not in
/// the mapping, are kept with `api_match == false` and no attributes.
pub fn enrich_sales_data(transactions: &[Transaction], mapping: &ProductMapping) -> Vec<EnrichedTransaction> {
    let enriched: Vec<EnrichedTransaction> = transactions
        .iter()
        .map(|tx| {
            let info = product_numeric_id(&tx.product_id).and_then(|id| mapping.get(&id));
            match info {
                Some(info) => EnrichedTransaction {
                    transaction: tx.clone(),
                    api_category: info.category.clone(),
                    api_brand: info.brand.clone(),
                    api_rating: info.rating,
                    api_match: true,
                },
                None => {
                    debug!("No catalog match for product {}", tx.product_id);
                    EnrichedTransaction {
                        transaction: tx.clone(),
                        api_category: None,
                        api_brand: None,
                        api_rating: None,
                        api_match: false,
                    }
                }
            }
        })
        .collect();

    info!(
        "Enriched {} of {} transactions",
        matched_count(&enriched),
        enriched.len()
    );
    enriched
}

/// Number of transactions that found a catalog match
pub fn matched_count(enriched: &[EnrichedTransaction]) -> usize {
    enriched.iter().filter(|tx| tx.api_match).count()
}
