use crate::error::SalesAnalyticsError;
use crate::models::CatalogProduct;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";
pub const DEFAULT_CATALOG_LIMIT: usize = 100;
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    products: Vec<CatalogProduct>,
}

/// Client for the remote product catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: Url,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SalesAnalyticsError> {
        let base_url =
            Url::parse(base_url).map_err(|_| SalesAnalyticsError::InvalidCatalogUrl(base_url.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, http })
    }

    /// Fetch up to `limit` products. Any transport, status or decoding
    /// failure is logged and yields an empty list.
    pub async fn fetch_all_products(&self, limit: usize) -> Vec<CatalogProduct> {
        match self.try_fetch_products(limit).await {
            Ok(products) => {
                info!("Fetched {} products from {}", products.len(), self.base_url);
                products
            }
            Err(e) => {
                warn!("Catalog unavailable at {}: {}", self.base_url, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_products(&self, limit: usize) -> Result<Vec<CatalogProduct>, SalesAnalyticsError> {
        let body = self
            .http
            .get(self.base_url.clone())
            .query(&[("limit", limit)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_catalog(&body)
    }
}

/// Decode a catalog response body; a missing `products` key is an empty catalog
pub fn parse_catalog(body: &str) -> Result<Vec<CatalogProduct>, SalesAnalyticsError> {
    let response: CatalogResponse = serde_json::from_str(body)?;
    Ok(response.products)
}
