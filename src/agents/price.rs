//! Price collector agent.

use crate::agents::{target_products, AgentOutput, CollectedData, CollectorAgent};
use crate::search::SearchClient;
use crate::types::{DataKind, PipelineState, PriceListing, PriceRecord, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum listings kept per product.
const MAX_LISTINGS: usize = 3;

/// Collects store/price listings for each candidate product via shopping
/// search.
pub struct PriceAgent {
    search: Arc<dyn SearchClient>,
}

impl PriceAgent {
    /// Create an agent backed by the given search client.
    pub fn new(search: Arc<dyn SearchClient>) -> Self {
        Self { search }
    }

    async fn fetch_prices(&self, product: &str) -> Vec<PriceListing> {
        match self.search.shopping_search(product, MAX_LISTINGS).await {
            Ok(items) => items
                .into_iter()
                .map(|item| PriceListing {
                    store: item.source.unwrap_or_else(|| "Unknown".to_string()),
                    title: item.title.trim().to_string(),
                    price: item.price.unwrap_or_else(|| "Not Found".to_string()),
                    url: item.link.unwrap_or_default(),
                })
                .collect(),
            Err(e) => {
                // Degrade this product to an empty listing set.
                tracing::warn!(product, error = %e, "price fetch failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CollectorAgent for PriceAgent {
    fn name(&self) -> &str {
        "price_agent"
    }

    fn kind(&self) -> DataKind {
        DataKind::PriceData
    }

    async fn collect(&self, state: &PipelineState) -> Result<AgentOutput> {
        let mut records = Vec::new();
        for product in target_products(&state.products) {
            let prices = self.fetch_prices(product).await;
            records.push(PriceRecord {
                product: product.to_string(),
                prices,
            });
        }

        let step = format!("Price data collected for {} products", records.len());
        Ok(AgentOutput {
            data: CollectedData::Prices(records),
            step,
        })
    }
}
