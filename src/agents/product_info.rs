//! Product information collector agent.

use crate::agents::{target_products, AgentOutput, CollectedData, CollectorAgent};
use crate::search::SearchClient;
use crate::types::{DataKind, InfoSnippet, PipelineState, ProductInfoRecord, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum snippets kept per product.
const MAX_SNIPPETS: usize = 3;

/// Collects specification/overview snippets for each candidate product via
/// web search.
pub struct ProductInfoAgent {
    search: Arc<dyn SearchClient>,
}

impl ProductInfoAgent {
    /// Create an agent backed by the given search client.
    pub fn new(search: Arc<dyn SearchClient>) -> Self {
        Self { search }
    }

    async fn fetch_info(&self, product: &str) -> Vec<InfoSnippet> {
        let query = format!("{product} specifications features");
        match self.search.web_search(&query, MAX_SNIPPETS).await {
            Ok(hits) => hits
                .into_iter()
                .filter(|hit| !hit.snippet.trim().is_empty())
                .map(|hit| InfoSnippet {
                    title: hit.title.trim().to_string(),
                    snippet: hit.snippet.trim().to_string(),
                    link: hit.link,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(product, error = %e, "product info fetch failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CollectorAgent for ProductInfoAgent {
    fn name(&self) -> &str {
        "product_info_agent"
    }

    fn kind(&self) -> DataKind {
        DataKind::ProductInfo
    }

    async fn collect(&self, state: &PipelineState) -> Result<AgentOutput> {
        let mut records = Vec::new();
        for product in target_products(&state.products) {
            let info = self.fetch_info(product).await;
            records.push(ProductInfoRecord {
                product: product.to_string(),
                info,
            });
        }

        let step = format!("Product info collected for {} products", records.len());
        Ok(AgentOutput {
            data: CollectedData::ProductInfo(records),
            step,
        })
    }
}
