//! Platform rating collector agent.

use crate::agents::{target_products, AgentOutput, CollectedData, CollectorAgent};
use crate::search::SearchClient;
use crate::types::{DataKind, PipelineState, PlatformRating, RatingRecord, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum platform ratings kept per product.
const MAX_RATINGS: usize = 3;

/// Collects star ratings and review counts per platform via shopping search.
pub struct RatingAgent {
    search: Arc<dyn SearchClient>,
}

impl RatingAgent {
    /// Create an agent backed by the given search client.
    pub fn new(search: Arc<dyn SearchClient>) -> Self {
        Self { search }
    }

    async fn fetch_ratings(&self, product: &str) -> Vec<PlatformRating> {
        match self.search.shopping_search(product, MAX_RATINGS).await {
            Ok(items) => items
                .into_iter()
                .map(|item| PlatformRating {
                    platform: item.source.unwrap_or_else(|| "Unknown Store".to_string()),
                    title: item.title.trim().to_string(),
                    rating: item.rating,
                    total_reviews: item.reviews,
                    url: item.link.unwrap_or_default(),
                })
                .collect(),
            Err(e) => {
                tracing::warn!(product, error = %e, "rating fetch failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CollectorAgent for RatingAgent {
    fn name(&self) -> &str {
        "rating_agent"
    }

    fn kind(&self) -> DataKind {
        DataKind::RatingData
    }

    async fn collect(&self, state: &PipelineState) -> Result<AgentOutput> {
        let mut records = Vec::new();
        for product in target_products(&state.products) {
            let ratings = self.fetch_ratings(product).await;
            records.push(RatingRecord {
                product: product.to_string(),
                ratings,
            });
        }

        let step = format!("Rating data collected for {} products", records.len());
        Ok(AgentOutput {
            data: CollectedData::Ratings(records),
            step,
        })
    }
}
