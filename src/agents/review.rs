//! Review collector agent.
//!
//! Two-step collection: fetch review snippets from web search, then have the
//! LLM split them into positive and negative points. Either step failing for
//! a product degrades that product's summary to empty.

use crate::agents::{target_products, AgentOutput, CollectedData, CollectorAgent};
use crate::llm::LlmClient;
use crate::search::SearchClient;
use crate::types::{DataKind, PipelineState, Result, ReviewRecord, ReviewSummary};
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum review snippets fed to the classifier per product.
const MAX_SNIPPETS: usize = 5;
/// Maximum points kept per sentiment.
const MAX_POINTS: usize = 3;

/// Collects and classifies user reviews for each candidate product.
pub struct ReviewAgent {
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn LlmClient>,
}

impl ReviewAgent {
    /// Create an agent backed by the given search and LLM clients.
    pub fn new(search: Arc<dyn SearchClient>, llm: Arc<dyn LlmClient>) -> Self {
        Self { search, llm }
    }

    async fn fetch_snippets(&self, product: &str) -> Vec<String> {
        let query = format!("{product} user reviews");
        match self.search.web_search(&query, MAX_SNIPPETS).await {
            Ok(hits) => hits
                .into_iter()
                .map(|hit| hit.snippet.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(e) => {
                tracing::warn!(product, error = %e, "review snippet fetch failed");
                Vec::new()
            }
        }
    }

    async fn classify(&self, snippets: &[String]) -> ReviewSummary {
        if snippets.is_empty() {
            return ReviewSummary::default();
        }

        let combined = snippets.join("\n---\n");
        let prompt = format!(
            "Analyze these review snippets and categorize them as positive or negative:\n\n\
             {combined}\n\n\
             Return your analysis in this format:\n\
             POSITIVE:\n\
             - [positive points]\n\n\
             NEGATIVE:\n\
             - [negative points]"
        );

        match self.llm.generate(&prompt).await {
            Ok(response) => parse_classification(&response),
            Err(e) => {
                tracing::warn!(error = %e, "review classification failed");
                ReviewSummary::default()
            }
        }
    }
}

/// Parse the `POSITIVE:` / `NEGATIVE:` sections of a classification response.
///
/// Tolerates extra prose around the sections; only bullet lines are kept,
/// capped at [`MAX_POINTS`] per sentiment.
fn parse_classification(response: &str) -> ReviewSummary {
    fn bullets(section: &str) -> Vec<String> {
        section
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('-'))
            .map(|line| line.trim_start_matches('-').trim().to_string())
            .filter(|line| !line.is_empty())
            .take(MAX_POINTS)
            .collect()
    }

    let mut summary = ReviewSummary::default();

    if let Some(after_positive) = response.split("POSITIVE:").nth(1) {
        let positive_section = after_positive
            .split("NEGATIVE:")
            .next()
            .unwrap_or(after_positive);
        summary.positive = bullets(positive_section);
    }
    if let Some(negative_section) = response.split("NEGATIVE:").nth(1) {
        summary.negative = bullets(negative_section);
    }

    summary
}

#[async_trait]
impl CollectorAgent for ReviewAgent {
    fn name(&self) -> &str {
        "review_agent"
    }

    fn kind(&self) -> DataKind {
        DataKind::ReviewData
    }

    async fn collect(&self, state: &PipelineState) -> Result<AgentOutput> {
        let mut records = Vec::new();
        for product in target_products(&state.products) {
            let snippets = self.fetch_snippets(product).await;
            let reviews = self.classify(&snippets).await;
            records.push(ReviewRecord {
                product: product.to_string(),
                reviews,
            });
        }

        let step = format!("Review data collected for {} products", records.len());
        Ok(AgentOutput {
            data: CollectedData::Reviews(records),
            step,
        })
    }
}
