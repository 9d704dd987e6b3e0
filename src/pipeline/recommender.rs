//! Candidate recommendation stage.

use crate::llm::LlmClient;
use crate::pipeline::extractor::parse_product_list;
use crate::trace::{TraceEvent, TraceSink};
use crate::types::PipelineState;
use std::sync::Arc;

/// Suggests 2-3 concrete candidate products for an open-ended
/// recommendation query, so the collectors have product names to work with.
///
/// Failure is contained: the stage leaves `products` empty.
pub struct ProductRecommender {
    llm: Arc<dyn LlmClient>,
}

impl ProductRecommender {
    /// Create a recommender backed by the given LLM client.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Generate candidate products for the query in `state`.
    pub async fn execute(&self, mut state: PipelineState, trace: &dyn TraceSink) -> PipelineState {
        let prompt = format!(
            "Based on this user query: \"{}\"\n\n\
             Generate 2-3 specific, popular product recommendations that match the requirements.\n\n\
             Return only the product names separated by commas, nothing else.\n\
             For example: \"MacBook Air M2, Dell XPS 13, ThinkPad X1 Carbon\"\n\n\
             Focus on well-known, popular products.",
            state.query
        );

        match self.llm.generate(&prompt).await {
            Ok(response) => {
                state.products = parse_product_list(&response);
                state.current_step = format!("Recommendations generated: {:?}", state.products);
            }
            Err(e) => {
                state.products = Vec::new();
                state.current_step = format!("Recommendation generation failed: {e}");
            }
        }

        trace.record(
            TraceEvent::new("RECOMMEND", state.current_step.clone())
                .with_detail(serde_json::json!({ "products": state.products })),
        );
        state
    }
}
