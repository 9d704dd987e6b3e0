//! Product-name extraction stage.

use crate::llm::LlmClient;
use crate::trace::{TraceEvent, TraceSink};
use crate::types::PipelineState;
use std::sync::Arc;

/// Extracts the specific product names mentioned in a comparison query.
///
/// Extraction failure is contained: the stage leaves `products` empty and
/// lets the supervisor's gate handle the empty list.
pub struct ProductExtractor {
    llm: Arc<dyn LlmClient>,
}

impl ProductExtractor {
    /// Create an extractor backed by the given LLM client.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Extract product names from the query in `state`.
    pub async fn execute(&self, mut state: PipelineState, trace: &dyn TraceSink) -> PipelineState {
        let prompt = format!(
            "Extract specific product names from this query: \"{}\"\n\n\
             Return only the product names separated by commas, nothing else.\n\
             For example: \"iPhone 15, Samsung Galaxy S24\"\n\n\
             If no specific products are mentioned, return an empty response.",
            state.query
        );

        match self.llm.generate(&prompt).await {
            Ok(response) => {
                state.products = parse_product_list(&response);
                state.current_step = format!("Products extracted: {:?}", state.products);
            }
            Err(e) => {
                state.products = Vec::new();
                state.current_step = format!("Product extraction failed: {e}");
            }
        }

        trace.record(
            TraceEvent::new("EXTRACT", state.current_step.clone())
                .with_detail(serde_json::json!({ "products": state.products })),
        );
        state
    }
}

/// Split a comma-separated model response into cleaned product names.
///
/// Sentinel responses like "none" or "empty" yield an empty list.
pub(crate) fn parse_product_list(response: &str) -> Vec<String> {
    let content = response.trim();
    if content.is_empty() || matches!(content.to_lowercase().as_str(), "none" | "empty") {
        return Vec::new();
    }

    content
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}
