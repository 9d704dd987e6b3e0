//! Analysis/synthesis stage.
//!
//! Downstream consumer of the merged state: builds a data summary over the
//! four collected fields and asks the LLM for the final recommendation text.
//! The supervisor guarantees all four fields are present (possibly empty) by
//! the time this stage runs, and the prompt tells the model to work with
//! whatever data made it through.

use crate::llm::LlmClient;
use crate::trace::{TraceEvent, TraceSink};
use crate::types::PipelineState;
use std::sync::Arc;

/// Message used when no products could be identified upstream.
const NO_PRODUCTS_MESSAGE: &str = "I couldn't identify specific products from your query. \
     Please try being more specific about what you're looking for.";

/// Synthesizes the final recommendation from the merged pipeline state.
pub struct Analyzer {
    llm: Arc<dyn LlmClient>,
}

impl Analyzer {
    /// Create an analyzer backed by the given LLM client.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Produce `final_recommendation` for the state.
    ///
    /// Failure is contained: on an LLM error a degraded message referencing
    /// the error is stored instead.
    pub async fn execute(&self, mut state: PipelineState, trace: &dyn TraceSink) -> PipelineState {
        if state.products.is_empty() {
            state.final_recommendation = Some(NO_PRODUCTS_MESSAGE.to_string());
            state.current_step = "Analysis complete - no products found".to_string();
            trace.record(TraceEvent::new("ANALYZE", state.current_step.clone()));
            return state;
        }

        let prompt = build_analysis_prompt(&state);
        match self.llm.generate(&prompt).await {
            Ok(response) => {
                state.final_recommendation = Some(response);
                state.current_step = "Analysis complete".to_string();
            }
            Err(e) => {
                state.final_recommendation = Some(format!(
                    "I encountered an error while analyzing the products: {e}. \
                     Please try again or check your API configuration."
                ));
                state.current_step = format!("Analysis failed: {e}");
            }
        }

        trace.record(TraceEvent::new("ANALYZE", state.current_step.clone()));
        state
    }
}

/// Build the synthesis prompt over every collected field.
fn build_analysis_prompt(state: &PipelineState) -> String {
    let data_summary = format!(
        "User Query: {}\n\
         Products to analyze: {:?}\n\n\
         Available Data:\n\
         - Price Data: {} entries\n\
         - Review Data: {} entries\n\
         - Product Info: {} entries\n\
         - Rating Data: {} entries\n\n\
         Detailed Data:\n\
         Price Information: {}\n\
         Reviews: {}\n\
         Product Details: {}\n\
         Ratings: {}",
        state.query,
        state.products,
        state.price_data.len(),
        state.review_data.len(),
        state.product_info.len(),
        state.rating_data.len(),
        serde_json::to_string(&state.price_data).unwrap_or_default(),
        serde_json::to_string(&state.review_data).unwrap_or_default(),
        serde_json::to_string(&state.product_info).unwrap_or_default(),
        serde_json::to_string(&state.rating_data).unwrap_or_default(),
    );

    format!(
        "You are a knowledgeable product advisor. Based on the following information, \
         provide a comprehensive recommendation:\n\n\
         {data_summary}\n\n\
         Please provide:\n\
         1. A clear recommendation addressing the user's query\n\
         2. Key features and benefits of recommended products\n\
         3. Price ranges if available\n\
         4. Any important considerations\n\
         5. Final verdict/recommendation\n\n\
         Make your response helpful, informative, and well-structured. \
         If data is limited, use your knowledge to provide valuable insights."
    )
}
