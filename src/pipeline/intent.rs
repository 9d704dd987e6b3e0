//! Intent classification stage.

use crate::llm::LlmClient;
use crate::trace::{TraceEvent, TraceSink};
use crate::types::{Intent, PipelineState};
use std::sync::Arc;

/// Classifies the user query as a recommendation or comparison request.
///
/// Classification failure is contained: the stage falls back to
/// [`Intent::Recommendation`] so the pipeline always proceeds.
pub struct IntentClassifier {
    llm: Arc<dyn LlmClient>,
}

impl IntentClassifier {
    /// Create a classifier backed by the given LLM client.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Classify the query in `state` and record the result.
    pub async fn execute(&self, mut state: PipelineState, trace: &dyn TraceSink) -> PipelineState {
        let prompt = format!(
            "Analyze the following user query and classify the intent as either \
             \"recommendation\" or \"comparison\":\n\n\
             Query: \"{}\"\n\n\
             - If the user is asking for product suggestions, respond with \"recommendation\"\n\
             - If the user wants to compare specific products, respond with \"comparison\"\n\n\
             Respond with only one word: \"recommendation\" or \"comparison\"",
            state.query
        );

        match self.llm.generate(&prompt).await {
            Ok(response) => {
                state.intent = Intent::parse_lenient(&response);
                state.current_step = "Intent classified".to_string();
            }
            Err(e) => {
                state.intent = Intent::Recommendation;
                state.current_step = format!("Intent classification failed: {e}");
            }
        }

        trace.record(
            TraceEvent::new("INTENT", state.current_step.clone())
                .with_detail(serde_json::json!({ "intent": state.intent.to_string() })),
        );
        state
    }
}
