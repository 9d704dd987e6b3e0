//! End-to-end pipeline wiring.
//!
//! The Rust-native equivalent of the original workflow graph: classify the
//! query intent, produce candidate products (extracted from the query for
//! comparisons, suggested by the model for recommendations), run the
//! supervisor over the collectors, then synthesize the final answer. Every
//! stage contains its own failures, so [`Pipeline::run`] always returns a
//! usable state.

pub mod analyzer;
pub mod extractor;
pub mod intent;
pub mod recommender;

use crate::config::ShopsageConfig;
use crate::llm::{GeminiClient, LlmClient};
use crate::search::{SearchClient, SerpApiClient};
use crate::supervisor::Supervisor;
use crate::trace::{TraceEvent, TraceSink, TracingSink};
use crate::types::{Intent, PipelineState, Result};
use std::sync::Arc;

pub use analyzer::Analyzer;
pub use extractor::ProductExtractor;
pub use intent::IntentClassifier;
pub use recommender::ProductRecommender;

/// The full recommendation pipeline.
pub struct Pipeline {
    intent: IntentClassifier,
    extractor: ProductExtractor,
    recommender: ProductRecommender,
    supervisor: Supervisor,
    analyzer: Analyzer,
    trace: Arc<dyn TraceSink>,
}

impl Pipeline {
    /// Assemble a pipeline from shared clients.
    ///
    /// The supervisor is created with the four standard collectors; all
    /// stages share the given trace sink.
    pub fn new(
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LlmClient>,
        supervisor_config: crate::supervisor::SupervisorConfig,
        trace: Arc<dyn TraceSink>,
    ) -> Self {
        let supervisor =
            Supervisor::with_standard_agents(search, Arc::clone(&llm), supervisor_config)
                .with_trace(Arc::clone(&trace));

        Self {
            intent: IntentClassifier::new(Arc::clone(&llm)),
            extractor: ProductExtractor::new(Arc::clone(&llm)),
            recommender: ProductRecommender::new(Arc::clone(&llm)),
            supervisor,
            analyzer: Analyzer::new(llm),
            trace,
        }
    }

    /// Assemble a pipeline from configuration, constructing the SerpAPI and
    /// Gemini clients.
    ///
    /// # Errors
    ///
    /// Returns [`crate::types::AppError::Configuration`] when an API key env
    /// var is unset or a client cannot be built.
    pub fn from_config(config: &ShopsageConfig) -> Result<Self> {
        let search: Arc<dyn SearchClient> =
            Arc::new(SerpApiClient::new(config.serpapi_config()?)?);
        let llm: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(config.gemini_config()?)?);

        Ok(Self::new(
            search,
            llm,
            config.supervisor_config(),
            Arc::new(TracingSink),
        ))
    }

    /// Run the pipeline for one user query.
    pub async fn run(&self, query: &str) -> PipelineState {
        let state = PipelineState::new(query);
        self.trace.record(
            TraceEvent::new("PIPELINE_START", "Pipeline started")
                .with_detail(serde_json::json!({ "query_id": state.query_id })),
        );

        let state = self.intent.execute(state, self.trace.as_ref()).await;
        let state = match state.intent {
            Intent::Comparison => self.extractor.execute(state, self.trace.as_ref()).await,
            Intent::Recommendation => self.recommender.execute(state, self.trace.as_ref()).await,
        };

        let state = self.supervisor.run(state).await;
        let state = self.analyzer.execute(state, self.trace.as_ref()).await;

        self.trace.record(
            TraceEvent::new("PIPELINE_DONE", state.current_step.clone())
                .with_detail(serde_json::json!({ "query_id": state.query_id })),
        );
        state
    }
}
