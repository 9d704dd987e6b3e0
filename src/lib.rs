//! # shopsage
//!
//! A multi-agent product recommendation pipeline. A free-text shopping query
//! is classified, turned into candidate product names, enriched by four
//! independent collector agents (specifications, prices, reviews, platform
//! ratings), and synthesized into a recommendation by a language model.
//!
//! The heart of the crate is the [`supervisor::Supervisor`]: it decides which
//! data kinds are still missing from the shared [`types::PipelineState`],
//! dispatches only the matching collectors (concurrently by default), merges
//! their partial results field by field, and reports an aggregate status that
//! tolerates individual collector failures.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use shopsage::{Pipeline, ShopsageConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ShopsageConfig::load("shopsage.toml")?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!
//!     let state = pipeline.run("best phone under $500").await;
//!     println!("{}", state.final_recommendation.unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`supervisor`] - gap analysis, dispatch, merge, and status reporting
//! - [`agents`] - the four collector agents
//! - [`pipeline`] - intent classification, product extraction, synthesis
//! - [`search`] / [`llm`] - external service clients
//! - [`trace`] - injected structured trace events
//! - [`types`] - pipeline state, records, and error handling

#![warn(missing_docs)]

/// Collector agents that gather one category of product data each.
pub mod agents;
/// TOML configuration with env-resolved secrets.
pub mod config;
/// LLM provider clients and abstractions.
pub mod llm;
/// Pipeline stages surrounding the supervisor.
pub mod pipeline;
/// External search client abstractions.
pub mod search;
/// The data-collection orchestrator.
pub mod supervisor;
/// Structured trace events for observability.
pub mod trace;
/// Core types and error handling.
pub mod types;

// Re-export commonly used types
pub use agents::{AgentOutput, CollectedData, CollectorAgent};
pub use config::ShopsageConfig;
pub use llm::{GeminiClient, LlmClient};
pub use pipeline::Pipeline;
pub use search::{SearchClient, SerpApiClient};
pub use supervisor::{DispatchMode, Supervisor, SupervisorConfig};
pub use trace::{init_tracing, MemorySink, TraceEvent, TraceSink, TracingSink};
pub use types::{AppError, DataKind, Intent, PipelineState, Result};
