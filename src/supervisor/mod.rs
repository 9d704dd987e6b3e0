//! Supervisor: the data-collection orchestrator.
//!
//! One [`Supervisor::run`] invocation performs four phases:
//!
//! 1. **Gate** - with no candidate products there is nothing to collect; the
//!    run ends as a terminal success.
//! 2. **Gap analysis** - the presence classifier decides which of the four
//!    data kinds are missing; one collector is scheduled per missing kind.
//! 3. **Dispatch** - scheduled collectors run sequentially or concurrently
//!    depending on configuration. Concurrent collectors each receive an
//!    independent snapshot of the pre-dispatch state and are joined before
//!    merging; a single scheduled collector always runs on the calling task.
//! 4. **Merge** - each successful collector's single owned field is copied
//!    into the returned state; failures leave their field untouched and are
//!    reported in the status message.
//!
//! The supervisor never raises: collector failures degrade one field, and
//! any internal error (including the optional overall timeout) is converted
//! into a status message with the incoming state passed through.

pub mod presence;

use crate::agents::{AgentOutput, CollectedData, CollectorAgent};
use crate::llm::LlmClient;
use crate::search::SearchClient;
use crate::trace::{TraceEvent, TraceSink, TracingSink};
use crate::types::{AppError, PipelineState, Result};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// How scheduled collectors are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// One collector at a time, with an inter-call delay. Useful against
    /// rate-limited backends.
    Sequential,
    /// All scheduled collectors in parallel with a join barrier.
    #[default]
    Concurrent,
}

/// Tuning knobs for the supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Sequential or concurrent dispatch.
    pub dispatch: DispatchMode,
    /// Pause between consecutive sequential collector calls. A policy knob
    /// for external API rate limits, not a correctness requirement.
    pub inter_call_delay: Duration,
    /// Overall bound on one supervisor run. On expiry the incoming state is
    /// passed through with a timeout status.
    pub run_timeout: Option<Duration>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchMode::Concurrent,
            inter_call_delay: Duration::from_millis(500),
            run_timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// Outcome of one collector dispatch, in dispatch order.
type DispatchOutcome = (String, Result<String>);

/// Coordinates the collector agents over the shared pipeline state.
pub struct Supervisor {
    agents: Vec<Arc<dyn CollectorAgent>>,
    config: SupervisorConfig,
    trace: Arc<dyn TraceSink>,
}

impl Supervisor {
    /// Create a supervisor over an explicit set of collectors.
    ///
    /// Collectors are dispatched in the order given. Each collector should
    /// own a distinct data kind; a collector whose output does not match its
    /// declared kind is treated as failed at merge time.
    pub fn new(
        agents: Vec<Arc<dyn CollectorAgent>>,
        config: SupervisorConfig,
        trace: Arc<dyn TraceSink>,
    ) -> Self {
        Self {
            agents,
            config,
            trace,
        }
    }

    /// Create a supervisor with the four standard collectors (product info,
    /// price, review, rating) backed by the given clients.
    pub fn with_standard_agents(
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LlmClient>,
        config: SupervisorConfig,
    ) -> Self {
        use crate::agents::{PriceAgent, ProductInfoAgent, RatingAgent, ReviewAgent};

        let agents: Vec<Arc<dyn CollectorAgent>> = vec![
            Arc::new(ProductInfoAgent::new(Arc::clone(&search))),
            Arc::new(PriceAgent::new(Arc::clone(&search))),
            Arc::new(ReviewAgent::new(Arc::clone(&search), llm)),
            Arc::new(RatingAgent::new(search)),
        ];
        Self::new(agents, config, Arc::new(TracingSink))
    }

    /// Replace the trace sink.
    pub fn with_trace(mut self, trace: Arc<dyn TraceSink>) -> Self {
        self.trace = trace;
        self
    }

    /// Run one supervision pass over the state.
    ///
    /// Never fails: collector errors degrade their field and internal errors
    /// degrade to a status message on the incoming state.
    pub async fn run(&self, state: PipelineState) -> PipelineState {
        let fallback = state.clone();

        let outcome = match self.config.run_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.run_inner(state)).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Internal(format!(
                    "supervisor run exceeded {}s",
                    limit.as_secs()
                ))),
            },
            None => self.run_inner(state).await,
        };

        match outcome {
            Ok(next) => next,
            Err(e) => {
                let status = format!("Supervisor error: {e}");
                self.trace
                    .record(TraceEvent::new("SUPERVISOR_ERROR", status.clone()));
                let mut next = fallback;
                next.missing_data.clear();
                next.current_step = status;
                next
            }
        }
    }

    async fn run_inner(&self, mut state: PipelineState) -> Result<PipelineState> {
        self.trace.record(
            TraceEvent::new("SUPERVISOR_START", "Supervisor started").with_detail(json!({
                "query_id": state.query_id,
                "products_count": state.products.len(),
            })),
        );

        // Gate: nothing to collect without products. Terminal success.
        if state.products.is_empty() {
            self.trace.record(TraceEvent::new(
                "SUPERVISOR_SKIP",
                "No products found - skipping data collection",
            ));
            state.missing_data.clear();
            state.current_step =
                "No products to analyze - skipping data collection".to_string();
            return Ok(state);
        }

        // Gap analysis. missing_data is derived from the current field
        // contents, never trusted from a prior run.
        state.missing_data.clear();
        let mut scheduled: Vec<Arc<dyn CollectorAgent>> = Vec::new();
        for agent in &self.agents {
            let kind = agent.kind();
            if !presence::kind_present(&state, kind) {
                state.missing_data.insert(kind);
                scheduled.push(Arc::clone(agent));
            }
        }

        self.trace.record(
            TraceEvent::new(
                "SUPERVISOR_MISSING",
                format!("{} data kinds missing", scheduled.len()),
            )
            .with_detail(json!({
                "missing": state.missing_data.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "agents": scheduled.iter().map(|a| a.name().to_string()).collect::<Vec<_>>(),
            })),
        );

        if scheduled.is_empty() {
            self.trace.record(TraceEvent::new(
                "SUPERVISOR_COMPLETE",
                "All data already collected",
            ));
            state.current_step = "All data collected - ready for analysis".to_string();
            return Ok(state);
        }

        // Dispatch. A single scheduled collector runs on the calling task
        // regardless of the configured mode.
        let outcomes = if scheduled.len() == 1 || self.config.dispatch == DispatchMode::Sequential
        {
            self.dispatch_sequential(&mut state, &scheduled).await
        } else {
            self.dispatch_concurrent(&mut state, &scheduled).await?
        };

        let total = outcomes.len();
        let completed = outcomes.iter().filter(|(_, r)| r.is_ok()).count();
        let errors: Vec<String> = outcomes
            .iter()
            .filter_map(|(name, result)| {
                result.as_ref().err().map(|e| format!("{name}: {e}"))
            })
            .collect();

        let mut status = format!("Data collection complete - {completed}/{total} agents successful");
        if !errors.is_empty() {
            status.push_str(&format!(". Errors: {}", errors.join("; ")));
        }

        self.trace.record(
            TraceEvent::new("SUPERVISOR_DONE", status.clone()).with_detail(json!({
                "completed": completed,
                "total": total,
                "errors": errors,
            })),
        );

        state.missing_data.clear();
        state.current_step = status;
        Ok(state)
    }

    /// Run scheduled collectors one at a time against the evolving state.
    async fn dispatch_sequential(
        &self,
        state: &mut PipelineState,
        scheduled: &[Arc<dyn CollectorAgent>],
    ) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::with_capacity(scheduled.len());

        for (index, agent) in scheduled.iter().enumerate() {
            self.trace.record(TraceEvent::new(
                "AGENT_START",
                format!("Running {}", agent.name()),
            ));

            let result = match agent.collect(state).await {
                Ok(output) => self.merge_output(state, agent.as_ref(), output),
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                self.trace.record(TraceEvent::new(
                    "AGENT_ERROR",
                    format!("{}: {e}", agent.name()),
                ));
            }
            outcomes.push((agent.name().to_string(), result));

            if index + 1 < scheduled.len() && !self.config.inter_call_delay.is_zero() {
                tokio::time::sleep(self.config.inter_call_delay).await;
            }
        }

        outcomes
    }

    /// Fan out scheduled collectors over independent snapshots of the
    /// pre-dispatch state, join them all, then merge in dispatch order.
    async fn dispatch_concurrent(
        &self,
        state: &mut PipelineState,
        scheduled: &[Arc<dyn CollectorAgent>],
    ) -> Result<Vec<DispatchOutcome>> {
        self.trace.record(TraceEvent::new(
            "SUPERVISOR_DISPATCH",
            format!("Running {} agents concurrently", scheduled.len()),
        ));

        let snapshot = state.clone();
        let mut set: JoinSet<(usize, Result<AgentOutput>)> = JoinSet::new();
        for (index, agent) in scheduled.iter().enumerate() {
            let agent = Arc::clone(agent);
            let snapshot = snapshot.clone();
            set.spawn(async move {
                let result = AssertUnwindSafe(agent.collect(&snapshot))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Err(AppError::Agent("collector task panicked".to_string()))
                    });
                (index, result)
            });
        }

        // Join barrier: every dispatched collector's outcome is observed
        // before any merge happens.
        let mut collected: Vec<Option<Result<AgentOutput>>> =
            (0..scheduled.len()).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            let (index, result) = joined
                .map_err(|e| AppError::Internal(format!("collector task join failed: {e}")))?;
            collected[index] = Some(result);
        }

        let mut outcomes = Vec::with_capacity(scheduled.len());
        for (agent, slot) in scheduled.iter().zip(collected) {
            let result = match slot {
                Some(Ok(output)) => self.merge_output(state, agent.as_ref(), output),
                Some(Err(e)) => Err(e),
                None => Err(AppError::Internal(
                    "collector produced no outcome".to_string(),
                )),
            };
            if let Err(e) = &result {
                self.trace.record(TraceEvent::new(
                    "AGENT_ERROR",
                    format!("{}: {e}", agent.name()),
                ));
            }
            outcomes.push((agent.name().to_string(), result));
        }

        Ok(outcomes)
    }

    /// Copy a collector's single owned field into the state.
    ///
    /// A payload whose kind does not match the collector's declared kind is
    /// rejected, so a buggy collector cannot overwrite another stage's field.
    fn merge_output(
        &self,
        state: &mut PipelineState,
        agent: &dyn CollectorAgent,
        output: AgentOutput,
    ) -> Result<String> {
        if output.data.kind() != agent.kind() {
            return Err(AppError::Agent(format!(
                "collector returned {} data but owns {}",
                output.data.kind(),
                agent.kind()
            )));
        }

        let items = match output.data {
            CollectedData::ProductInfo(records) => {
                let n = records.len();
                state.product_info = records;
                n
            }
            CollectedData::Prices(records) => {
                let n = records.len();
                state.price_data = records;
                n
            }
            CollectedData::Reviews(records) => {
                let n = records.len();
                state.review_data = records;
                n
            }
            CollectedData::Ratings(records) => {
                let n = records.len();
                state.rating_data = records;
                n
            }
        };

        self.trace.record(
            TraceEvent::new("SUPERVISOR_MERGE", format!("Merged {}", agent.kind()))
                .with_detail(json!({ "agent": agent.name(), "items": items })),
        );

        Ok(output.step)
    }
}
