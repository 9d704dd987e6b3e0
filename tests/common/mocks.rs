//! Mock implementations for testing.
//!
//! Stub collectors, LLM clients, and search clients shared across the
//! integration test files, so individual tests can focus on orchestration
//! behavior instead of wiring.

#![allow(dead_code)]

use async_trait::async_trait;
use shopsage::agents::{AgentOutput, CollectedData, CollectorAgent};
use shopsage::search::{OrganicHit, SearchClient, ShoppingItem};
use shopsage::types::{
    AppError, DataKind, InfoSnippet, PipelineState, PlatformRating, PriceListing, PriceRecord,
    ProductInfoRecord, RatingRecord, Result, ReviewRecord, ReviewSummary,
};
use shopsage::LlmClient;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============= Sample data =============

/// Build one populated record per product for the given kind.
pub fn sample_collected(kind: DataKind, products: &[String]) -> CollectedData {
    match kind {
        DataKind::ProductInfo => CollectedData::ProductInfo(
            products
                .iter()
                .map(|p| ProductInfoRecord {
                    product: p.clone(),
                    info: vec![InfoSnippet {
                        title: format!("{p} overview"),
                        snippet: format!("{p} has a 6.1in display"),
                        link: "https://example.com/info".to_string(),
                    }],
                })
                .collect(),
        ),
        DataKind::PriceData => CollectedData::Prices(
            products
                .iter()
                .map(|p| PriceRecord {
                    product: p.clone(),
                    prices: vec![PriceListing {
                        store: "BigMart".to_string(),
                        title: p.clone(),
                        price: "$100".to_string(),
                        url: "https://example.com/buy".to_string(),
                    }],
                })
                .collect(),
        ),
        DataKind::ReviewData => CollectedData::Reviews(
            products
                .iter()
                .map(|p| ReviewRecord {
                    product: p.clone(),
                    reviews: ReviewSummary {
                        positive: vec![format!("{p} battery lasts long")],
                        negative: vec![format!("{p} charges slowly")],
                    },
                })
                .collect(),
        ),
        DataKind::RatingData => CollectedData::Ratings(
            products
                .iter()
                .map(|p| RatingRecord {
                    product: p.clone(),
                    ratings: vec![PlatformRating {
                        platform: "ShopZone".to_string(),
                        title: p.clone(),
                        rating: Some(4.2),
                        total_reviews: Some(512),
                        url: "https://example.com/rating".to_string(),
                    }],
                })
                .collect(),
        ),
    }
}

/// Populate the state field owned by `kind` with sample data.
pub fn populate_kind(state: &mut PipelineState, kind: DataKind) {
    let products = state.products.clone();
    match sample_collected(kind, &products) {
        CollectedData::ProductInfo(records) => state.product_info = records,
        CollectedData::Prices(records) => state.price_data = records,
        CollectedData::Reviews(records) => state.review_data = records,
        CollectedData::Ratings(records) => state.rating_data = records,
    }
}

/// A state with products and every data kind already populated.
pub fn fully_populated_state(products: &[&str]) -> PipelineState {
    let mut state = PipelineState::new("test query");
    state.products = products.iter().map(|s| s.to_string()).collect();
    for kind in DataKind::ALL {
        populate_kind(&mut state, kind);
    }
    state
}

// ============= Stub collector =============

/// How a [`StubCollector`] behaves when invoked.
#[derive(Clone)]
pub enum StubBehavior {
    /// Return one populated record per product.
    Succeed,
    /// Fail with the given message.
    Fail(String),
    /// Return data of the wrong kind (exercises the merge guard).
    WrongKind,
    /// Panic mid-collection (exercises panic containment).
    Panic,
}

/// Configurable collector for orchestration tests.
pub struct StubCollector {
    name: String,
    kind: DataKind,
    behavior: StubBehavior,
    delay: Option<Duration>,
    invocations: Arc<AtomicUsize>,
}

impl StubCollector {
    /// A collector that succeeds with sample data.
    pub fn succeeding(name: &str, kind: DataKind) -> Self {
        Self::new(name, kind, StubBehavior::Succeed)
    }

    /// A collector that fails with the given message.
    pub fn failing(name: &str, kind: DataKind, message: &str) -> Self {
        Self::new(name, kind, StubBehavior::Fail(message.to_string()))
    }

    /// A collector with explicit behavior.
    pub fn new(name: &str, kind: DataKind, behavior: StubBehavior) -> Self {
        Self {
            name: name.to_string(),
            kind,
            behavior,
            delay: None,
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sleep for `delay` before producing the outcome.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Handle to the invocation counter.
    pub fn invocation_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.invocations)
    }
}

#[async_trait]
impl CollectorAgent for StubCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DataKind {
        self.kind
    }

    async fn collect(&self, state: &PipelineState) -> Result<AgentOutput> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            StubBehavior::Succeed => Ok(AgentOutput {
                data: sample_collected(self.kind, &state.products),
                step: format!("{} collected", self.name),
            }),
            StubBehavior::Fail(message) => Err(AppError::Agent(message.clone())),
            StubBehavior::WrongKind => {
                let other = DataKind::ALL
                    .into_iter()
                    .find(|k| *k != self.kind)
                    .expect("more than one kind exists");
                Ok(AgentOutput {
                    data: sample_collected(other, &state.products),
                    step: format!("{} collected", self.name),
                })
            }
            StubBehavior::Panic => panic!("stub collector blew up"),
        }
    }
}

// ============= Mock LLM client =============

/// Mock LLM client that scripts responses by prompt content.
pub struct MockLlmClient {
    rules: Vec<(&'static str, String)>,
    fallback: String,
    should_fail: bool,
}

impl MockLlmClient {
    /// A client that always returns `response`.
    pub fn new(response: &str) -> Self {
        Self {
            rules: Vec::new(),
            fallback: response.to_string(),
            should_fail: false,
        }
    }

    /// A client that always fails.
    pub fn failing() -> Self {
        Self {
            rules: Vec::new(),
            fallback: String::new(),
            should_fail: true,
        }
    }

    /// Respond with `response` when the prompt contains `needle`.
    pub fn with_rule(mut self, needle: &'static str, response: &str) -> Self {
        self.rules.push((needle, response.to_string()));
        self
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.should_fail {
            return Err(AppError::Llm("Mock LLM failure".to_string()));
        }
        for (needle, response) in &self.rules {
            if prompt.contains(needle) {
                return Ok(response.clone());
            }
        }
        Ok(self.fallback.clone())
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }

    fn model_name(&self) -> &str {
        "mock-llm"
    }
}

// ============= Mock search client =============

/// Mock search client returning canned results.
pub struct MockSearchClient {
    pub should_fail: bool,
}

impl MockSearchClient {
    /// A client that returns one canned result per query.
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    /// A client that always fails.
    pub fn failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn shopping_search(&self, query: &str, _max_results: usize) -> Result<Vec<ShoppingItem>> {
        if self.should_fail {
            return Err(AppError::Search("Mock search failure".to_string()));
        }
        Ok(vec![ShoppingItem {
            title: format!("{query} 128GB"),
            price: Some("$249".to_string()),
            source: Some("BigMart".to_string()),
            link: Some("https://example.com/listing".to_string()),
            rating: Some(4.4),
            reviews: Some(321),
        }])
    }

    async fn web_search(&self, query: &str, _max_results: usize) -> Result<Vec<OrganicHit>> {
        if self.should_fail {
            return Err(AppError::Search("Mock search failure".to_string()));
        }
        Ok(vec![OrganicHit {
            title: format!("About {query}"),
            snippet: format!("Everything you need to know about {query}"),
            link: "https://example.com/article".to_string(),
        }])
    }
}
