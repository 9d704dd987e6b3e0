//! End-to-end pipeline tests with scripted LLM and search clients.

mod common;

use common::mocks::{MockLlmClient, MockSearchClient};
use shopsage::trace::MemorySink;
use shopsage::types::Intent;
use shopsage::{DispatchMode, Pipeline, SupervisorConfig};
use std::sync::Arc;
use std::time::Duration;

fn fast_supervisor_config() -> SupervisorConfig {
    SupervisorConfig {
        dispatch: DispatchMode::Concurrent,
        inter_call_delay: Duration::ZERO,
        run_timeout: Some(Duration::from_secs(5)),
    }
}

/// An LLM script covering every stage prompt.
fn scripted_llm(intent: &str, products: &str) -> MockLlmClient {
    MockLlmClient::new("POSITIVE:\n- Great battery\nNEGATIVE:\n- Pricey")
        .with_rule("classify the intent", intent)
        .with_rule("Extract specific product names", products)
        .with_rule("Generate 2-3 specific", products)
        .with_rule("product advisor", "Go with Phone A.")
}

#[tokio::test]
async fn comparison_query_flows_through_extraction_and_collection() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        Arc::new(MockSearchClient::new()),
        Arc::new(scripted_llm("comparison", "Phone A, Phone B")),
        fast_supervisor_config(),
        sink.clone(),
    );

    let state = pipeline.run("Phone A vs Phone B").await;

    assert_eq!(state.intent, Intent::Comparison);
    assert_eq!(state.products, vec!["Phone A", "Phone B"]);
    assert_eq!(state.product_info.len(), 2);
    assert_eq!(state.price_data.len(), 2);
    assert_eq!(state.review_data.len(), 2);
    assert_eq!(state.rating_data.len(), 2);
    assert_eq!(state.final_recommendation.as_deref(), Some("Go with Phone A."));
    assert!(state.missing_data.is_empty());

    assert!(sink.has_stage("PIPELINE_START"));
    assert!(sink.has_stage("EXTRACT"));
    assert!(sink.has_stage("SUPERVISOR_DONE"));
    assert!(sink.has_stage("ANALYZE"));
    assert!(sink.has_stage("PIPELINE_DONE"));
}

#[tokio::test]
async fn recommendation_query_generates_candidates_first() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        Arc::new(MockSearchClient::new()),
        Arc::new(scripted_llm("recommendation", "Laptop X, Laptop Y")),
        fast_supervisor_config(),
        sink.clone(),
    );

    let state = pipeline.run("best laptop for travel").await;

    assert_eq!(state.intent, Intent::Recommendation);
    assert_eq!(state.products, vec!["Laptop X", "Laptop Y"]);
    assert!(state.final_recommendation.is_some());
    assert!(sink.has_stage("RECOMMEND"));
    assert!(!sink.has_stage("EXTRACT"));
}

#[tokio::test]
async fn query_without_products_short_circuits_collection() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        Arc::new(MockSearchClient::new()),
        Arc::new(scripted_llm("recommendation", "none")),
        fast_supervisor_config(),
        sink.clone(),
    );

    let state = pipeline.run("something vague").await;

    assert!(state.products.is_empty());
    assert!(state.product_info.is_empty());
    let message = state.final_recommendation.unwrap();
    assert!(message.contains("couldn't identify specific products"));
    assert!(sink.has_stage("SUPERVISOR_SKIP"));
}

#[tokio::test]
async fn search_outage_still_produces_a_recommendation() {
    // Per-product search errors are contained inside the collectors, so the
    // run completes and the analyzer works with sparse data.
    let pipeline = Pipeline::new(
        Arc::new(MockSearchClient::failing()),
        Arc::new(scripted_llm("comparison", "Phone A")),
        fast_supervisor_config(),
        Arc::new(MemorySink::new()),
    );

    let state = pipeline.run("Phone A vs nothing").await;

    assert_eq!(state.products, vec!["Phone A"]);
    assert!(state.final_recommendation.is_some());
    assert!(state.current_step.contains("Analysis complete"));
}
