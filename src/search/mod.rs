//! External search client abstractions.
//!
//! Collector agents depend on the [`SearchClient`] trait rather than a
//! concrete backend, so tests can substitute canned results and the search
//! provider can be swapped without touching agent code.

pub mod serpapi;

use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use serpapi::{SerpApiClient, SerpApiConfig};

/// One shopping listing returned by the search backend.
///
/// Only the fields the pipeline reads; the backend response carries much
/// more that is deliberately ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    /// Listing title.
    #[serde(default)]
    pub title: String,
    /// Displayed price, e.g. `"$799"`. Absent for some listings.
    #[serde(default)]
    pub price: Option<String>,
    /// Store/platform name.
    #[serde(default)]
    pub source: Option<String>,
    /// Link to the listing.
    #[serde(default)]
    pub link: Option<String>,
    /// Star rating shown on the platform.
    #[serde(default)]
    pub rating: Option<f32>,
    /// Review count behind the rating.
    #[serde(default)]
    pub reviews: Option<u64>,
}

/// One organic web result returned by the search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicHit {
    /// Result title.
    #[serde(default)]
    pub title: String,
    /// Result snippet, empty when the backend shows none.
    #[serde(default)]
    pub snippet: String,
    /// Link to the result.
    #[serde(default)]
    pub link: String,
}

/// Search backend used by the collector agents.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a shopping search and return up to `max_results` listings.
    async fn shopping_search(&self, query: &str, max_results: usize) -> Result<Vec<ShoppingItem>>;

    /// Run a web search and return up to `max_results` organic results.
    async fn web_search(&self, query: &str, max_results: usize) -> Result<Vec<OrganicHit>>;
}
