//! Core types: pipeline state, collected-data records, and error handling.
//!
//! The [`PipelineState`] is the single shared record threaded through every
//! stage of a recommendation run. Each collector agent owns exactly one of its
//! `*_data` fields; the supervisor is the only component that writes a field
//! it does not own (during the merge step).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

// ============= Pipeline State =============

/// Shared mutable state for one user query.
///
/// Created once per query, mutated additively by each stage (a stage only
/// adds or replaces its own field), and discarded once the analyzer has
/// produced the final recommendation. Nothing persists across queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    /// Unique id for this run, used to correlate trace events.
    pub query_id: Uuid,
    /// The original user request, verbatim.
    pub query: String,
    /// Classified intent, set by the intent classifier stage.
    pub intent: Intent,
    /// Candidate product names. Collector agents process at most the first
    /// three distinct entries.
    pub products: Vec<String>,
    /// Per-product specification snippets, owned by the product-info agent.
    pub product_info: Vec<ProductInfoRecord>,
    /// Per-product store/price listings, owned by the price agent.
    pub price_data: Vec<PriceRecord>,
    /// Per-product classified review summaries, owned by the review agent.
    pub review_data: Vec<ReviewRecord>,
    /// Per-product platform ratings, owned by the rating agent.
    pub rating_data: Vec<RatingRecord>,
    /// Data kinds found missing during the last gap analysis. Derived and
    /// transient: recomputed on every supervisor run and cleared before the
    /// supervisor returns.
    pub missing_data: BTreeSet<DataKind>,
    /// Human-readable trace of the last action taken.
    pub current_step: String,
    /// Synthesized recommendation text, set by the analyzer stage.
    pub final_recommendation: Option<String>,
    /// When this run started.
    pub started_at: DateTime<Utc>,
}

impl PipelineState {
    /// Create a fresh state for a user query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query_id: Uuid::new_v4(),
            query: query.into(),
            intent: Intent::default(),
            products: Vec::new(),
            product_info: Vec::new(),
            price_data: Vec::new(),
            review_data: Vec::new(),
            rating_data: Vec::new(),
            missing_data: BTreeSet::new(),
            current_step: String::new(),
            final_recommendation: None,
            started_at: Utc::now(),
        }
    }
}

/// Classified user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// The user wants product suggestions.
    #[default]
    Recommendation,
    /// The user wants specific products compared.
    Comparison,
}

impl Intent {
    /// Leniently parse a model's classification output.
    ///
    /// Handles clean one-word answers as well as chatty variants like
    /// "The intent is comparison.". Anything unrecognized falls back to
    /// [`Intent::Recommendation`].
    pub fn parse_lenient(output: &str) -> Self {
        let lowered = output.trim().to_lowercase();
        if lowered.contains("comparison") || lowered.contains("compare") {
            Intent::Comparison
        } else {
            Intent::Recommendation
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Recommendation => write!(f, "recommendation"),
            Intent::Comparison => write!(f, "comparison"),
        }
    }
}

// ============= Data Kinds =============

/// One category of external data a collector agent can gather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    /// Specification/overview snippets.
    ProductInfo,
    /// Store and price listings.
    PriceData,
    /// Classified review summaries.
    ReviewData,
    /// Platform ratings and review counts.
    RatingData,
}

impl DataKind {
    /// All kinds, in supervisor dispatch order.
    pub const ALL: [DataKind; 4] = [
        DataKind::ProductInfo,
        DataKind::PriceData,
        DataKind::ReviewData,
        DataKind::RatingData,
    ];
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::ProductInfo => "product_info",
            DataKind::PriceData => "price_data",
            DataKind::ReviewData => "review_data",
            DataKind::RatingData => "rating_data",
        };
        write!(f, "{name}")
    }
}

// ============= Collected Records =============

/// Specification snippets for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfoRecord {
    /// Product name the snippets belong to.
    pub product: String,
    /// Overview snippets, empty when the fetch found nothing.
    pub info: Vec<InfoSnippet>,
}

/// One search snippet describing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoSnippet {
    /// Title of the source page.
    pub title: String,
    /// The snippet text.
    pub snippet: String,
    /// Link to the source page.
    pub link: String,
}

/// Store/price listings for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Product name the listings belong to.
    pub product: String,
    /// Price listings, empty when the fetch found nothing.
    pub prices: Vec<PriceListing>,
}

/// One store listing for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListing {
    /// Store offering the product.
    pub store: String,
    /// Listing title as shown by the store.
    pub title: String,
    /// Displayed price, kept as text (currency formats vary by locale).
    pub price: String,
    /// Link to the listing.
    pub url: String,
}

/// Classified review summary for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Product name the reviews belong to.
    pub product: String,
    /// Classified positive/negative points.
    pub reviews: ReviewSummary,
}

/// Review points split by sentiment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Positive points, at most three.
    pub positive: Vec<String>,
    /// Negative points, at most three.
    pub negative: Vec<String>,
}

impl ReviewSummary {
    /// True when neither positive nor negative points were found.
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// Platform ratings for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    /// Product name the ratings belong to.
    pub product: String,
    /// Ratings across platforms, empty when the fetch found nothing.
    pub ratings: Vec<PlatformRating>,
}

/// Rating information from one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRating {
    /// Platform/store name.
    pub platform: String,
    /// Listing title on the platform.
    pub title: String,
    /// Star rating, absent when the platform shows none.
    pub rating: Option<f32>,
    /// Number of reviews behind the rating, absent when unknown.
    pub total_reviews: Option<u64>,
    /// Link to the platform listing.
    pub url: String,
}

// ============= Error Types =============

/// Error type for all fallible operations in the crate.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// External search API call failed.
    #[error("Search error: {0}")]
    Search(String),

    /// Language model call failed.
    #[error("LLM error: {0}")]
    Llm(String),

    /// A collector agent failed as a whole.
    #[error("Agent error: {0}")]
    Agent(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller provided invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_empty() {
        let state = PipelineState::new("best phone under 30000");
        assert_eq!(state.query, "best phone under 30000");
        assert_eq!(state.intent, Intent::Recommendation);
        assert!(state.products.is_empty());
        assert!(state.missing_data.is_empty());
        assert!(state.final_recommendation.is_none());
    }

    #[test]
    fn intent_parse_lenient_handles_chatty_output() {
        assert_eq!(Intent::parse_lenient("comparison"), Intent::Comparison);
        assert_eq!(Intent::parse_lenient("  Comparison.  "), Intent::Comparison);
        assert_eq!(
            Intent::parse_lenient("The user wants to compare products"),
            Intent::Comparison
        );
        assert_eq!(
            Intent::parse_lenient("recommendation"),
            Intent::Recommendation
        );
        assert_eq!(Intent::parse_lenient("gibberish"), Intent::Recommendation);
    }

    #[test]
    fn data_kind_display_is_snake_case() {
        assert_eq!(DataKind::ProductInfo.to_string(), "product_info");
        assert_eq!(DataKind::PriceData.to_string(), "price_data");
        assert_eq!(DataKind::ReviewData.to_string(), "review_data");
        assert_eq!(DataKind::RatingData.to_string(), "rating_data");
    }

    #[test]
    fn data_kind_all_is_dispatch_order() {
        assert_eq!(
            DataKind::ALL,
            [
                DataKind::ProductInfo,
                DataKind::PriceData,
                DataKind::ReviewData,
                DataKind::RatingData,
            ]
        );
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = PipelineState::new("compare iPhone 15 and Pixel 9");
        state.intent = Intent::Comparison;
        state.products = vec!["iPhone 15".to_string(), "Pixel 9".to_string()];
        state.price_data = vec![PriceRecord {
            product: "iPhone 15".to_string(),
            prices: vec![PriceListing {
                store: "BigMart".to_string(),
                title: "iPhone 15 128GB".to_string(),
                price: "$799".to_string(),
                url: "https://example.com/iphone".to_string(),
            }],
        }];

        let json = serde_json::to_string(&state).unwrap();
        let back: PipelineState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.intent, Intent::Comparison);
        assert_eq!(back.products, state.products);
        assert_eq!(back.price_data, state.price_data);
    }
}
