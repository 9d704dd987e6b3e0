//! Collector agents.
//!
//! Each agent gathers exactly one category of external data for the candidate
//! products and returns it as a value; it never writes to shared state. The
//! supervisor owns scheduling, snapshotting, and the merge back into
//! [`PipelineState`](crate::types::PipelineState).

pub mod price;
pub mod product_info;
pub mod rating;
pub mod review;

use crate::types::{
    DataKind, PipelineState, PriceRecord, ProductInfoRecord, RatingRecord, Result, ReviewRecord,
};
use async_trait::async_trait;

pub use price::PriceAgent;
pub use product_info::ProductInfoAgent;
pub use rating::RatingAgent;
pub use review::ReviewAgent;

/// Maximum number of products a collector agent processes per run.
pub const MAX_PRODUCTS_PER_RUN: usize = 3;

/// Data produced by one collector agent run.
///
/// One variant per pipeline state field, so concurrent agents are
/// write-disjoint by construction.
#[derive(Debug, Clone)]
pub enum CollectedData {
    /// Payload for `product_info`.
    ProductInfo(Vec<ProductInfoRecord>),
    /// Payload for `price_data`.
    Prices(Vec<PriceRecord>),
    /// Payload for `review_data`.
    Reviews(Vec<ReviewRecord>),
    /// Payload for `rating_data`.
    Ratings(Vec<RatingRecord>),
}

impl CollectedData {
    /// The data kind this payload belongs to.
    pub fn kind(&self) -> DataKind {
        match self {
            CollectedData::ProductInfo(_) => DataKind::ProductInfo,
            CollectedData::Prices(_) => DataKind::PriceData,
            CollectedData::Reviews(_) => DataKind::ReviewData,
            CollectedData::Ratings(_) => DataKind::RatingData,
        }
    }
}

/// Result of a successful collector run.
#[derive(Debug, Clone)]
pub struct AgentOutput {
    /// The collected records.
    pub data: CollectedData,
    /// Human-readable description of what the agent did.
    pub step: String,
}

/// A component that retrieves one category of external data.
///
/// Implementations read the state snapshot they are given and must not
/// assume they can observe other agents' writes; the supervisor hands each
/// concurrent agent an independent snapshot.
#[async_trait]
pub trait CollectorAgent: Send + Sync {
    /// Stable agent name, used in status and error messages.
    fn name(&self) -> &str;

    /// The single data kind this agent owns.
    fn kind(&self) -> DataKind;

    /// Collect data for the products in `state`.
    async fn collect(&self, state: &PipelineState) -> Result<AgentOutput>;
}

/// The products an agent should process: the first
/// [`MAX_PRODUCTS_PER_RUN`] distinct names, in order.
///
/// Skipping duplicates preserves the one-record-per-product invariant on the
/// collected sequences.
pub(crate) fn target_products(products: &[String]) -> Vec<&str> {
    let mut seen = Vec::new();
    for product in products {
        let name = product.trim();
        if name.is_empty() || seen.contains(&name) {
            continue;
        }
        seen.push(name);
        if seen.len() == MAX_PRODUCTS_PER_RUN {
            break;
        }
    }
    seen
}
