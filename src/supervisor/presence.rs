//! Data presence classification.
//!
//! A data kind counts as present only when at least one collected record
//! carries non-empty payload content. A wrapper record whose payload is empty
//! (the agent ran but found nothing) still counts as missing, so the
//! supervisor can retry or report accurately.

use crate::types::{
    DataKind, PipelineState, PriceRecord, ProductInfoRecord, RatingRecord, ReviewRecord,
};

/// A collected record whose payload can be inspected for content.
pub trait RecordPayload {
    /// True when the record carries any usable payload.
    fn has_payload(&self) -> bool;
}

impl RecordPayload for ProductInfoRecord {
    fn has_payload(&self) -> bool {
        !self.info.is_empty()
    }
}

impl RecordPayload for PriceRecord {
    fn has_payload(&self) -> bool {
        !self.prices.is_empty()
    }
}

impl RecordPayload for ReviewRecord {
    fn has_payload(&self) -> bool {
        !self.reviews.is_empty()
    }
}

impl RecordPayload for RatingRecord {
    fn has_payload(&self) -> bool {
        !self.ratings.is_empty()
    }
}

/// True when the collection contains at least one record with payload
/// content.
///
/// Policy: any single populated entry satisfies presence, even when other
/// products have no entry yet. Pure and total.
pub fn has_data<T: RecordPayload>(records: &[T]) -> bool {
    records.iter().any(RecordPayload::has_payload)
}

/// Apply the presence classifier to the state field owned by `kind`.
pub fn kind_present(state: &PipelineState, kind: DataKind) -> bool {
    match kind {
        DataKind::ProductInfo => has_data(&state.product_info),
        DataKind::PriceData => has_data(&state.price_data),
        DataKind::ReviewData => has_data(&state.review_data),
        DataKind::RatingData => has_data(&state.rating_data),
    }
}
