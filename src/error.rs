//! Run-level error taxonomy
//!
//! Per-candidate and per-block problems (malformed JSON-LD, unresolvable
//! hrefs) are absorbed where they occur; only total transport exhaustion or
//! a fully empty pipeline surfaces as a run failure.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The request carried a blank site identifier.
    #[error("no target site provided")]
    EmptyTarget,

    /// Every retrieval path errored, returned a non-success status, or
    /// returned a body that failed validation.
    #[error("all retrieval paths failed for {target}")]
    TransportExhausted { target: String },

    /// The overall run deadline expired while a fetch was in flight.
    #[error("scrape deadline of {limit:?} exceeded")]
    DeadlineExceeded { limit: Duration },

    /// Markup was retrieved but no stage recognized any products.
    #[error("no product candidates found in page")]
    NoCandidates,
}
