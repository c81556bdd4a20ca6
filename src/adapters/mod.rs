//! Adapters
//!
//! Inbound adapters present results; outbound adapters implement the
//! domain ports over HTTP.

pub mod inbound;
pub mod outbound;
