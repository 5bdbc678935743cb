//! Analysis modules.
//!
//! The platform fetches profiles and the aggregator turns them into
//! follower tallies.

pub mod aggregator;
pub mod platform;

pub use aggregator::*;
pub use platform::AnalysisPlatform;
