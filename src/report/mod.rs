//! Follower comparison reports.

pub mod generator;

pub use generator::{build_report, generate_json_report, generate_text_report};

use crate::analysis::FigureTally;
use crate::models::{FollowerTotals, Platform};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where the profiles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Bundled fixture connectors.
    Demo,
    /// Real platform APIs.
    Live,
}

/// Metadata about the comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub mode: RunMode,
    /// Number of distinct figure names in the totals.
    pub figures_compared: usize,
    /// Platforms with a configured connector.
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedFigure {
    pub rank: usize,
    pub name: String,
    pub total: u64,
}

/// The complete comparison report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub totals: FollowerTotals,
    pub ranking: Vec<RankedFigure>,
    #[serde(serialize_with = "crate::models::serialize_platform_counts")]
    pub platform_totals: Vec<(Platform, u64)>,
    pub figures: Vec<FigureTally>,
}
