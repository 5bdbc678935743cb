//! Follower aggregation and statistics.
//!
//! This module turns fetched profiles into per-figure tallies and provides
//! summary helpers over a batch of tallies.

use crate::models::{FetchedProfiles, FollowerTotals, Platform};
use serde::Serialize;

/// Follower counts for one figure, broken down by platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FigureTally {
    pub name: String,
    /// Count per platform that was queried, in aggregation order.
    #[serde(rename = "platforms", serialize_with = "crate::models::serialize_platform_counts")]
    pub counts: Vec<(Platform, u64)>,
    pub total: u64,
}

impl FigureTally {
    /// Extract follower counts from each fetched profile and sum them.
    pub fn from_profiles(name: &str, profiles: &FetchedProfiles) -> Self {
        let counts: Vec<(Platform, u64)> = profiles
            .iter()
            .map(|(platform, record)| (platform, record.followers()))
            .collect();
        let total = counts
            .iter()
            .fold(0u64, |sum, (_, count)| sum.saturating_add(*count));

        Self {
            name: name.to_string(),
            counts,
            total,
        }
    }

    /// Count for one platform, `None` if it was not queried.
    pub fn count(&self, platform: Platform) -> Option<u64> {
        self.counts
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, count)| *count)
    }
}

/// Figures sorted by total, highest first. Ties keep their original order.
pub fn rank_by_total(totals: &FollowerTotals) -> Vec<(&str, u64)> {
    let mut ranked: Vec<_> = totals.iter().collect();
    ranked.sort_by_key(|(_, total)| std::cmp::Reverse(*total));
    ranked
}

/// Sum of followers per platform across all tallies, in aggregation order.
///
/// Platforms no tally queried are omitted.
pub fn platform_totals(tallies: &[FigureTally]) -> Vec<(Platform, u64)> {
    Platform::ALL
        .into_iter()
        .filter_map(|platform| {
            let counts: Vec<u64> = tallies.iter().filter_map(|t| t.count(platform)).collect();
            (!counts.is_empty())
                .then(|| (platform, counts.into_iter().fold(0u64, u64::saturating_add)))
        })
        .collect()
}
