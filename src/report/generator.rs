//! Report generation.
//!
//! Renders follower totals either as the plain per-figure lines or as a
//! JSON document with the per-platform breakdown.

use super::{RankedFigure, Report, ReportMetadata, RunMode};
use crate::analysis::{platform_totals, rank_by_total, FigureTally};
use crate::models::{FollowerTotals, Platform};
use anyhow::Result;
use chrono::Utc;

/// Assemble a report from the totals and the tallies they were folded from.
pub fn build_report(
    mode: RunMode,
    platforms: Vec<Platform>,
    totals: FollowerTotals,
    figures: Vec<FigureTally>,
) -> Report {
    let ranking = rank_by_total(&totals)
        .into_iter()
        .enumerate()
        .map(|(i, (name, total))| RankedFigure {
            rank: i + 1,
            name: name.to_string(),
            total,
        })
        .collect();

    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        mode,
        figures_compared: totals.len(),
        platforms,
    };

    Report {
        metadata,
        platform_totals: platform_totals(&figures),
        totals,
        ranking,
        figures,
    }
}

/// One line per figure: `"{name}: {total} seguidores totales"`.
pub fn generate_text_report(totals: &FollowerTotals) -> String {
    let mut output = String::new();
    for (name, total) in totals.iter() {
        output.push_str(&format_total_line(name, total));
        output.push('\n');
    }
    output
}

fn format_total_line(name: &str, total: u64) -> String {
    format!("{}: {} seguidores totales", name, total)
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
