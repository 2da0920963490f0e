//! Output module for rendering resolution results
//!
//! This module handles:
//! - Rendering a single track's video link
//! - Rendering collection outcomes as label/link blocks
//! - Summarizing how many members were found

use crate::resolver::{CollectionReport, MemberOutcome, Resolution};
use std::fmt::Write;

/// Placeholder printed for members without a video
pub const MISSING: &str = "-";

/// Renders a resolution for the terminal
///
/// A single track renders as its video link. A collection renders one block
/// per label, in label order:
///
/// ```text
///
/// "Song A" by "Artist B":
/// https://youtube.com/watch?v=...
/// ```
///
/// Members without a video render as `-`.
pub fn render(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Track { video, .. } => format!("{}\n", video),
        Resolution::Collection(report) => render_collection(report),
    }
}

/// Renders the outcome blocks of a collection
pub fn render_collection(report: &CollectionReport) -> String {
    let mut out = String::new();
    for (label, outcome) in report.by_label() {
        // Writing to a String can't fail
        let _ = write!(out, "\n{}:\n{}\n", label, render_link(outcome));
    }
    out
}

fn render_link(outcome: &MemberOutcome) -> String {
    match outcome.video() {
        Some(video) => video.to_string(),
        None => MISSING.to_string(),
    }
}

/// One-line summary of a collection report
pub fn summary_line(report: &CollectionReport) -> String {
    let unresolved = report
        .outcomes
        .iter()
        .filter(|o| o.track().is_none())
        .count();

    format!(
        "{} members: {} found, {} not found, {} unresolved",
        report.len(),
        report.found(),
        report.len() - report.found() - unresolved,
        unresolved
    )
}
