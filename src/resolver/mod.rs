//! Resolver module for turning music URLs into videos
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching of service pages
//! - Metadata extraction from the parsed page
//! - Bounded fan-out over collection members
//! - Overall resolution coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::Resolver;
pub use fetcher::{build_http_client, fetch_document};
pub use parser::{
    child_elements, children_matching, extract_member_links, extract_track, first_child_element,
    member_links_from_body, parse_document, track_from_body,
};
pub use scheduler::Scheduler;

use crate::search::VideoMatch;
use crate::track::Track;
use crate::{ResolveError, SearchError};
use std::collections::BTreeMap;
use url::Url;

/// Result of resolving one collection member
#[derive(Debug)]
pub enum MemberOutcome {
    /// Track resolved and a video found
    Found { track: Track, video: VideoMatch },
    /// Track resolved but the search failed
    NotFound { track: Track, error: SearchError },
    /// The member page couldn't be resolved to a track
    Unresolved { url: String, error: ResolveError },
}

impl MemberOutcome {
    /// Label under which the outcome is reported
    ///
    /// Known tracks use their search phrase; unresolved members fall back to
    /// their URL.
    pub fn label(&self) -> String {
        match self {
            Self::Found { track, .. } | Self::NotFound { track, .. } => track.search_phrase(),
            Self::Unresolved { url, .. } => url.clone(),
        }
    }

    pub fn track(&self) -> Option<&Track> {
        match self {
            Self::Found { track, .. } | Self::NotFound { track, .. } => Some(track),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn video(&self) -> Option<&VideoMatch> {
        match self {
            Self::Found { video, .. } => Some(video),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Outcomes for the members of one collection, in member order
#[derive(Debug)]
pub struct CollectionReport {
    /// Normalized collection URL
    pub source: Url,
    pub outcomes: Vec<MemberOutcome>,
}

impl CollectionReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of members with a video
    pub fn found(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_found()).count()
    }

    /// Outcomes keyed by label
    ///
    /// Members resolving to the same track share a label; the later member
    /// wins.
    pub fn by_label(&self) -> BTreeMap<String, &MemberOutcome> {
        self.outcomes.iter().map(|o| (o.label(), o)).collect()
    }
}

/// Final result of resolving a URL
#[derive(Debug)]
pub enum Resolution {
    Track { track: Track, video: VideoMatch },
    Collection(CollectionReport),
}
