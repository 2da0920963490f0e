//! Video search module
//!
//! This module maps a track to a video on the search platform, memoizing
//! results by search phrase in a cache shared across concurrent resolutions.

mod cache;
mod client;

pub use cache::SearchCache;
pub use client::{SearchClient, VideoMatch};
