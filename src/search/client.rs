use crate::config::SearchConfig;
use crate::search::SearchCache;
use crate::track::Track;
use crate::SearchError;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// A video found for a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMatch {
    pub url: String,
    /// Served from the cache rather than a fresh upstream query
    pub cached: bool,
}

impl fmt::Display for VideoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cached {
            write!(f, "{} [cached]", self.url)
        } else {
            f.write_str(&self.url)
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

/// Maps tracks to videos through the search API, memoizing by search phrase
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    config: SearchConfig,
    cache: Arc<SearchCache>,
}

impl SearchClient {
    pub fn new(client: Client, config: SearchConfig, cache: Arc<SearchCache>) -> Self {
        Self {
            client,
            config,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<SearchCache> {
        &self.cache
    }

    /// Finds the best matching video for a track
    ///
    /// # Flow
    ///
    /// 1. Build the search phrase; it is also the cache key
    /// 2. Return a cache hit, marked as cached
    /// 3. Read the API key from the configured environment variable
    /// 4. Query for a single video and take the first item
    /// 5. Cache the watch URL, then return it
    ///
    /// # Returns
    ///
    /// * `Ok(VideoMatch)` - Found (or cached) video
    /// * `Err(SearchError::MissingCredential)` - API key variable not set
    /// * `Err(SearchError::Upstream)` - Transport, timeout, status or decode failure
    /// * `Err(SearchError::NoMatch)` - Query returned no video
    pub async fn search(&self, track: &Track) -> Result<VideoMatch, SearchError> {
        let phrase = track.search_phrase();

        if let Some(url) = self.cache.get(&phrase) {
            tracing::debug!("Cache hit for {}", phrase);
            return Ok(VideoMatch { url, cached: true });
        }

        let api_key = std::env::var(&self.config.api_key_env)
            .map_err(|_| SearchError::MissingCredential(self.config.api_key_env.clone()))?;

        tracing::debug!("Searching videos for {}", phrase);
        let response: SearchResponse = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("key", api_key.as_str()),
                ("part", "id"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", phrase.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let video_id = response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id.video_id)
            .ok_or_else(|| SearchError::NoMatch(phrase.clone()))?;

        let url = format!("{}{}", self.config.watch_url, video_id);
        self.cache.insert(phrase, url.clone());

        Ok(VideoMatch { url, cached: false })
    }
}
