//! Resolver coordinator - URL to video orchestration
//!
//! This module ties the pipeline together:
//! - Classifying the input URL
//! - Fetching the service page and extracting a track or member links
//! - Fanning out over collection members with bounded concurrency
//! - Searching a video for every resolved track

use crate::config::{Config, ResolverConfig};
use crate::resolver::fetcher::{build_http_client, fetch_document};
use crate::resolver::parser::{member_links_from_body, track_from_body};
use crate::resolver::scheduler::Scheduler;
use crate::resolver::{CollectionReport, MemberOutcome, Resolution};
use crate::search::{SearchCache, SearchClient};
use crate::track::Track;
use crate::url::{classify, ClassifiedUrl, EntityType, ServiceRegistry};
use crate::{ClassifyError, ResolveError, SongbridgeError};
use reqwest::Client;
use std::sync::Arc;

/// Resolves music URLs into tracks and videos
///
/// Cloning is cheap; clones share the service table, HTTP client and search
/// cache.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<ServiceRegistry>,
    client: Client,
    search: SearchClient,
    settings: ResolverConfig,
}

impl Resolver {
    /// Creates a resolver with a fresh search cache
    pub fn new(config: Config) -> Result<Self, SongbridgeError> {
        Self::with_cache(config, Arc::new(SearchCache::new()))
    }

    /// Creates a resolver that shares an existing search cache
    pub fn with_cache(config: Config, cache: Arc<SearchCache>) -> Result<Self, SongbridgeError> {
        let registry = ServiceRegistry::from_config(&config)?;
        let client = build_http_client(&config.http)?;
        let search = SearchClient::new(client.clone(), config.search, cache);

        Ok(Self {
            registry: Arc::new(registry),
            client,
            search,
            settings: config.resolver,
        })
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn search_client(&self) -> &SearchClient {
        &self.search
    }

    pub fn cache(&self) -> &Arc<SearchCache> {
        self.search.cache()
    }

    /// Classifies a raw URL without touching the network
    pub fn classify(&self, raw: &str) -> Result<ClassifiedUrl, ClassifyError> {
        classify(raw, &self.registry)
    }

    /// Resolves a single-track URL to its track
    ///
    /// Collection URLs are rejected with `ResolveError::WrongEntity`; they
    /// never fan out from here.
    pub async fn resolve(&self, raw: &str) -> Result<Track, ResolveError> {
        let classified = self.classify(raw)?;
        self.resolve_classified(&classified).await
    }

    async fn resolve_classified(&self, classified: &ClassifiedUrl) -> Result<Track, ResolveError> {
        if classified.entity_type != EntityType::Track {
            return Err(ResolveError::WrongEntity {
                url: classified.url.to_string(),
                expected: EntityType::Track.as_str(),
            });
        }

        let body = fetch_document(&self.client, &classified.url).await?;
        let pattern = &self.registry.profile(classified.service).title_pattern;

        let track = track_from_body(&body, pattern).map_err(|source| ResolveError::Extract {
            url: classified.url.to_string(),
            source,
        })?;

        tracing::debug!("Parsed song info: {}", track);
        Ok(track)
    }

    /// Resolves and searches up to `limit` members of a collection URL
    ///
    /// Failures of individual members are recorded in their outcome and never
    /// abort siblings. Only classification or fetch failures of the collection
    /// page itself are returned as errors.
    pub async fn resolve_collection(
        &self,
        raw: &str,
        limit: usize,
    ) -> Result<CollectionReport, ResolveError> {
        let classified = self.classify(raw)?;
        self.resolve_classified_collection(&classified, limit).await
    }

    async fn resolve_classified_collection(
        &self,
        classified: &ClassifiedUrl,
        limit: usize,
    ) -> Result<CollectionReport, ResolveError> {
        if classified.entity_type != EntityType::Collection {
            return Err(ResolveError::WrongEntity {
                url: classified.url.to_string(),
                expected: EntityType::Collection.as_str(),
            });
        }

        let body = fetch_document(&self.client, &classified.url).await?;
        let links = member_links_from_body(&body, limit);
        tracing::info!(
            "Found {} member links (limit {}) in {}",
            links.len(),
            limit,
            classified.url
        );

        let scheduler = Scheduler::new(limit, self.settings.sequential);
        let slots = scheduler
            .run(links.clone(), |url| {
                let resolver = self.clone();
                async move { resolver.resolve_member(url).await }
            })
            .await;

        let outcomes = slots
            .into_iter()
            .zip(links)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| MemberOutcome::Unresolved {
                    error: ResolveError::Incomplete { url: url.clone() },
                    url,
                })
            })
            .collect();

        Ok(CollectionReport {
            source: classified.url.clone(),
            outcomes,
        })
    }

    /// Resolves one collection member end to end
    async fn resolve_member(&self, url: String) -> MemberOutcome {
        let track = match self.resolve(&url).await {
            Ok(track) => track,
            Err(error) => {
                tracing::warn!("Couldn't extract song info: {}", error);
                return MemberOutcome::Unresolved { url, error };
            }
        };

        match self.search.search(&track).await {
            Ok(video) => {
                tracing::debug!("Found {} for {}", video, track);
                MemberOutcome::Found { track, video }
            }
            Err(error) => {
                tracing::warn!("Search failed for {}: {}", track, error);
                MemberOutcome::NotFound { track, error }
            }
        }
    }

    /// Resolves any supported URL, dispatching on its entity type
    ///
    /// A single track is searched directly and any failure is terminal. A
    /// collection fans out to at most the configured limit.
    pub async fn run(&self, raw: &str) -> Result<Resolution, SongbridgeError> {
        let classified = self.classify(raw).map_err(ResolveError::from)?;

        match classified.entity_type {
            EntityType::Track => {
                let track = self.resolve_classified(&classified).await?;
                let video = self.search.search(&track).await?;
                tracing::debug!("Found {} for {}", video, track);
                Ok(Resolution::Track { track, video })
            }
            EntityType::Collection => {
                let report = self
                    .resolve_classified_collection(&classified, self.settings.fan_out_limit)
                    .await?;
                Ok(Resolution::Collection(report))
            }
        }
    }
}
