//! URL handling module for Songbridge
//!
//! This module provides URL sanitization and normalization, the table of
//! supported services, and classification of a raw URL into a service and
//! entity type.

mod normalize;
mod service;

use crate::ClassifyError;
use url::Url;

// Re-export main functions
pub use normalize::{item_index, normalize_url, sanitize, ITEM_INDEX_PARAM, LOCALE, LOCALE_PARAM};
pub use service::{compile_title_pattern, EntityKind, ServiceId, ServiceProfile, ServiceRegistry};

/// Whether a URL addresses one track or many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// A single track, possibly addressed inside a collection
    Track,
    /// An album or playlist
    Collection,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Collection => "collection",
        }
    }
}

/// A URL recognized as belonging to a supported service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedUrl {
    pub service: ServiceId,
    pub entity_type: EntityType,
    /// URL with the normalized query, ready to fetch
    pub url: Url,
}

/// Classifies a raw URL against the supported services
///
/// The entity token is the path segment at the service's configured index:
///
/// | Token kind   | Item index | Result                 |
/// |--------------|------------|------------------------|
/// | `Track`      | any        | `Track`                |
/// | `Collection` | absent     | `Collection`           |
/// | `Collection` | present    | `Track`                |
/// | `ItemOnly`   | absent     | `AmbiguousEntity`      |
/// | `ItemOnly`   | present    | `Track`                |
/// | unknown      | any        | `UnsupportedEntityType`|
///
/// No network I/O happens here.
///
/// # Examples
///
/// ```
/// use songbridge::url::{classify, EntityType, ServiceId, ServiceRegistry};
///
/// let registry = ServiceRegistry::builtin().unwrap();
/// let classified = classify(
///     "https://music.apple.com/es/album/vaporize/353032605?i=353032612",
///     &registry,
/// )
/// .unwrap();
/// assert_eq!(classified.service, ServiceId::AppleMusic);
/// assert_eq!(classified.entity_type, EntityType::Track);
/// ```
pub fn classify(raw: &str, registry: &ServiceRegistry) -> Result<ClassifiedUrl, ClassifyError> {
    tracing::debug!("Classifying {}", raw);
    let url = normalize_url(raw)?;

    let host = url.host_str().unwrap_or_default();
    let profile = registry.by_hostname(host).ok_or_else(|| {
        tracing::debug!("Unsupported host {}, supported: {:?}", host, registry.hostnames());
        ClassifyError::UnsupportedService(host.to_string())
    })?;

    let token = url
        .path()
        .split('/')
        .nth(profile.entity_index)
        .unwrap_or_default();

    let has_item = item_index(&url).is_some();
    let entity_type = match (profile.entity_kind(token), has_item) {
        (Some(EntityKind::Track), _) => EntityType::Track,
        (Some(EntityKind::Collection), false) => EntityType::Collection,
        (Some(EntityKind::Collection | EntityKind::ItemOnly), true) => EntityType::Track,
        (Some(EntityKind::ItemOnly), false) => {
            return Err(ClassifyError::AmbiguousEntity {
                service: profile.id.to_string(),
                token: token.to_string(),
            })
        }
        (None, _) => {
            return Err(ClassifyError::UnsupportedEntityType {
                service: profile.id.to_string(),
                token: token.to_string(),
            })
        }
    };

    tracing::debug!(
        "Detected {} {} ({})",
        profile.id,
        entity_type.as_str(),
        token
    );

    Ok(ClassifiedUrl {
        service: profile.id,
        entity_type,
        url,
    })
}
