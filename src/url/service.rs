//! Static table of supported streaming services

use crate::config::{Config, ServiceOverride};
use crate::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Typed identifier of a supported service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceId {
    AppleMusic,
    Spotify,
}

impl ServiceId {
    pub const ALL: [ServiceId; 2] = [ServiceId::AppleMusic, ServiceId::Spotify];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppleMusic => "apple-music",
            Self::Spotify => "spotify",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a raw path token addresses on a given service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// A single track page
    Track,
    /// An album or playlist; a track when an item index is present
    Collection,
    /// A collection page that is only accepted with an item index
    ItemOnly,
}

/// Per-service rules for classification and title extraction
#[derive(Debug, Clone)]
pub struct ServiceProfile {
    pub id: ServiceId,
    pub hostname: String,
    /// Title pattern with `name` and `author` capture groups
    pub title_pattern: Regex,
    /// Index into `path.split('/')` holding the entity token
    pub entity_index: usize,
    pub entities: HashMap<String, EntityKind>,
}

impl ServiceProfile {
    /// Looks up a raw path token
    pub fn entity_kind(&self, token: &str) -> Option<EntityKind> {
        self.entities.get(token).copied()
    }

    fn apply(&mut self, service: &ServiceOverride) -> Result<(), ConfigError> {
        if let Some(hostname) = &service.hostname {
            self.hostname = hostname.to_lowercase();
        }
        if let Some(pattern) = &service.title_pattern {
            self.title_pattern = compile_title_pattern(pattern)?;
        }
        if let Some(index) = service.entity_index {
            self.entity_index = index;
        }
        if let Some(entities) = &service.entities {
            self.entities = entities.clone();
        }
        Ok(())
    }
}

// https://music.apple.com/es/song/the-morning-after/1020769483
// https://music.apple.com/es/album/vaporize/353032605?i=353032612
// https://music.apple.com/es/playlist/<name>/<id>
const APPLE_MUSIC_TITLE: &str =
    "\u{200e}(?P<name>.+) – Song by (?P<author>.+) – Apple\u{00a0}Music";

// https://open.spotify.com/track/18H0STg2CPkVKx0AqRsoLQ
// https://open.spotify.com/playlist/<id>
const SPOTIFY_TITLE: &str = r"(?P<name>.+) - song and lyrics by (?P<author>.+) \| Spotify";

fn builtin_profile(id: ServiceId) -> Result<ServiceProfile, ConfigError> {
    let (hostname, pattern, entity_index, track_token) = match id {
        ServiceId::AppleMusic => ("music.apple.com", APPLE_MUSIC_TITLE, 2, "song"),
        ServiceId::Spotify => ("open.spotify.com", SPOTIFY_TITLE, 1, "track"),
    };

    let entities = HashMap::from([
        (track_token.to_string(), EntityKind::Track),
        ("album".to_string(), EntityKind::Collection),
        ("playlist".to_string(), EntityKind::Collection),
    ]);

    Ok(ServiceProfile {
        id,
        hostname: hostname.to_string(),
        title_pattern: compile_title_pattern(pattern)?,
        entity_index,
        entities,
    })
}

/// Compiles a title pattern, requiring `name` and `author` groups
pub fn compile_title_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    let regex = Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;

    for group in ["name", "author"] {
        if !regex.capture_names().flatten().any(|n| n == group) {
            return Err(ConfigError::InvalidPattern(format!(
                "'{}' has no '{}' capture group",
                pattern, group
            )));
        }
    }

    Ok(regex)
}

/// Read-only set of service profiles, built once at startup
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    apple_music: ServiceProfile,
    spotify: ServiceProfile,
}

impl ServiceRegistry {
    /// Creates the registry with the built-in profiles
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self {
            apple_music: builtin_profile(ServiceId::AppleMusic)?,
            spotify: builtin_profile(ServiceId::Spotify)?,
        })
    }

    /// Creates the registry with configuration overrides applied
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut registry = Self::builtin()?;
        for service in &config.services {
            registry.profile_mut(service.id).apply(service)?;
        }
        Ok(registry)
    }

    pub fn profile(&self, id: ServiceId) -> &ServiceProfile {
        match id {
            ServiceId::AppleMusic => &self.apple_music,
            ServiceId::Spotify => &self.spotify,
        }
    }

    fn profile_mut(&mut self, id: ServiceId) -> &mut ServiceProfile {
        match id {
            ServiceId::AppleMusic => &mut self.apple_music,
            ServiceId::Spotify => &mut self.spotify,
        }
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ServiceProfile> {
        ServiceId::ALL.into_iter().map(move |id| self.profile(id))
    }

    /// Finds the profile whose hostname matches exactly
    pub fn by_hostname(&self, host: &str) -> Option<&ServiceProfile> {
        self.profiles().find(|p| p.hostname == host)
    }

    /// Hostnames of all supported services, for diagnostics
    pub fn hostnames(&self) -> Vec<&str> {
        self.profiles().map(|p| p.hostname.as_str()).collect()
    }
}
