//! Platform registry and resolution
//!
//! A [`Platform`] identifies one regional shard of the upstream API. Every
//! endpoint resolves its optional `platform` tag through [`resolve_platform`]
//! before anything else happens, so an unknown tag (or a missing tag with no
//! configured default) is always rejected before a query is built.

use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Platform
// =============================================================================

/// Regional shard of the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Brazil,
    EuropeNorthEast,
    EuropeWest,
    Japan,
    Korea,
    LatinAmericaNorth,
    LatinAmericaSouth,
    NorthAmerica,
    Oceania,
    Turkey,
    Russia,
    PublicBetaEnvironment,
}

impl Platform {
    pub fn all() -> &'static [Platform] {
        &[
            Platform::Brazil,
            Platform::EuropeNorthEast,
            Platform::EuropeWest,
            Platform::Japan,
            Platform::Korea,
            Platform::LatinAmericaNorth,
            Platform::LatinAmericaSouth,
            Platform::NorthAmerica,
            Platform::Oceania,
            Platform::Turkey,
            Platform::Russia,
            Platform::PublicBetaEnvironment,
        ]
    }

    /// Platform tag as used in upstream host names (e.g. `NA1`)
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Brazil => "BR1",
            Platform::EuropeNorthEast => "EUN1",
            Platform::EuropeWest => "EUW1",
            Platform::Japan => "JP1",
            Platform::Korea => "KR",
            Platform::LatinAmericaNorth => "LA1",
            Platform::LatinAmericaSouth => "LA2",
            Platform::NorthAmerica => "NA1",
            Platform::Oceania => "OC1",
            Platform::Turkey => "TR1",
            Platform::Russia => "RU",
            Platform::PublicBetaEnvironment => "PBE1",
        }
    }

    /// Short region code (e.g. `NA`)
    pub fn region(&self) -> &'static str {
        match self {
            Platform::Brazil => "BR",
            Platform::EuropeNorthEast => "EUNE",
            Platform::EuropeWest => "EUW",
            Platform::Japan => "JP",
            Platform::Korea => "KR",
            Platform::LatinAmericaNorth => "LAN",
            Platform::LatinAmericaSouth => "LAS",
            Platform::NorthAmerica => "NA",
            Platform::Oceania => "OCE",
            Platform::Turkey => "TR",
            Platform::Russia => "RU",
            Platform::PublicBetaEnvironment => "PBE",
        }
    }

    /// Look up a platform by tag or region code, ignoring case
    pub fn with_tag(tag: &str) -> Option<Platform> {
        let tag = tag.trim();
        Platform::all()
            .iter()
            .copied()
            .find(|p| p.tag().eq_ignore_ascii_case(tag) || p.region().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.region())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::with_tag(s).ok_or_else(|| {
            format!(
                "Unknown platform '{}'. Valid platforms: {}",
                s,
                Platform::all()
                    .iter()
                    .map(|p| p.tag())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

impl Serialize for Platform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.region())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Platform::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Source of platform reference data
pub trait PlatformRegistry: Send + Sync {
    /// Find the platform registered under `tag`
    fn lookup_platform(&self, tag: &str) -> Option<Platform>;

    /// The process-wide default platform, if one is configured
    fn default_platform(&self) -> Option<Platform>;
}

/// Registry backed by the built-in [`Platform`] table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticPlatformRegistry {
    default: Option<Platform>,
}

impl StaticPlatformRegistry {
    pub fn new(default: Option<Platform>) -> Self {
        Self { default }
    }

    pub fn with_default(default: Platform) -> Self {
        Self::new(Some(default))
    }
}

impl PlatformRegistry for StaticPlatformRegistry {
    fn lookup_platform(&self, tag: &str) -> Option<Platform> {
        Platform::with_tag(tag)
    }

    fn default_platform(&self) -> Option<Platform> {
        self.default
    }
}

/// Resolve an optional platform tag against `registry`.
///
/// An absent tag falls back to the registry default. Fails with
/// [`GatewayError::InvalidPlatform`] for unknown tags and when no tag is
/// given and no default exists.
pub fn resolve_platform(
    registry: &dyn PlatformRegistry,
    tag: Option<&str>,
) -> GatewayResult<Platform> {
    let resolved = match tag {
        Some(tag) => registry.lookup_platform(tag),
        None => registry.default_platform(),
    };

    resolved.ok_or_else(|| GatewayError::InvalidPlatform {
        tag: tag.map(str::to_string),
    })
}

// =============================================================================
// Tests
// =============================================================================
