//! Build configuration and daemon communication settings.

use crate::error::{GantryError, Result};
use crate::types::LayerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the daemon communication timeout, in seconds.
pub const TIMEOUT_ENV: &str = "DOCKER_TIMEOUT";

/// Default daemon connection timeout: 10 minutes.
///
/// It needs to be high enough to allow the daemon to export the image for
/// squashing.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Build configuration consumed by the engine.
///
/// The first tag is the primary (build-time) tag; the remainder are applied
/// after a successful build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub tags: Vec<String>,
    /// Pull newer versions of the base image before building.
    #[serde(default)]
    pub pull: bool,
    /// Layer below which history is preserved uncompacted during squashing.
    #[serde(default)]
    pub base: Option<LayerId>,
    /// Skip the post-build squash step entirely.
    #[serde(default)]
    pub no_squash: bool,
}

impl BuildConfig {
    /// The primary (build-time) tag.
    ///
    /// Every build requires one; an empty tag list is a configuration error.
    pub fn primary_tag(&self) -> Result<&str> {
        self.tags
            .first()
            .map(String::as_str)
            .filter(|tag| !tag.is_empty())
            .ok_or(GantryError::MissingPrimaryTag)
    }

    /// Secondary tags, applied in request order after a successful build.
    pub fn secondary_tags(&self) -> &[String] {
        if self.tags.len() > 1 {
            &self.tags[1..]
        } else {
            &[]
        }
    }
}

/// Daemon communication timeout, read from [`TIMEOUT_ENV`].
pub fn daemon_timeout() -> Result<Duration> {
    parse_timeout(std::env::var(TIMEOUT_ENV).ok())
}

fn parse_timeout(raw: Option<String>) -> Result<Duration> {
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
    };

    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|_| GantryError::InvalidTimeout { value: raw.clone() })?;

    if secs <= 0 {
        return Err(GantryError::InvalidTimeout { value: raw });
    }

    Ok(Duration::from_secs(secs as u64))
}
