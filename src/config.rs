//! Engine configuration: track table and cue metadata table
//!
//! Both tables are static, load-time data parsed from TOML once at startup.
//! The track table defines the playback tracks (fade duration, loop flag,
//! output routing); the event table maps symbolic event identifiers to
//! {track, path, mode, volume}.

use crate::cue::PlayMode;
use crate::error::{Error, Result};
use crate::playback::fader::FadeCurve;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Track table, one entry per named track
    #[serde(default)]
    pub tracks: Vec<TrackConfig>,

    /// Symbolic event metadata table, keyed by event identifier
    #[serde(default)]
    pub events: HashMap<String, CueDef>,
}

/// Static configuration for one track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    pub name: String,

    /// Crossfade ramp duration in seconds
    #[serde(default = "default_fade_duration")]
    pub fade_duration_secs: f32,

    /// Whether sources on this track loop their clips
    #[serde(rename = "loop", default)]
    pub looping: bool,

    /// Output routing identifier handed to every source on this track
    #[serde(default)]
    pub route: String,

    /// Curve shape used by both fade-out and fade-in ramps
    #[serde(default)]
    pub fade_curve: FadeCurve,
}

/// Static metadata for one symbolic event identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueDef {
    /// Name of the track the cue plays on
    pub track: String,

    /// Loader path of the clip
    pub path: String,

    /// Transition mode
    pub mode: PlayMode,

    /// Target volume scale
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_fade_duration() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    1.0
}

impl EngineConfig {
    /// Parse and validate a TOML configuration string
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Check table consistency: unique track names, sane numeric ranges,
    /// and every cue referencing a track that exists.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for track in &self.tracks {
            if !names.insert(track.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate track name '{}'",
                    track.name
                )));
            }
            if track.fade_duration_secs < 0.0 {
                return Err(Error::Config(format!(
                    "track '{}' has negative fade duration",
                    track.name
                )));
            }
        }

        for (event_id, def) in &self.events {
            if !names.contains(def.track.as_str()) {
                return Err(Error::Config(format!(
                    "event '{}' references unknown track '{}'",
                    event_id, def.track
                )));
            }
            if def.volume < 0.0 {
                return Err(Error::Config(format!(
                    "event '{}' has negative volume",
                    event_id
                )));
            }
        }

        Ok(())
    }
}
