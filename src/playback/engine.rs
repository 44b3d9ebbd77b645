//! Engine facade: owns the named tracks and resolves symbolic event ids
//!
//! Constructed once at startup from the configuration tables; callers hold a
//! reference to the engine rather than reaching a global. `send_event` is the
//! sole public trigger for playback.

use crate::clip::ClipLoader;
use crate::config::{CueDef, EngineConfig};
use crate::cue::Cue;
use crate::device::AudioBackend;
use crate::error::{Error, Result};
use crate::events::{EngineEvent, EventHub};
use crate::playback::track::Track;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Track registry and cue dispatch facade
pub struct AudioEngine {
    tracks: HashMap<String, Arc<Track>>,
    cues: HashMap<String, CueDef>,
    backend: Arc<dyn AudioBackend>,
    events: EventHub,
}

impl AudioEngine {
    /// Build the engine from its configuration tables.
    ///
    /// Every track in the table is created up front and owned by the engine
    /// until [`shutdown`](Self::shutdown).
    pub fn new(
        config: EngineConfig,
        backend: Arc<dyn AudioBackend>,
        loader: Arc<dyn ClipLoader>,
    ) -> Result<Self> {
        config.validate()?;

        let events = EventHub::new();
        let mut tracks = HashMap::new();
        for track_config in &config.tracks {
            info!(
                track = %track_config.name,
                fade_secs = track_config.fade_duration_secs,
                looping = track_config.looping,
                "creating track"
            );
            tracks.insert(
                track_config.name.clone(),
                Arc::new(Track::new(
                    track_config,
                    Arc::clone(&backend),
                    Arc::clone(&loader),
                    events.clone(),
                )),
            );
        }

        Ok(Self {
            tracks,
            cues: config.events,
            backend,
            events,
        })
    }

    /// Fire-and-forget playback trigger; the sole public way to start sound.
    ///
    /// Unknown event ids and unknown tracks are logged and dropped; they
    /// never disturb other tracks' ticket sequences. Callers that want the
    /// resolution failure use [`try_send_event`](Self::try_send_event).
    pub fn send_event(&self, event_id: &str) {
        if let Err(err) = self.try_send_event(event_id) {
            warn!(event_id, error = %err, "dropping event");
            self.events.emit(EngineEvent::CueDropped {
                event_id: event_id.to_string(),
                reason: err.to_string(),
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Resolve an event id and dispatch its cue, reporting resolution
    /// failures to the caller. Dispatch itself is still fire-and-forget.
    pub fn try_send_event(&self, event_id: &str) -> Result<()> {
        let def = self.cue_def(event_id)?;
        let track = self
            .tracks
            .get(&def.track)
            .ok_or_else(|| Error::UnknownTrack(def.track.clone()))?;

        debug!(event_id, track = %def.track, path = %def.path, mode = ?def.mode, "dispatching cue");
        Arc::clone(track).submit(Cue {
            path: def.path.clone(),
            mode: def.mode,
            volume: def.volume,
        });
        Ok(())
    }

    /// Pure passthrough to the backend's mixer; no sequencing semantics
    pub fn set_mixer_value(&self, name: &str, value: f32) -> Result<()> {
        debug!(name, value, "mixer passthrough");
        self.backend.set_mixer_value(name, value)
    }

    /// Subscribe to engine events (cue outcomes, track teardown)
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Look up a track by name
    pub fn track(&self, name: &str) -> Option<&Arc<Track>> {
        self.tracks.get(name)
    }

    /// Resolve a symbolic event id without dispatching it
    pub fn cue_def(&self, event_id: &str) -> Result<&CueDef> {
        self.cues
            .get(event_id)
            .ok_or_else(|| Error::UnknownEvent(event_id.to_string()))
    }

    /// Cancel every track's in-flight work and release all sources
    pub async fn shutdown(&self) {
        info!("shutting down audio engine");
        for track in self.tracks.values() {
            track.shutdown().await;
        }
    }
}
