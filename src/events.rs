//! Engine event types and broadcast hub
//!
//! Cue submission is fire-and-forget, so outcomes surface here instead of in
//! return values: every applied, failed, or dropped cue is broadcast to any
//! subscriber (UI layer, logging bridge, tests).

use crate::cue::PlayMode;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Observable engine events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// A cue passed its ticket barrier and its mode handler was dispatched
    CueApplied {
        track: String,
        ticket: u64,
        path: String,
        mode: PlayMode,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A cue's clip load failed; its ticket was retired without playback
    CueFailed {
        track: String,
        ticket: u64,
        path: String,
        mode: PlayMode,
        volume: f32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A cue was dropped at the facade (unknown event id or track)
    CueDropped {
        event_id: String,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A track was torn down and released all of its sources
    TrackShutdown {
        track: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Broadcast hub for engine events.
///
/// Cloning shares the underlying channel. Emitting with no subscribers is
/// not an error; events are simply discarded.
#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<EngineEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: EngineEvent) {
        // Send fails only when there are no receivers; that is fine.
        let _ = self.tx.send(event);
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
