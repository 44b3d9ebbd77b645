//! Cue types: the public playback event contract

use serde::{Deserialize, Serialize};

/// Transition mode applied when a cue reaches the head of its track's
/// commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Stop everything on the track and play the new clip alone.
    Solo,

    /// Crossfade: fade the current sounds out while the new clip fades in.
    Transmit,

    /// Crossfade, with the new clip starting at the current playback
    /// position of the sound it replaces.
    SyncTransmit,

    /// One-shot overlay on top of whatever is already playing.
    Mix,
}

/// One "play this sound" request. Immutable, constructed per submission.
#[derive(Debug, Clone)]
pub struct Cue {
    /// Loader path of the clip to play
    pub path: String,

    /// Transition mode
    pub mode: PlayMode,

    /// Target volume (0.0 to 1.0)
    pub volume: f32,
}
