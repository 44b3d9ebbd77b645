//! # cuedeck
//!
//! Audio-track cue sequencer with crossfade orchestration and playback-source
//! pooling.
//!
//! **Purpose:** Accept asynchronously-resolved "play this sound" cues from many
//! unrelated callers, guarantee they are *applied* in submission order even
//! though their clip loads complete in arbitrary order, and transition between
//! sounds (solo replace, crossfade, synchronized crossfade, overlay mix) using
//! a small pool of reusable playback sources per track.
//!
//! **Architecture:** Each track runs a ticket barrier over tokio tasks. A
//! submitted cue takes a ticket, loads its clip, suspends until every earlier
//! ticket has retired, applies its mode handler, and retires its own ticket.
//! The ticket retires on the success path and the failure path alike, so a
//! failed load can never deadlock later cues.
//!
//! The crate is backend-agnostic: the host supplies an [`AudioBackend`] for
//! playback units and mixer passthrough, and a [`ClipLoader`] that resolves
//! paths to playable clips. Actual decoding and mixing live behind those
//! traits.

pub mod clip;
pub mod config;
pub mod cue;
pub mod device;
pub mod error;
pub mod events;
pub mod playback;

pub use clip::{Clip, ClipLoader};
pub use config::{CueDef, EngineConfig, TrackConfig};
pub use cue::{Cue, PlayMode};
pub use device::{AudioBackend, PlaybackUnit};
pub use error::{Error, Result};
pub use events::{EngineEvent, EventHub};
pub use playback::engine::AudioEngine;
pub use playback::fader::FadeCurve;
