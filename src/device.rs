//! Playback device abstraction
//!
//! A [`PlaybackUnit`] represents one hardware-level sound-emitting unit. The
//! [`AudioBackend`] allocates units on demand and carries the mixer-value
//! passthrough. Both are interfaces only; decoding and mixing are the host's
//! concern.

use crate::clip::Clip;
use crate::error::Result;
use std::sync::Arc;

/// One reusable device playback unit.
///
/// Methods take `&self`; implementations are expected to use interior
/// mutability, since units are shared between the pool and running fade
/// tasks.
pub trait PlaybackUnit: Send + Sync {
    /// Start (or restart) playback of the assigned clip
    fn play(&self);

    /// Non-exclusive overlay play; does not interrupt the unit's own clip
    fn play_one_shot(&self, clip: &Clip, volume: f32);

    fn stop(&self);

    /// True once the assigned clip has played through to its last frame
    fn is_finished(&self) -> bool;

    fn set_volume(&self, volume: f32);

    fn volume(&self) -> f32;

    fn position_frames(&self) -> i64;

    fn set_position_frames(&self, frames: i64);

    /// Assign a clip, or detach with `None`
    fn assign_clip(&self, clip: Option<Clip>);

    fn set_looping(&self, looping: bool);

    fn set_output_route(&self, route: &str);
}

/// Factory and mixer surface for one audio device.
pub trait AudioBackend: Send + Sync {
    /// Allocate a fresh playback unit
    fn create_unit(&self) -> Arc<dyn PlaybackUnit>;

    /// Write a mixer parameter; pure passthrough, no sequencing semantics
    fn set_mixer_value(&self, name: &str, value: f32) -> Result<()>;
}
