//! Reusable playback source handles

use crate::clip::Clip;
use crate::device::PlaybackUnit;
use std::fmt;
use std::sync::Arc;

/// Owned reference to one reusable playback unit.
///
/// Identity is the pool-assigned id. A handle is, at all times, in exactly
/// one of the pool's idle queue, its track's active set, or held by an
/// in-flight release; the pool enforces that by id, so clones are safe to
/// pass into fade tasks.
#[derive(Clone)]
pub struct PlaybackHandle {
    id: u64,
    unit: Arc<dyn PlaybackUnit>,
}

impl PlaybackHandle {
    pub(crate) fn new(id: u64, unit: Arc<dyn PlaybackUnit>) -> Self {
        Self { id, unit }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn play(&self) {
        self.unit.play();
    }

    pub fn play_one_shot(&self, clip: &Clip, volume: f32) {
        self.unit.play_one_shot(clip, volume);
    }

    pub fn stop(&self) {
        self.unit.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.unit.is_finished()
    }

    pub fn set_volume(&self, volume: f32) {
        self.unit.set_volume(volume);
    }

    pub fn volume(&self) -> f32 {
        self.unit.volume()
    }

    pub fn position_frames(&self) -> i64 {
        self.unit.position_frames()
    }

    pub fn set_position_frames(&self, frames: i64) {
        self.unit.set_position_frames(frames);
    }

    pub fn assign_clip(&self, clip: Option<Clip>) {
        self.unit.assign_clip(clip);
    }

    pub fn set_looping(&self, looping: bool) {
        self.unit.set_looping(looping);
    }

    pub fn set_output_route(&self, route: &str) {
        self.unit.set_output_route(route);
    }
}

impl PartialEq for PlaybackHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlaybackHandle {}

impl fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle").field("id", &self.id).finish()
    }
}
