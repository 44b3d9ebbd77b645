//! Playback source pool
//!
//! Owns every playback unit a track has allocated and tracks which are idle
//! vs. active. Finished sources are reclaimed lazily, on the next acquire.
//! The pool never registers an acquired handle as active itself; mode
//! handlers do that once the source is configured, because Solo and Mix
//! differ on whether the new source joins the canonical active set.

use crate::device::AudioBackend;
use crate::playback::handle::PlaybackHandle;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace};

#[derive(Default)]
struct PoolState {
    /// Sources currently playing the track's canonical sound(s)
    active: Vec<PlaybackHandle>,

    /// Sources available for reuse
    idle: VecDeque<PlaybackHandle>,
}

/// Per-track pool of reusable playback sources
pub struct SourcePool {
    track: String,
    backend: Arc<dyn AudioBackend>,
    state: RwLock<PoolState>,
    next_id: AtomicU64,
    allocated: AtomicU64,

    /// Set at track teardown; a closed pool refuses new registrations
    closed: AtomicBool,
}

impl SourcePool {
    pub fn new(track: &str, backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            track: track.to_string(),
            backend,
            state: RwLock::new(PoolState::default()),
            next_id: AtomicU64::new(0),
            allocated: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Stop accepting registrations; handles offered afterwards are released
    /// instead. Called at track teardown, before the final drain, so a holder
    /// suspended between acquire and register cannot revive a drained pool.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Acquire a source for playback.
    ///
    /// Sweeps finished active sources back into the idle queue first, then
    /// reuses an idle source if one exists, else allocates a new unit from
    /// the backend.
    pub async fn acquire(&self) -> PlaybackHandle {
        {
            let mut state = self.state.write().await;

            let mut i = 0;
            while i < state.active.len() {
                if state.active[i].is_finished() {
                    let handle = state.active.remove(i);
                    handle.stop();
                    handle.assign_clip(None);
                    debug!(track = %self.track, handle = handle.id(), "reclaimed finished source");
                    state.idle.push_back(handle);
                } else {
                    i += 1;
                }
            }

            if let Some(handle) = state.idle.pop_front() {
                trace!(track = %self.track, handle = handle.id(), "reusing idle source");
                return handle;
            }
        }

        let unit = self.backend.create_unit();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.allocated.fetch_add(1, Ordering::SeqCst);
        debug!(track = %self.track, handle = id, "allocated new playback unit");
        PlaybackHandle::new(id, unit)
    }

    /// Release a source back to the idle queue: stop, detach the clip, and
    /// remove it from the active set if present.
    ///
    /// Safe to call twice for the same handle; the second call is a no-op.
    pub async fn release(&self, handle: &PlaybackHandle) {
        handle.stop();
        handle.assign_clip(None);

        let mut state = self.state.write().await;
        state.active.retain(|h| h.id() != handle.id());
        if state.idle.iter().all(|h| h.id() != handle.id()) {
            trace!(track = %self.track, handle = handle.id(), "released source to idle");
            state.idle.push_back(handle.clone());
        }
    }

    /// Register a configured source as part of the canonical active set.
    ///
    /// Re-validates before inserting: the handle may have been released
    /// while the caller was suspended between acquire and register. The
    /// closed check happens under the same lock as the insert, so a
    /// registration can never land after teardown's drain.
    pub async fn register_active(&self, handle: PlaybackHandle) {
        {
            let mut state = self.state.write().await;
            if !self.closed.load(Ordering::SeqCst) {
                if state.active.iter().any(|h| h.id() == handle.id())
                    || state.idle.iter().any(|h| h.id() == handle.id())
                {
                    return;
                }
                state.active.push(handle);
                return;
            }
        }

        debug!(track = %self.track, handle = handle.id(), "pool closed, releasing instead of registering");
        self.release(&handle).await;
    }

    /// Drain the canonical active set, leaving it empty.
    ///
    /// Used by crossfades to snapshot the sources that now belong to the
    /// fade-out.
    pub async fn take_active(&self) -> Vec<PlaybackHandle> {
        let mut state = self.state.write().await;
        std::mem::take(&mut state.active)
    }

    /// First source in the canonical active set, if any
    pub async fn first_active(&self) -> Option<PlaybackHandle> {
        self.state.read().await.active.first().cloned()
    }

    /// Clones of the canonical active set (inspection only)
    pub async fn active_handles(&self) -> Vec<PlaybackHandle> {
        self.state.read().await.active.clone()
    }

    pub async fn active_count(&self) -> usize {
        self.state.read().await.active.len()
    }

    pub async fn idle_count(&self) -> usize {
        self.state.read().await.idle.len()
    }

    /// Total units ever allocated from the backend for this track
    pub fn allocated_count(&self) -> u64 {
        self.allocated.load(Ordering::SeqCst)
    }

    /// Force every known source back to a released state (track teardown)
    pub async fn release_all(&self) {
        let active = self.take_active().await;
        for handle in &active {
            self.release(handle).await;
        }
        debug!(track = %self.track, released = active.len(), "released all active sources");
    }
}
