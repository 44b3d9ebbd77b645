//! Per-track cue sequencing and mode handlers
//!
//! Each track runs a ticket barrier: a submitted cue takes the next pending
//! ticket, loads its clip (arbitrarily slow, unordered), then suspends until
//! every earlier ticket has retired before its mode handler runs. The commit
//! counter advances exactly once per ticket, on the success path and the
//! failure path alike, so a failed load can never deadlock later cues.
//!
//! Cancellation scopes:
//! - `scope` is the track-level scope; teardown cancels every waiting ticket
//!   and every running fade.
//! - `fade_in_scope` is a child of `scope`, replaced on every crossfade; it
//!   supersedes exactly the previous fade-in, never a fade-out.

use crate::clip::{Clip, ClipLoader};
use crate::config::TrackConfig;
use crate::cue::{Cue, PlayMode};
use crate::device::AudioBackend;
use crate::error::Error;
use crate::events::{EngineEvent, EventHub};
use crate::playback::fader::{self, FadeCurve};
use crate::playback::pool::SourcePool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Advances the commit counter when dropped.
///
/// Created once a ticket has passed the barrier; the ticket then retires on
/// every exit path, including late cancellation, so the commit sequence
/// never has a gap while other tickets are waiting on it.
struct CommitGuard<'a> {
    committed: &'a watch::Sender<u64>,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.committed.send_modify(|c| *c += 1);
    }
}

/// One named playback track
pub struct Track {
    name: String,
    fade_duration: Duration,
    fade_curve: FadeCurve,
    looping: bool,
    route: String,
    pool: Arc<SourcePool>,
    loader: Arc<dyn ClipLoader>,
    events: EventHub,

    /// Next ticket to hand out; monotonically increasing, never reset
    pending: AtomicU64,

    /// Ticket currently permitted to apply its action
    committed: watch::Sender<u64>,

    /// Track-level cancellation scope
    scope: CancellationToken,

    /// Scope of the most recent fade-in; replaced on every crossfade
    fade_in_scope: Mutex<CancellationToken>,
}

impl Track {
    pub(crate) fn new(
        config: &TrackConfig,
        backend: Arc<dyn AudioBackend>,
        loader: Arc<dyn ClipLoader>,
        events: EventHub,
    ) -> Self {
        let scope = CancellationToken::new();
        let (committed, _) = watch::channel(0u64);

        Self {
            name: config.name.clone(),
            fade_duration: Duration::from_secs_f32(config.fade_duration_secs.max(0.0)),
            fade_curve: config.fade_curve,
            looping: config.looping,
            route: config.route.clone(),
            pool: Arc::new(SourcePool::new(&config.name, backend)),
            loader,
            events,
            pending: AtomicU64::new(0),
            committed,
            fade_in_scope: Mutex::new(scope.child_token()),
            scope,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The track's source pool (inspection and diagnostics)
    pub fn pool(&self) -> &Arc<SourcePool> {
        &self.pool
    }

    /// Ticket currently permitted to apply; equals the number of retired cues
    pub fn committed(&self) -> u64 {
        *self.committed.borrow()
    }

    /// Next ticket that will be handed out
    pub fn pending(&self) -> u64 {
        self.pending.load(Ordering::SeqCst)
    }

    /// Submit a cue; fire-and-forget.
    ///
    /// The cue's ticket is taken here, synchronously, so two `submit` calls
    /// are ordered by their call order; the spawned tasks may be first-polled
    /// in any order on a multi-thread runtime. The task logs and broadcasts
    /// its outcome; nothing propagates back to the caller.
    pub fn submit(self: Arc<Self>, cue: Cue) {
        let ticket = self.pending.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
            self.run_cue(ticket, cue).await;
        });
    }

    /// Tear the track down: cancel every waiting ticket and running fade,
    /// then force every source back to a released state.
    pub async fn shutdown(&self) {
        info!(track = %self.name, "shutting down track");
        self.scope.cancel();
        self.pool.close();
        self.pool.release_all().await;
        self.events.emit(EngineEvent::TrackShutdown {
            track: self.name.clone(),
            timestamp: chrono::Utc::now(),
        });
    }

    async fn run_cue(self: Arc<Self>, ticket: u64, cue: Cue) {
        debug!(track = %self.name, ticket, path = %cue.path, mode = ?cue.mode, "cue submitted");

        let loaded = tokio::select! {
            _ = self.scope.cancelled() => {
                debug!(track = %self.name, ticket, "cue canceled during load");
                return;
            }
            result = self.loader.load(&cue.path) => result,
        };

        // Ticket barrier: wait until every earlier cue has retired.
        let mut committed_rx = self.committed.subscribe();
        tokio::select! {
            _ = self.scope.cancelled() => {
                debug!(track = %self.name, ticket, "cue canceled at barrier");
                return;
            }
            result = committed_rx.wait_for(|c| *c >= ticket) => {
                if result.is_err() {
                    return;
                }
            }
        }

        // Past the barrier the ticket must retire on every path.
        let commit = CommitGuard {
            committed: &self.committed,
        };

        let fades = match loaded {
            Err(source) => {
                let err = Error::Load {
                    path: cue.path.clone(),
                    source,
                };
                warn!(
                    track = %self.name, ticket, mode = ?cue.mode,
                    volume = cue.volume, error = %err,
                    "clip load failed, skipping cue"
                );
                self.events.emit(EngineEvent::CueFailed {
                    track: self.name.clone(),
                    ticket,
                    path: cue.path.clone(),
                    mode: cue.mode,
                    volume: cue.volume,
                    timestamp: chrono::Utc::now(),
                });
                None
            }
            Ok(clip) => {
                let fades = self.apply(&cue, clip).await;
                self.events.emit(EngineEvent::CueApplied {
                    track: self.name.clone(),
                    ticket,
                    path: cue.path.clone(),
                    mode: cue.mode,
                    timestamp: chrono::Utc::now(),
                });
                fades
            }
        };

        // Retire the ticket before the crossfade finishes; a later cue may
        // supersede the fade-in while it is still ramping.
        drop(commit);

        if let Some((fade_out, fade_in)) = fades {
            if let Err(err) = fade_out.await {
                error!(track = %self.name, ticket, error = %err, "fade-out task panicked");
            }
            if let Err(err) = fade_in.await {
                error!(track = %self.name, ticket, error = %err, "fade-in task panicked");
            }
        }
    }

    /// Dispatch the mode handler. Crossfade modes return their fade task
    /// handles so the sequencer task can outlive-await them.
    async fn apply(&self, cue: &Cue, clip: Clip) -> Option<(JoinHandle<()>, JoinHandle<()>)> {
        match cue.mode {
            PlayMode::Solo => {
                self.apply_solo(clip, cue.volume).await;
                None
            }
            PlayMode::Mix => {
                self.apply_mix(clip, cue.volume).await;
                None
            }
            PlayMode::Transmit => Some(self.apply_transmit(clip, cue.volume, false).await),
            PlayMode::SyncTransmit => Some(self.apply_transmit(clip, cue.volume, true).await),
        }
    }

    /// Solo: release every active source, then play the new clip alone.
    async fn apply_solo(&self, clip: Clip, volume: f32) {
        info!(track = %self.name, clip = clip.name(), volume, "solo transition");

        for handle in self.pool.take_active().await {
            self.pool.release(&handle).await;
        }

        let handle = self.pool.acquire().await;
        handle.assign_clip(Some(clip));
        handle.set_looping(self.looping);
        handle.set_output_route(&self.route);
        handle.set_volume(volume);
        handle.play();
        self.pool.register_active(handle).await;
    }

    /// Mix: one-shot overlay on the first active source, or on a fresh
    /// source at full volume if the track is silent.
    async fn apply_mix(&self, clip: Clip, volume: f32) {
        info!(track = %self.name, clip = clip.name(), volume, "mix overlay");

        if let Some(handle) = self.pool.first_active().await {
            handle.play_one_shot(&clip, volume);
            return;
        }

        let handle = self.pool.acquire().await;
        handle.set_looping(false);
        handle.set_output_route(&self.route);
        handle.set_volume(1.0);
        handle.play_one_shot(&clip, volume);
        self.pool.register_active(handle).await;
    }

    /// Transmit / SyncTransmit: fade the current sources out while the new
    /// clip fades in, as two independent tasks.
    ///
    /// The fade-out is cancellable only by track teardown; a newer crossfade
    /// never interrupts it. The fade-in is cancellable by the next
    /// crossfade's scope replacement.
    async fn apply_transmit(
        &self,
        clip: Clip,
        volume: f32,
        synced: bool,
    ) -> (JoinHandle<()>, JoinHandle<()>) {
        info!(track = %self.name, clip = clip.name(), volume, synced, "crossfade transition");

        // Supersede exactly the previous fade-in.
        let fade_in_scope = self.scope.child_token();
        let superseded = {
            let mut slot = self.fade_in_scope.lock().await;
            std::mem::replace(&mut *slot, fade_in_scope.clone())
        };
        superseded.cancel();

        // Snapshot and clear the canonical active set; these sources now
        // belong to the fade-out.
        let snapshot = self.pool.take_active().await;
        let sync_position = if synced {
            snapshot
                .iter()
                .find(|h| !h.is_finished())
                .map(|h| h.position_frames())
                .unwrap_or(0)
        } else {
            0
        };

        let fade_out = {
            let pool = Arc::clone(&self.pool);
            let scope = self.scope.clone();
            let curve = self.fade_curve;
            let duration = self.fade_duration;
            let track = self.name.clone();

            tokio::spawn(async move {
                tokio::select! {
                    _ = scope.cancelled() => {
                        debug!(track = %track, "fade-out canceled by track teardown");
                    }
                    _ = fader::fade_out_all(&snapshot, curve, duration) => {}
                }
                // Sources go back to the pool on every exit path; a source
                // must never be left enabled with a stale clip.
                for handle in &snapshot {
                    pool.release(handle).await;
                }
                debug!(track = %track, released = snapshot.len(), "fade-out complete");
            })
        };

        let fade_in = {
            let pool = Arc::clone(&self.pool);
            let scope = fade_in_scope;
            let curve = self.fade_curve;
            let duration = self.fade_duration;
            let looping = self.looping;
            let route = self.route.clone();
            let track = self.name.clone();

            tokio::spawn(async move {
                let handle = pool.acquire().await;
                handle.assign_clip(Some(clip));
                handle.set_looping(looping);
                handle.set_output_route(&route);
                handle.set_volume(0.0);
                handle.set_position_frames(sync_position);

                if scope.is_cancelled() {
                    // Superseded (or torn down) before the ramp started.
                    pool.release(&handle).await;
                    return;
                }

                handle.play();
                pool.register_active(handle.clone()).await;

                tokio::select! {
                    _ = scope.cancelled() => {
                        // Leave the source in the active set at its partial
                        // volume; the superseding crossfade's fade-out claims
                        // it from there.
                        debug!(track = %track, handle = handle.id(), "fade-in superseded");
                    }
                    _ = fader::ramp(&handle, curve, 0.0, volume, duration) => {
                        debug!(track = %track, handle = handle.id(), "fade-in complete");
                    }
                }
            })
        };

        (fade_out, fade_in)
    }
}
