//! Crossfade volume ramps
//!
//! Timed volume ramps for fade-out and fade-in. Each ramp yields once per
//! timer tick, recomputes its progress from elapsed time, and sets the
//! terminal volume exactly on completion. Cancellation is the caller's
//! concern: fade tasks race these futures against their cancellation scope.

use crate::playback::handle::PlaybackHandle;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{interval, Instant};

/// Interval between ramp volume updates
const RAMP_TICK: Duration = Duration::from_millis(10);

/// Fade curve shapes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// y = x
    #[default]
    Linear,

    /// y = x^2 (slow start, fast finish)
    Exponential,

    /// y = sqrt(x) (fast start, slow finish)
    Logarithmic,

    /// y = (1 - cos(pi x)) / 2
    SCurve,
}

impl FadeCurve {
    /// Map linear progress (0.0 to 1.0) through the curve
    pub fn apply(self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            FadeCurve::Linear => p,
            FadeCurve::Exponential => p * p,
            FadeCurve::Logarithmic => p.sqrt(),
            FadeCurve::SCurve => (1.0 - (std::f32::consts::PI * p).cos()) / 2.0,
        }
    }
}

/// Volume at `progress` through a ramp from `from` to `to`
pub fn ramp_volume(curve: FadeCurve, from: f32, to: f32, progress: f32) -> f32 {
    from + (to - from) * curve.apply(progress)
}

/// Ramp one handle's volume from `from` to `to` over `duration`.
pub async fn ramp(
    handle: &PlaybackHandle,
    curve: FadeCurve,
    from: f32,
    to: f32,
    duration: Duration,
) {
    if duration.is_zero() {
        handle.set_volume(to);
        return;
    }

    let started = Instant::now();
    let mut tick = interval(RAMP_TICK);
    // The first interval tick completes immediately.
    tick.tick().await;

    loop {
        tick.tick().await;
        let progress = started.elapsed().as_secs_f32() / duration.as_secs_f32();
        if progress >= 1.0 {
            handle.set_volume(to);
            return;
        }
        handle.set_volume(ramp_volume(curve, from, to, progress));
    }
}

/// Ramp every snapshotted handle from its current volume down to silence.
///
/// Starting volumes are captured up front, so a handle that was itself
/// mid-fade-in ramps down from wherever it got to.
pub async fn fade_out_all(handles: &[PlaybackHandle], curve: FadeCurve, duration: Duration) {
    if handles.is_empty() {
        return;
    }

    let starts: Vec<f32> = handles.iter().map(|h| h.volume()).collect();

    if duration.is_zero() {
        for handle in handles {
            handle.set_volume(0.0);
        }
        return;
    }

    let started = Instant::now();
    let mut tick = interval(RAMP_TICK);
    tick.tick().await;

    loop {
        tick.tick().await;
        let progress = (started.elapsed().as_secs_f32() / duration.as_secs_f32()).min(1.0);
        for (handle, &from) in handles.iter().zip(&starts) {
            handle.set_volume(ramp_volume(curve, from, 0.0, progress));
        }
        if progress >= 1.0 {
            return;
        }
    }
}
