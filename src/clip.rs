//! Clip handles and the asynchronous clip loader interface

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Opaque handle to a loaded, playable clip.
///
/// Cheap to clone. The engine never inspects sample data; it only needs the
/// frame count so playback units can answer the finished-query.
#[derive(Clone)]
pub struct Clip {
    inner: Arc<ClipInner>,
}

struct ClipInner {
    name: String,
    frames: i64,
}

impl Clip {
    pub fn new(name: impl Into<String>, frames: i64) -> Self {
        Self {
            inner: Arc::new(ClipInner {
                name: name.into(),
                frames,
            }),
        }
    }

    /// Loader path (or other identifier) this clip was resolved from
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Total length in sample frames
    pub fn frames(&self) -> i64 {
        self.inner.frames
    }
}

impl fmt::Debug for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clip")
            .field("name", &self.inner.name)
            .field("frames", &self.inner.frames)
            .finish()
    }
}

/// Asynchronous asset loader resolving a path to a playable clip.
///
/// Load duration is unbounded and unordered relative to other loads; the
/// sequencer races each load against the track's cancellation scope, so
/// implementations do not need their own cancellation plumbing.
#[async_trait]
pub trait ClipLoader: Send + Sync {
    async fn load(&self, path: &str) -> anyhow::Result<Clip>;
}
