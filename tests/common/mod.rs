//! Shared test fixtures: in-memory audio backend and scripted clip loader
#![allow(dead_code)]

use async_trait::async_trait;
use cuedeck::{AudioBackend, Clip, ClipLoader, PlaybackUnit};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default clip length handed out by the mock loader (4 seconds at 44.1kHz)
pub const DEFAULT_CLIP_FRAMES: i64 = 44_100 * 4;

#[derive(Debug, Default, Clone)]
pub struct UnitState {
    pub playing: bool,
    pub volume: f32,
    pub position: i64,
    pub looping: bool,
    pub route: String,
    pub clip: Option<Clip>,
    /// Recorded overlay plays: (clip name, volume)
    pub one_shots: Vec<(String, f32)>,
}

/// In-memory playback unit recording every control call
pub struct MockUnit {
    pub index: usize,
    state: Mutex<UnitState>,
}

impl MockUnit {
    fn new(index: usize) -> Self {
        Self {
            index,
            state: Mutex::new(UnitState::default()),
        }
    }

    pub fn snapshot(&self) -> UnitState {
        self.state.lock().unwrap().clone()
    }

    pub fn clip_name(&self) -> Option<String> {
        self.snapshot().clip.map(|c| c.name().to_string())
    }

    /// True when the unit is audible: playing with a clip assigned
    pub fn is_audible(&self) -> bool {
        let state = self.snapshot();
        state.playing && state.clip.is_some()
    }
}

impl PlaybackUnit for MockUnit {
    fn play(&self) {
        self.state.lock().unwrap().playing = true;
    }

    fn play_one_shot(&self, clip: &Clip, volume: f32) {
        self.state
            .lock()
            .unwrap()
            .one_shots
            .push((clip.name().to_string(), volume));
    }

    fn stop(&self) {
        self.state.lock().unwrap().playing = false;
    }

    fn is_finished(&self) -> bool {
        let state = self.state.lock().unwrap();
        match &state.clip {
            Some(clip) => !state.looping && state.position >= clip.frames(),
            None => false,
        }
    }

    fn set_volume(&self, volume: f32) {
        self.state.lock().unwrap().volume = volume;
    }

    fn volume(&self) -> f32 {
        self.state.lock().unwrap().volume
    }

    fn position_frames(&self) -> i64 {
        self.state.lock().unwrap().position
    }

    fn set_position_frames(&self, frames: i64) {
        self.state.lock().unwrap().position = frames;
    }

    fn assign_clip(&self, clip: Option<Clip>) {
        let mut state = self.state.lock().unwrap();
        state.clip = clip;
        state.position = 0;
    }

    fn set_looping(&self, looping: bool) {
        self.state.lock().unwrap().looping = looping;
    }

    fn set_output_route(&self, route: &str) {
        self.state.lock().unwrap().route = route.to_string();
    }
}

/// Backend that hands out mock units and records mixer writes
#[derive(Default)]
pub struct MockBackend {
    units: Mutex<Vec<Arc<MockUnit>>>,
    mixer: Mutex<HashMap<String, f32>>,
    broken_mixers: Mutex<HashSet<String>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn units(&self) -> Vec<Arc<MockUnit>> {
        self.units.lock().unwrap().clone()
    }

    pub fn unit_count(&self) -> usize {
        self.units.lock().unwrap().len()
    }

    /// Units currently audible (playing with a clip assigned)
    pub fn audible_units(&self) -> Vec<Arc<MockUnit>> {
        self.units()
            .into_iter()
            .filter(|u| u.is_audible())
            .collect()
    }

    pub fn mixer_value(&self, name: &str) -> Option<f32> {
        self.mixer.lock().unwrap().get(name).copied()
    }

    /// Make writes to the named mixer control fail
    pub fn break_mixer(&self, name: &str) {
        self.broken_mixers.lock().unwrap().insert(name.to_string());
    }
}

impl AudioBackend for MockBackend {
    fn create_unit(&self) -> Arc<dyn PlaybackUnit> {
        let mut units = self.units.lock().unwrap();
        let unit = Arc::new(MockUnit::new(units.len()));
        units.push(Arc::clone(&unit));
        unit
    }

    fn set_mixer_value(&self, name: &str, value: f32) -> cuedeck::Result<()> {
        if self.broken_mixers.lock().unwrap().contains(name) {
            return Err(cuedeck::Error::Playback(format!(
                "no mixer control named '{name}'"
            )));
        }
        self.mixer.lock().unwrap().insert(name.to_string(), value);
        Ok(())
    }
}

/// Loader with scripted per-path latency and failure set
#[derive(Default)]
pub struct MockLoader {
    latencies: Mutex<HashMap<String, Duration>>,
    failures: Mutex<HashSet<String>>,
}

impl MockLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_latency(&self, path: &str, latency: Duration) {
        self.latencies
            .lock()
            .unwrap()
            .insert(path.to_string(), latency);
    }

    pub fn fail(&self, path: &str) {
        self.failures.lock().unwrap().insert(path.to_string());
    }
}

#[async_trait]
impl ClipLoader for MockLoader {
    async fn load(&self, path: &str) -> anyhow::Result<Clip> {
        let latency = self
            .latencies
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(Duration::from_millis(1));
        tokio::time::sleep(latency).await;

        if self.failures.lock().unwrap().contains(path) {
            anyhow::bail!("asset not found: {path}");
        }
        Ok(Clip::new(path, DEFAULT_CLIP_FRAMES))
    }
}

/// Install a test subscriber; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
