//! Playback core: source pool, crossfade ramps, per-track sequencing,
//! and the engine facade

pub mod engine;
pub mod fader;
pub mod handle;
pub mod pool;
pub mod track;
