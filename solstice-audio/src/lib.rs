//! # solstice-audio
//!
//! Audio clock abstraction and the gameplay timing synchronizer.
//!
//! - [`track`]: the `AudioTrack` contract (position, play state, rate,
//!   seek, length) plus `ManualTrack`, a software clock for tests and
//!   headless use
//! - [`timing`]: `AudioTiming`, the logical playback clock that reconciles
//!   itself against the device clock each frame under drift, pause, startup
//!   delay, and frame-time smoothing

pub mod timing;
pub mod track;

pub use timing::{
    AudioTiming, FrameContext, SessionKind, RESYNC_THRESHOLD_MS, SCRUB_DELAY_MS, START_DELAY_MS,
};
pub use track::{AudioError, AudioTrack, ManualTrack};
