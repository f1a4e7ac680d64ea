//! Audio device clock contract.

use std::fmt;

/// Failure at the audio device boundary. These are caught where they occur,
/// logged, and never propagated past the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// The track could not be loaded or decoded.
    TrackLoad(String),
    /// The device refused to start playback.
    PlaybackStart(String),
    /// A seek target outside the track bounds.
    Seek { position_ms: f64, length_ms: f64 },
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::TrackLoad(msg) => write!(f, "failed to load track: {}", msg),
            AudioError::PlaybackStart(msg) => write!(f, "failed to start playback: {}", msg),
            AudioError::Seek { position_ms, length_ms } => {
                write!(f, "seek to {}ms outside track of {}ms", position_ms, length_ms)
            }
        }
    }
}

impl std::error::Error for AudioError {}

/// A playback clock, polled once per frame. Position reads are treated as a
/// single atomic read; implementations do not need internal locking.
pub trait AudioTrack {
    /// Current playback position in milliseconds.
    fn time(&self) -> f64;
    fn is_playing(&self) -> bool;
    /// Playback speed multiplier.
    fn rate(&self) -> f64;
    /// Track length in milliseconds.
    fn length(&self) -> f64;
    fn play(&mut self) -> Result<(), AudioError>;
    fn seek(&mut self, position_ms: f64) -> Result<(), AudioError>;
}

/// A software clock advanced explicitly by the caller. Stands in for a real
/// device track in tests and headless sessions.
#[derive(Debug, Clone)]
pub struct ManualTrack {
    position_ms: f64,
    length_ms: f64,
    rate: f64,
    playing: bool,
}

impl ManualTrack {
    pub fn new(length_ms: f64) -> Self {
        Self { position_ms: 0.0, length_ms, rate: 1.0, playing: false }
    }

    pub fn with_rate(length_ms: f64, rate: f64) -> Self {
        Self { rate, ..Self::new(length_ms) }
    }

    /// Advance the clock by wall time. Position moves only while playing and
    /// stops at the end of the track.
    pub fn advance(&mut self, elapsed_ms: f64) {
        if !self.playing {
            return;
        }
        self.position_ms += elapsed_ms * self.rate;
        if self.position_ms >= self.length_ms {
            self.position_ms = self.length_ms;
            self.playing = false;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Force the reported position, simulating device-side drift.
    pub fn set_position(&mut self, position_ms: f64) {
        self.position_ms = position_ms;
    }
}

impl AudioTrack for ManualTrack {
    fn time(&self) -> f64 {
        self.position_ms
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn length(&self) -> f64 {
        self.length_ms
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.playing = true;
        Ok(())
    }

    fn seek(&mut self, position_ms: f64) -> Result<(), AudioError> {
        if position_ms < 0.0 || position_ms > self.length_ms {
            return Err(AudioError::Seek { position_ms, length_ms: self.length_ms });
        }
        self.position_ms = position_ms;
        Ok(())
    }
}
