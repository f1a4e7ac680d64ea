//! Audio-visual timing synchronizer.
//!
//! The logical clock integrates frame time every update for smooth motion
//! and snaps back to the device clock whenever divergence crosses a bounded
//! threshold. Pure device-clock following is accurate but jittery at typical
//! polling granularity; pure frame-time integration is smooth but drifts.

use crate::track::{AudioError, AudioTrack};

/// Time before the chart actually starts, in milliseconds.
pub const START_DELAY_MS: f64 = 3000.0;

/// Maximum amount the logical clock may run ahead of the device clock while
/// smoothing, scaled by the playback rate.
pub const RESYNC_THRESHOLD_MS: f64 = 16.0;

/// Lead-in applied when scrubbing back into a play from a specific position.
pub const SCRUB_DELAY_MS: f64 = 500.0;

/// What kind of play session the synchronizer was created for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionKind {
    /// Song-select preview: the synchronizer is inert.
    Preview,
    /// Offset calibration: the caller loads the fixed calibration track.
    Calibration,
    Normal,
    /// Re-entering a play from a specific position (ms).
    Scrub(f64),
    /// Replay/tournament playback: ticks even while a networked match is
    /// still pending.
    Tournament,
}

/// Per-frame session flags read by [`AudioTiming::update`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameContext {
    pub paused: bool,
    /// The play has ended in failure; the device clock (slowing down) is
    /// adopted directly for the fail animation.
    pub failed: bool,
    /// A networked match has not started yet.
    pub match_pending: bool,
}

/// Logical playback clock, reconciled against an [`AudioTrack`] each frame.
///
/// Construction never fails: a track-load error is logged and the clock
/// degrades to pure frame-time integration.
pub struct AudioTiming<T: AudioTrack> {
    track: Option<T>,
    session: SessionKind,
    smoothing: bool,
    /// Logical time in ms. Negative during the pre-roll countdown.
    time: f64,
    /// Device time at the last resync point.
    old_time: f64,
    /// Rate used when no track is available.
    fallback_rate: f64,
    started: bool,
}

impl<T: AudioTrack> AudioTiming<T> {
    /// Create the synchronizer for a play session. The caller loads the track
    /// (the chart's audio, or the fixed calibration track) and applies the
    /// modifier rate to it; a load failure is passed in as `Err` and degrades
    /// the clock rather than aborting the session.
    pub fn new(session: SessionKind, track: Result<T, AudioError>, smoothing: bool) -> Self {
        let mut timing = Self {
            track: None,
            session,
            smoothing,
            time: 0.0,
            old_time: 0.0,
            fallback_rate: 1.0,
            started: false,
        };

        if matches!(session, SessionKind::Preview) {
            return timing;
        }

        let mut track = match track {
            Ok(track) => track,
            Err(e) => {
                log::error!("audio track unavailable, using frame timing only: {}", e);
                timing.time = -START_DELAY_MS * timing.fallback_rate;
                return timing;
            }
        };

        let rate = track.rate();

        if let SessionKind::Scrub(target) = session {
            if target < START_DELAY_MS {
                // Too close to the start: run the short lead-in without
                // touching the device yet.
                timing.time = -SCRUB_DELAY_MS;
                timing.track = Some(track);
                return timing;
            }
            let position = (target - SCRUB_DELAY_MS).clamp(0.0, track.length());
            match track.seek(position) {
                Ok(()) => timing.time = track.time(),
                Err(e) => {
                    log::error!("scrub seek failed: {}", e);
                    timing.time = -START_DELAY_MS * rate;
                }
            }
            timing.track = Some(track);
            return timing;
        }

        timing.time = -START_DELAY_MS * rate;
        timing.track = Some(track);
        timing
    }

    /// An inert synchronizer for song-select previews.
    pub fn preview() -> Self {
        Self::new(SessionKind::Preview, Err(AudioError::TrackLoad("preview".into())), false)
    }

    /// Current logical time in ms. May be negative during the pre-roll.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Whether playback has been started on the device.
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// True when the device clock is unavailable and the synchronizer runs on
    /// frame-time integration alone.
    pub fn is_degraded(&self) -> bool {
        self.track.is_none() && !matches!(self.session, SessionKind::Preview)
    }

    pub fn track(&self) -> Option<&T> {
        self.track.as_ref()
    }

    pub fn track_mut(&mut self) -> Option<&mut T> {
        self.track.as_mut()
    }

    /// Release the device track. Idempotent; safe to call even if
    /// initialization failed part-way.
    pub fn release(&mut self) -> Option<T> {
        self.track.take()
    }

    fn rate(&self) -> f64 {
        self.track.as_ref().map_or(self.fallback_rate, |t| t.rate())
    }

    /// Advance the logical clock by one frame.
    pub fn update(&mut self, elapsed_ms: f64, ctx: &FrameContext) {
        if matches!(self.session, SessionKind::Preview) {
            return;
        }
        if ctx.paused {
            return;
        }
        if ctx.match_pending && !matches!(self.session, SessionKind::Tournament) {
            return;
        }

        let rate = self.rate();

        // Pre-roll countdown: the device is not consulted until the clock
        // crosses zero.
        if self.time < 0.0 {
            self.time += elapsed_ms * rate;
            return;
        }

        if !self.started {
            self.started = true;
            if let Some(track) = self.track.as_mut() {
                if let Err(e) = track.play() {
                    log::warn!("playback start failed: {}", e);
                }
            }
        }

        let Some(track) = self.track.as_ref() else {
            self.time += elapsed_ms * rate;
            return;
        };

        if self.smoothing {
            // Integrate optimistically, then snap to the device clock when
            // any resync trigger holds.
            self.time += elapsed_ms * rate;
            let device = track.time();
            let delta = device - self.old_time;

            let behind = self.time < device;
            let ahead = self.time > device + RESYNC_THRESHOLD_MS * rate;
            let jumped = delta.abs() >= 1000.0;
            let never_synced = self.old_time == 0.0;

            if track.is_playing() && (behind || ahead || jumped || never_synced || ctx.failed) {
                self.time = device;
                self.old_time = device;
            }
        } else if track.is_playing() {
            self.time = track.time();
        } else {
            self.time += elapsed_ms * rate;
        }
    }
}
