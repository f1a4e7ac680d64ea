//! # solstice-core
//!
//! Editing backend for the Solstice chart editor. Provides the reversible
//! action manager, the hit-object composition controller, configuration, and
//! the session glue that ties them to the playback clock, independent of any
//! UI framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solstice_audio::{FrameContext, ManualTrack};
//! use solstice_core::config::Config;
//! use solstice_core::session::{EditorInput, EditorSession};
//! use solstice_types::{CompositionTool, GameMode, MapModel};
//!
//! // 1. Load config and open a session over a map + audio track
//! let config = Config::load();
//! let map = MapModel::new(GameMode::Keys4);
//! let mut session = EditorSession::new(map, load_track(), config);
//!
//! // 2. Each frame: advance the clock, feed decoded inputs
//! session.update(elapsed_ms, &FrameContext::default());
//! session.handle(EditorInput::SelectTool(CompositionTool::Note));
//! session.handle(EditorInput::LaneKey { lane: 2 });
//!
//! // 3. Drain composition events (notices, visual marks) for the UI
//! for event in session.drain_events() { /* ... */ }
//! ```
//!
//! ## Module Overview
//!
//! - [`actions`]: `ActionManager` and the `EditAction` commands it applies,
//!   reverts, and replays over a `MapModel`
//! - [`composition`]: `CompositionRuleset`, which turns primary/secondary
//!   inputs into edit commands, including the per-lane pending long-note
//!   release protocol, selection, and tool/graph navigation; `snap` holds
//!   the beat-grid arithmetic
//! - [`config`]: TOML configuration (embedded defaults + user override)
//! - [`session`]: `EditorSession`, routing `EditorInput` to the ruleset, the
//!   action manager, the config, and the `AudioTiming` clock

pub mod actions;
pub mod composition;
pub mod config;
pub mod session;
