//! Editor session: routes raw input to the composition ruleset, the action
//! manager, and the playback clock.
//!
//! Pointer placement is snapped onto the beat grid before it reaches the
//! ruleset; keyboard placement happens live at the current playback time and
//! is never snapped.

use std::path::PathBuf;

use crossbeam_channel::Receiver;

use solstice_audio::{AudioError, AudioTiming, AudioTrack, FrameContext, SessionKind};
use solstice_types::{CompositionTool, GameMode, HitObjectId, InputSource, MapModel, ScrollDirection};

use crate::actions::ActionManager;
use crate::composition::snap::snap_to_nearest;
use crate::composition::{
    hit_position_line_y, toggle_scroll_direction, CompositionEvent, CompositionRuleset,
};
use crate::config::Config;

/// Beat divisors the snap cycles through.
const BEAT_SNAPS: [u32; 8] = [1, 2, 3, 4, 6, 8, 12, 16];

/// One editor input, already decoded from whatever raw device event produced
/// it. Hit-testing is the caller's job: pointer events carry the object under
/// the cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorInput {
    /// A lane key was pressed while the editor has focus.
    LaneKey { lane: u8 },
    PointerPrimary { lane: u8, time: f64, hovered: Option<HitObjectId>, multi_select: bool },
    PointerSecondary { hovered: Option<HitObjectId> },
    DeleteSelection,
    SelectTool(CompositionTool),
    /// With the modifier held these cycle the beat snap instead of the tool.
    ToolUp { modifier_held: bool },
    ToolDown { modifier_held: bool },
    GraphUp { modifier_held: bool },
    GraphDown { modifier_held: bool },
    ScrollSpeedUp,
    ScrollSpeedDown,
    ToggleScrollDirection,
    Undo,
    Redo,
}

/// A live editing session over one map.
pub struct EditorSession<T: AudioTrack> {
    map: MapModel,
    actions: ActionManager,
    ruleset: CompositionRuleset,
    events: Receiver<CompositionEvent>,
    timing: AudioTiming<T>,
    config: Config,
    /// Where config changes are persisted. `None` disables persistence.
    config_path: Option<PathBuf>,
    beat_snap: u32,
    window_height: f32,
    hit_position_y: f32,
}

impl<T: AudioTrack> EditorSession<T> {
    pub fn new(map: MapModel, track: Result<T, AudioError>, config: Config) -> Self {
        let smoothing = config.smooth_audio_timing;
        let (ruleset, events) = CompositionRuleset::with_channel();
        Self {
            map,
            actions: ActionManager::default(),
            ruleset,
            events,
            timing: AudioTiming::new(SessionKind::Normal, track, smoothing),
            config,
            config_path: None,
            beat_snap: 4,
            window_height: 1080.0,
            hit_position_y: 200.0,
        }
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn set_viewport(&mut self, window_height: f32, hit_position_y: f32) {
        self.window_height = window_height;
        self.hit_position_y = hit_position_y;
    }

    pub fn map(&self) -> &MapModel {
        &self.map
    }

    pub fn ruleset(&self) -> &CompositionRuleset {
        &self.ruleset
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn beat_snap(&self) -> u32 {
        self.beat_snap
    }

    pub fn time(&self) -> f64 {
        self.timing.time()
    }

    pub fn track_mut(&mut self) -> Option<&mut T> {
        self.timing.track_mut()
    }

    /// Events emitted by the ruleset since the last drain.
    pub fn drain_events(&self) -> Vec<CompositionEvent> {
        self.events.try_iter().collect()
    }

    /// Advance the playback clock by one frame.
    pub fn update(&mut self, elapsed_ms: f64, ctx: &FrameContext) {
        self.timing.update(elapsed_ms, ctx);
    }

    /// Scroll direction for the session's game mode.
    pub fn scroll_direction(&self) -> ScrollDirection {
        match self.map.mode {
            GameMode::Keys4 => self.config.scroll_direction_4k,
            GameMode::Keys7 => self.config.scroll_direction_7k,
        }
    }

    /// Y position of the hit-position indicator line for the current
    /// direction and viewport.
    pub fn hit_position_line_y(&self) -> f32 {
        hit_position_line_y(self.scroll_direction(), self.window_height, self.hit_position_y)
    }

    pub fn handle(&mut self, input: EditorInput) {
        match input {
            EditorInput::LaneKey { lane } => {
                let time = self.timing.time();
                self.ruleset.place_object(
                    &mut self.map,
                    &mut self.actions,
                    InputSource::Keyboard,
                    lane,
                    time,
                    None,
                );
            }
            EditorInput::PointerPrimary { lane, time, hovered, multi_select } => {
                if self.ruleset.tool() == CompositionTool::Select {
                    self.ruleset.handle_selection(&self.map, hovered, multi_select);
                    return;
                }
                let snapped =
                    snap_to_nearest(self.beat_snap, self.map.bpm, self.map.offset_ms, time);
                self.ruleset.place_object(
                    &mut self.map,
                    &mut self.actions,
                    InputSource::Pointer,
                    lane,
                    snapped,
                    hovered,
                );
            }
            EditorInput::PointerSecondary { hovered } => {
                self.ruleset.delete_hovered(&mut self.map, &mut self.actions, hovered);
            }
            EditorInput::DeleteSelection => {
                self.ruleset.delete_selection(&mut self.map, &mut self.actions);
            }
            EditorInput::SelectTool(tool) => self.ruleset.set_tool(tool),
            EditorInput::ToolUp { modifier_held } => {
                if modifier_held {
                    self.cycle_beat_snap(-1);
                }
                self.ruleset.tool_up(modifier_held);
            }
            EditorInput::ToolDown { modifier_held } => {
                if modifier_held {
                    self.cycle_beat_snap(1);
                }
                self.ruleset.tool_down(modifier_held);
            }
            EditorInput::GraphUp { modifier_held } => self.ruleset.graph_up(modifier_held),
            EditorInput::GraphDown { modifier_held } => self.ruleset.graph_down(modifier_held),
            EditorInput::ScrollSpeedUp => {
                self.config.adjust_scroll_speed(1);
                self.persist_config();
            }
            EditorInput::ScrollSpeedDown => {
                self.config.adjust_scroll_speed(-1);
                self.persist_config();
            }
            EditorInput::ToggleScrollDirection => {
                toggle_scroll_direction(&mut self.config, self.map.mode);
                self.persist_config();
            }
            EditorInput::Undo => {
                self.ruleset.deselect_all(&self.map);
                self.actions.undo(&mut self.map);
            }
            EditorInput::Redo => {
                self.ruleset.deselect_all(&self.map);
                self.actions.redo(&mut self.map);
            }
        }
    }

    fn cycle_beat_snap(&mut self, step: i32) {
        let idx = BEAT_SNAPS.iter().position(|&s| s == self.beat_snap).unwrap_or(0) as i32;
        let idx = (idx + step).rem_euclid(BEAT_SNAPS.len() as i32) as usize;
        self.beat_snap = BEAT_SNAPS[idx];
    }

    fn persist_config(&self) {
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                log::warn!(target: "config", "could not persist config {}: {}", path.display(), e);
            }
        }
    }
}
