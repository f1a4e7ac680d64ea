//! Hit-object composition controller.
//!
//! Translates pointer/keyboard events into reversible edit commands. The one
//! genuinely stateful protocol here is the pending long-note release: placing
//! a long note parks it in a per-lane slot until a second action in the same
//! lane commits (or cancels) its end position. The lane acts as the session
//! key, so interleaved placements in other lanes do not interfere.

pub mod snap;

use crossbeam_channel::{unbounded, Receiver, Sender};

use solstice_types::{
    CompositionTool, GameMode, HitObjectId, InputSource, MapModel, Notification, NoteVisual,
    ScrollDirection, VisualizationGraph,
};

use crate::actions::{ActionManager, EditAction};
use crate::config::Config;

/// Upper bound on the lane count across all modes.
pub const MAX_KEYS: usize = 7;

/// Events the controller pushes to the UI layer: transient notices,
/// visual-state marks for drawables, and tool/view change notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositionEvent {
    Notice(Notification),
    ToolChanged(CompositionTool),
    GraphChanged(VisualizationGraph),
    Visual { id: HitObjectId, visual: NoteVisual },
}

/// Owns the current tool, the per-lane pending-release slots, and the
/// selection. All rejections surface as notices over the event channel;
/// nothing here returns an error or panics on user input.
pub struct CompositionRuleset {
    tool: CompositionTool,
    graph: VisualizationGraph,
    /// Indexed by `lane - 1`; only the first `key_count` slots are used.
    pending_releases: [Option<HitObjectId>; MAX_KEYS],
    selection: Vec<HitObjectId>,
    events: Sender<CompositionEvent>,
}

impl CompositionRuleset {
    pub fn new(events: Sender<CompositionEvent>) -> Self {
        Self {
            tool: CompositionTool::Select,
            graph: VisualizationGraph::Tick,
            pending_releases: [None; MAX_KEYS],
            selection: Vec::new(),
            events,
        }
    }

    /// Construct with a fresh unbounded channel, returning the receiver.
    pub fn with_channel() -> (Self, Receiver<CompositionEvent>) {
        let (tx, rx) = unbounded();
        (Self::new(tx), rx)
    }

    pub fn tool(&self) -> CompositionTool {
        self.tool
    }

    pub fn graph(&self) -> VisualizationGraph {
        self.graph
    }

    pub fn selection(&self) -> &[HitObjectId] {
        &self.selection
    }

    pub fn pending_release(&self, lane: u8) -> Option<HitObjectId> {
        let slot = (lane as usize).checked_sub(1)?;
        self.pending_releases.get(slot).copied().flatten()
    }

    /// Primary action: place, delete, or resolve a pending release at the
    /// given lane/time. Pointer callers pass the object hit-tested under the
    /// cursor; keyboard callers pass `None` and the exact-time match is used.
    pub fn place_object(
        &mut self,
        map: &mut MapModel,
        actions: &mut ActionManager,
        source: InputSource,
        lane: u8,
        time: f64,
        hovered: Option<HitObjectId>,
    ) {
        if lane == 0 || lane > map.key_count() {
            return;
        }

        if self.resolve_pending_release(map, actions, lane, time) {
            return;
        }

        let existing = match source {
            InputSource::Keyboard => map.object_at(time.floor() as i32, lane).map(|o| o.id),
            InputSource::Pointer => hovered,
        };

        let Some(existing) = existing else {
            self.place_new_object(map, actions, lane, time);
            return;
        };

        // An object already sits here. Keyboard input deletes it; pointer
        // input never deletes on the primary action (that is the secondary
        // action's job).
        if source == InputSource::Keyboard {
            actions.perform(map, EditAction::DeleteHitObject { id: existing });
        }
    }

    fn place_new_object(
        &mut self,
        map: &mut MapModel,
        actions: &mut ActionManager,
        lane: u8,
        time: f64,
    ) {
        let start_time = time.floor() as i32;
        match self.tool {
            CompositionTool::Note => {
                actions.perform(map, EditAction::PlaceHitObject { lane, time: start_time });
            }
            CompositionTool::LongNote => {
                let Some(id) =
                    actions.perform(map, EditAction::PlaceLongNote { lane, start_time })
                else {
                    return;
                };
                // Future placements in this lane resolve this note's end.
                self.pending_releases[lane as usize - 1] = Some(id);
                self.emit_visual(id, NoteVisual::Inactive);
                self.notify(Notification::info(
                    "Scroll through the timeline and place the end of the long note.",
                ));
            }
            CompositionTool::Select => {}
            CompositionTool::Mine => {
                self.notify(Notification::error(
                    "This tool isn't implemented yet. Choose another!",
                ));
            }
        }
    }

    /// Resolve a pending long-note release in this lane, if any. Returns true
    /// when the input was consumed.
    pub fn resolve_pending_release(
        &mut self,
        map: &mut MapModel,
        actions: &mut ActionManager,
        lane: u8,
        time: f64,
    ) -> bool {
        let Some(slot) = (lane as usize).checked_sub(1).filter(|&s| s < MAX_KEYS) else {
            return false;
        };
        let Some(id) = self.pending_releases[slot] else {
            return false;
        };
        let Some(pending) = map.object(id) else {
            // The pending note was removed underneath us (e.g. by a batch
            // delete). Drop the stale slot and let normal handling proceed.
            self.pending_releases[slot] = None;
            return false;
        };

        let release = time.floor() as i32;

        if release < pending.start_time {
            self.notify(Notification::error(
                "You need to select a position later than the start time",
            ));
            return true;
        }

        // Still on the starting position: un-pend and fall through so the
        // caller's normal deletion path can remove the note.
        if release == pending.start_time {
            self.pending_releases[slot] = None;
            return false;
        }

        self.pending_releases[slot] = None;
        actions.perform(map, EditAction::ResizeLongNote { id, end_time: release });

        let hidden = map.object(id).is_some_and(|o| map.is_layer_hidden(o.layer));
        self.emit_visual(id, if hidden { NoteVisual::HiddenInLayer } else { NoteVisual::Active });
        true
    }

    /// Secondary action: delete the object under the cursor. Clears a pending
    /// slot that references it first.
    pub fn delete_hovered(
        &mut self,
        map: &mut MapModel,
        actions: &mut ActionManager,
        hovered: Option<HitObjectId>,
    ) {
        let Some(id) = hovered else {
            return;
        };
        if let Some(object) = map.object(id) {
            let slot = object.lane as usize - 1;
            if self.pending_releases.get(slot).copied().flatten() == Some(id) {
                self.pending_releases[slot] = None;
            }
        }
        self.selection.retain(|&s| s != id);
        actions.perform(map, EditAction::DeleteHitObject { id });
    }

    /// Select-tool click. `multi_select` is the modifier chord (control held).
    pub fn handle_selection(
        &mut self,
        map: &MapModel,
        hovered: Option<HitObjectId>,
        multi_select: bool,
    ) {
        let Some(hovered) = hovered else {
            self.deselect_all(map);
            return;
        };

        if !self.selection.contains(&hovered) {
            self.emit_visual(hovered, NoteVisual::Selected);
            self.selection.push(hovered);
        }

        if multi_select {
            return;
        }

        // Single-select: everything except the clicked object goes back to
        // its resting visual state.
        let others: Vec<HitObjectId> =
            self.selection.iter().copied().filter(|&id| id != hovered).collect();
        for id in others {
            self.deselect(map, id);
        }
    }

    pub fn deselect_all(&mut self, map: &MapModel) {
        let all: Vec<HitObjectId> = self.selection.clone();
        for id in all {
            self.deselect(map, id);
        }
    }

    fn deselect(&mut self, map: &MapModel, id: HitObjectId) {
        let visual = if self.pending_releases.contains(&Some(id)) {
            NoteVisual::Inactive
        } else if map.object(id).is_some_and(|o| map.is_layer_hidden(o.layer)) {
            NoteVisual::HiddenInLayer
        } else {
            NoteVisual::Active
        };
        self.emit_visual(id, visual);
        self.selection.retain(|&s| s != id);
    }

    /// Delete every selected object as one undoable batch.
    pub fn delete_selection(&mut self, map: &mut MapModel, actions: &mut ActionManager) {
        if self.selection.is_empty() {
            return;
        }
        let snapshot = self.selection.clone();
        actions.perform(map, EditAction::DeleteHitObjectBatch { ids: snapshot });
        self.selection.clear();
    }

    /// Clamped tool navigation. The modifier chord is reserved for beat-snap
    /// changes, so navigation is a no-op while it is held.
    pub fn tool_up(&mut self, modifier_held: bool) {
        if modifier_held {
            return;
        }
        if let Some(prev) = self.tool.prev() {
            self.tool = prev;
            let _ = self.events.send(CompositionEvent::ToolChanged(self.tool));
        }
    }

    pub fn tool_down(&mut self, modifier_held: bool) {
        if modifier_held {
            return;
        }
        if let Some(next) = self.tool.next() {
            self.tool = next;
            let _ = self.events.send(CompositionEvent::ToolChanged(self.tool));
        }
    }

    /// Tool-button selection from the toolkit.
    pub fn set_tool(&mut self, tool: CompositionTool) {
        if self.tool != tool {
            self.tool = tool;
            let _ = self.events.send(CompositionEvent::ToolChanged(self.tool));
        }
    }

    pub fn graph_up(&mut self, modifier_held: bool) {
        if modifier_held {
            return;
        }
        if let Some(prev) = self.graph.prev() {
            self.graph = prev;
            let _ = self.events.send(CompositionEvent::GraphChanged(self.graph));
        }
    }

    pub fn graph_down(&mut self, modifier_held: bool) {
        if modifier_held {
            return;
        }
        if let Some(next) = self.graph.next() {
            self.graph = next;
            let _ = self.events.send(CompositionEvent::GraphChanged(self.graph));
        }
    }

    fn notify(&self, notification: Notification) {
        let _ = self.events.send(CompositionEvent::Notice(notification));
    }

    fn emit_visual(&self, id: HitObjectId, visual: NoteVisual) {
        let _ = self.events.send(CompositionEvent::Visual { id, visual });
    }
}

/// Flip the persisted scroll direction for the given mode and return the new
/// value. The editor toggle only ever produces `Down` or `Up`.
pub fn toggle_scroll_direction(config: &mut Config, mode: GameMode) -> ScrollDirection {
    let direction = match mode {
        GameMode::Keys4 => &mut config.scroll_direction_4k,
        GameMode::Keys7 => &mut config.scroll_direction_7k,
    };
    *direction = if *direction != ScrollDirection::Down {
        ScrollDirection::Down
    } else {
        ScrollDirection::Up
    };
    *direction
}

/// Y position of the fixed hit-position indicator line for a direction.
/// `hit_position_y` is measured from the bottom of the viewport.
pub fn hit_position_line_y(
    direction: ScrollDirection,
    window_height: f32,
    hit_position_y: f32,
) -> f32 {
    match direction {
        ScrollDirection::Split | ScrollDirection::Down => hit_position_y,
        ScrollDirection::Up => window_height - hit_position_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solstice_types::NotificationLevel;

    fn setup() -> (MapModel, ActionManager, CompositionRuleset, Receiver<CompositionEvent>) {
        let (ruleset, rx) = CompositionRuleset::with_channel();
        (MapModel::new(GameMode::Keys7), ActionManager::default(), ruleset, rx)
    }

    fn notices(rx: &Receiver<CompositionEvent>) -> Vec<Notification> {
        rx.try_iter()
            .filter_map(|e| match e {
                CompositionEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn last_visual(rx: &Receiver<CompositionEvent>, id: HitObjectId) -> Option<NoteVisual> {
        rx.try_iter()
            .filter_map(|e| match e {
                CompositionEvent::Visual { id: v, visual } if v == id => Some(visual),
                _ => None,
            })
            .last()
    }

    #[test]
    fn note_tool_places_single_note_without_pending_state() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::Note);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 2, 1000.0, None);

        assert_eq!(map.hit_objects.len(), 1);
        let object = &map.hit_objects[0];
        assert_eq!((object.start_time, object.lane), (1000, 2));
        assert!(object.end_time.is_none());
        assert!(ruleset.pending_release(2).is_none());
    }

    #[test]
    fn long_note_placement_marks_pending_and_inactive() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);

        let id = ruleset.pending_release(3).unwrap();
        assert!(map.object(id).unwrap().end_time.is_none());
        assert_eq!(last_visual(&rx, id), Some(NoteVisual::Inactive));
    }

    #[test]
    fn long_note_resolution_commits_end_and_clears_slot() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);
        let id = ruleset.pending_release(3).unwrap();

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1500.0, None);

        let object = map.object(id).unwrap();
        assert_eq!((object.lane, object.start_time, object.end_time), (3, 1000, Some(1500)));
        assert!(ruleset.pending_release(3).is_none());
        assert_eq!(last_visual(&rx, id), Some(NoteVisual::Active));
    }

    #[test]
    fn second_action_after_resolution_is_ordinary_placement() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1500.0, None);

        // No stale pending state: this starts a fresh long note.
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 2000.0, None);
        let id = ruleset.pending_release(3).unwrap();
        assert_eq!(map.object(id).unwrap().start_time, 2000);
        assert_eq!(map.hit_objects.len(), 2);
    }

    #[test]
    fn resolution_before_start_is_rejected() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);
        let id = ruleset.pending_release(3).unwrap();
        let _ = notices(&rx);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 500.0, None);

        // Slot and object unchanged, an error notice was emitted.
        assert_eq!(ruleset.pending_release(3), Some(id));
        assert!(map.object(id).unwrap().end_time.is_none());
        assert_eq!(map.hit_objects.len(), 1);
        let ns = notices(&rx);
        assert_eq!(ns.len(), 1);
        assert_eq!(ns[0].level, NotificationLevel::Error);
    }

    #[test]
    fn resolution_at_start_cancels_and_deletes() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);
        assert!(ruleset.pending_release(3).is_some());

        // Same position again: the slot clears and the regular keyboard
        // deletion path removes the note.
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);
        assert!(ruleset.pending_release(3).is_none());
        assert!(map.hit_objects.is_empty());
    }

    #[test]
    fn pending_lanes_are_independent() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 1000.0, None);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 2, 1200.0, None);

        let first = ruleset.pending_release(1).unwrap();
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 1600.0, None);

        assert_eq!(map.object(first).unwrap().end_time, Some(1600));
        assert!(ruleset.pending_release(1).is_none());
        assert!(ruleset.pending_release(2).is_some());
    }

    #[test]
    fn keyboard_on_existing_note_deletes_it() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::Note);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 4, 800.0, None);
        assert_eq!(map.hit_objects.len(), 1);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 4, 800.0, None);
        assert!(map.hit_objects.is_empty());
    }

    #[test]
    fn pointer_on_existing_note_is_a_no_op() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::Note);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 4, 800.0, None);
        let id = map.hit_objects[0].id;

        ruleset.place_object(&mut map, &mut am, InputSource::Pointer, 4, 800.0, Some(id));
        assert_eq!(map.hit_objects.len(), 1);
    }

    #[test]
    fn mine_tool_warns_without_mutating() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        ruleset.set_tool(CompositionTool::Mine);
        let _ = notices(&rx);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 100.0, None);
        assert!(map.hit_objects.is_empty());
        let ns = notices(&rx);
        assert_eq!(ns.len(), 1);
        assert_eq!(ns[0].level, NotificationLevel::Error);
    }

    #[test]
    fn out_of_range_lane_is_ignored() {
        let (_, mut am, mut ruleset, _rx) = setup();
        let mut map = MapModel::new(GameMode::Keys4);
        ruleset.set_tool(CompositionTool::Note);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 0, 100.0, None);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 5, 100.0, None);
        assert!(map.hit_objects.is_empty());
    }

    #[test]
    fn secondary_action_clears_matching_pending_slot() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);
        let pending = ruleset.pending_release(3).unwrap();

        ruleset.delete_hovered(&mut map, &mut am, Some(pending));
        assert!(ruleset.pending_release(3).is_none());
        assert!(map.hit_objects.is_empty());
    }

    #[test]
    fn secondary_action_on_other_note_keeps_pending_slot() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::Note);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 200.0, None);
        let plain = map.hit_objects[0].id;

        ruleset.set_tool(CompositionTool::LongNote);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);
        let pending = ruleset.pending_release(3).unwrap();

        ruleset.delete_hovered(&mut map, &mut am, Some(plain));
        assert_eq!(ruleset.pending_release(3), Some(pending));
        assert!(map.object(pending).is_some());
    }

    #[test]
    fn secondary_action_with_no_hover_is_a_no_op() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.delete_hovered(&mut map, &mut am, None);
        assert!(!am.can_undo());
    }

    #[test]
    fn single_select_replaces_previous_selection() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        ruleset.set_tool(CompositionTool::Note);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 100.0, None);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 2, 200.0, None);
        let a = map.hit_objects[0].id;
        let b = map.hit_objects[1].id;

        ruleset.handle_selection(&map, Some(b), false);
        assert_eq!(ruleset.selection(), &[b]);

        ruleset.handle_selection(&map, Some(a), false);
        assert_eq!(ruleset.selection(), &[a]);
        assert_eq!(last_visual(&rx, b), Some(NoteVisual::Active));
    }

    #[test]
    fn multi_select_accumulates() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::Note);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 100.0, None);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 2, 200.0, None);
        let a = map.hit_objects[0].id;
        let b = map.hit_objects[1].id;

        ruleset.handle_selection(&map, Some(a), true);
        ruleset.handle_selection(&map, Some(b), true);
        assert_eq!(ruleset.selection(), &[a, b]);
    }

    #[test]
    fn click_on_empty_space_deselects_all() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        ruleset.set_tool(CompositionTool::Note);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 100.0, None);
        let a = map.hit_objects[0].id;

        ruleset.handle_selection(&map, Some(a), true);
        ruleset.handle_selection(&map, None, false);
        assert!(ruleset.selection().is_empty());
        assert_eq!(last_visual(&rx, a), Some(NoteVisual::Active));
    }

    #[test]
    fn deselection_restores_hidden_layer_visual() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        let layer = map.add_layer("Hidden");
        map.layers[layer.get()].hidden = true;
        map.active_layer = layer;

        ruleset.set_tool(CompositionTool::Note);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 100.0, None);
        let a = map.hit_objects[0].id;

        ruleset.handle_selection(&map, Some(a), true);
        ruleset.handle_selection(&map, None, false);
        assert_eq!(last_visual(&rx, a), Some(NoteVisual::HiddenInLayer));
    }

    #[test]
    fn deselection_restores_pending_visual() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 2, 500.0, None);
        let pending = ruleset.pending_release(2).unwrap();

        ruleset.handle_selection(&map, Some(pending), true);
        ruleset.handle_selection(&map, None, false);
        assert_eq!(last_visual(&rx, pending), Some(NoteVisual::Inactive));
    }

    #[test]
    fn resolution_on_hidden_layer_marks_hidden() {
        let (mut map, mut am, mut ruleset, rx) = setup();
        let layer = map.add_layer("Hidden");
        map.layers[layer.get()].hidden = true;
        map.active_layer = layer;

        ruleset.set_tool(CompositionTool::LongNote);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 100.0, None);
        let id = ruleset.pending_release(1).unwrap();
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 1, 400.0, None);
        assert_eq!(last_visual(&rx, id), Some(NoteVisual::HiddenInLayer));
    }

    #[test]
    fn bulk_delete_is_single_undo_and_clears_selection() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::Note);
        for lane in 1..=3 {
            ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, lane, 100.0, None);
        }
        for object in map.hit_objects.clone() {
            ruleset.handle_selection(&map, Some(object.id), true);
        }

        ruleset.delete_selection(&mut map, &mut am);
        assert!(map.hit_objects.is_empty());
        assert!(ruleset.selection().is_empty());

        assert!(am.undo(&mut map));
        assert_eq!(map.hit_objects.len(), 3);
    }

    #[test]
    fn stale_pending_slot_is_dropped_gracefully() {
        let (mut map, mut am, mut ruleset, _rx) = setup();
        ruleset.set_tool(CompositionTool::LongNote);
        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 1000.0, None);
        let pending = ruleset.pending_release(3).unwrap();

        // The pending note disappears through a path the slot cannot see.
        map.remove(pending);

        ruleset.place_object(&mut map, &mut am, InputSource::Keyboard, 3, 2000.0, None);
        // The slot was dropped and a fresh long note was placed.
        let fresh = ruleset.pending_release(3).unwrap();
        assert_ne!(fresh, pending);
        assert_eq!(map.object(fresh).unwrap().start_time, 2000);
    }

    #[test]
    fn tool_navigation_clamps_and_respects_modifier() {
        let (_, _, mut ruleset, rx) = setup();
        assert_eq!(ruleset.tool(), CompositionTool::Select);

        ruleset.tool_up(false);
        assert_eq!(ruleset.tool(), CompositionTool::Select);

        ruleset.tool_down(true);
        assert_eq!(ruleset.tool(), CompositionTool::Select);

        ruleset.tool_down(false);
        assert_eq!(ruleset.tool(), CompositionTool::Note);
        assert!(rx
            .try_iter()
            .any(|e| e == CompositionEvent::ToolChanged(CompositionTool::Note)));

        for _ in 0..10 {
            ruleset.tool_down(false);
        }
        assert_eq!(ruleset.tool(), CompositionTool::Mine);
    }

    #[test]
    fn graph_navigation_clamps_and_respects_modifier() {
        let (_, _, mut ruleset, _rx) = setup();
        assert_eq!(ruleset.graph(), VisualizationGraph::Tick);

        ruleset.graph_up(false);
        assert_eq!(ruleset.graph(), VisualizationGraph::Tick);

        ruleset.graph_down(true);
        assert_eq!(ruleset.graph(), VisualizationGraph::Tick);

        ruleset.graph_down(false);
        assert_eq!(ruleset.graph(), VisualizationGraph::Density);
        ruleset.graph_down(false);
        assert_eq!(ruleset.graph(), VisualizationGraph::Density);
    }

    #[test]
    fn scroll_direction_toggle_is_per_mode() {
        let mut config = Config::default();
        assert_eq!(config.scroll_direction_4k, ScrollDirection::Down);

        assert_eq!(toggle_scroll_direction(&mut config, GameMode::Keys4), ScrollDirection::Up);
        assert_eq!(config.scroll_direction_4k, ScrollDirection::Up);
        assert_eq!(config.scroll_direction_7k, ScrollDirection::Down);

        assert_eq!(toggle_scroll_direction(&mut config, GameMode::Keys4), ScrollDirection::Down);
    }

    #[test]
    fn hit_position_line_positions() {
        assert_eq!(hit_position_line_y(ScrollDirection::Down, 1080.0, 200.0), 200.0);
        assert_eq!(hit_position_line_y(ScrollDirection::Split, 1080.0, 200.0), 200.0);
        assert_eq!(hit_position_line_y(ScrollDirection::Up, 1080.0, 200.0), 880.0);
    }
}
