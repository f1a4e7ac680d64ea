//! Reversible edit commands against the map model.
//!
//! Every mutation of the map flows through [`ActionManager::perform`] so the
//! whole editing history stays undoable. A batch delete is a single entry:
//! one undo restores everything the gesture removed.

use std::collections::VecDeque;

use solstice_types::{EditorLayer, HitObject, HitObjectId, LayerId, MapModel};

/// An edit command issued by the composition controller.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    PlaceHitObject { lane: u8, time: i32 },
    /// Place a long note whose end is unresolved until a follow-up
    /// [`EditAction::ResizeLongNote`].
    PlaceLongNote { lane: u8, start_time: i32 },
    ResizeLongNote { id: HitObjectId, end_time: i32 },
    DeleteHitObject { id: HitObjectId },
    /// Delete a snapshot of objects as one undoable unit.
    DeleteHitObjectBatch { ids: Vec<HitObjectId> },
    /// Remove a layer and every object on it. Layer 0 is refused.
    RemoveLayer { layer: LayerId },
}

/// Record of an applied command, holding exactly the state needed to revert
/// it. Reverting produces the record for the opposite direction.
#[derive(Debug, Clone)]
enum AppliedAction {
    Placed { ids: Vec<HitObjectId> },
    Resized { id: HitObjectId, before: Option<i32>, after: Option<i32> },
    Removed { objects: Vec<HitObject> },
    LayerRemoved { index: usize, layer: EditorLayer, objects: Vec<HitObject> },
    LayerRestored { index: usize },
}

/// Executes edit commands and owns the undo/redo stacks.
pub struct ActionManager {
    undo_stack: VecDeque<AppliedAction>,
    redo_stack: VecDeque<AppliedAction>,
    max_depth: usize,
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new(500)
    }
}

impl ActionManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    /// Apply a command to the map. Returns the id of the object the command
    /// created or resized, when there is one.
    ///
    /// Commands referencing objects that no longer exist are skipped with a
    /// warning instead of corrupting the history.
    pub fn perform(&mut self, map: &mut MapModel, action: EditAction) -> Option<HitObjectId> {
        let (applied, result) = match action {
            EditAction::PlaceHitObject { lane, time } => {
                let id = map.place(lane, time, None);
                (AppliedAction::Placed { ids: vec![id] }, Some(id))
            }
            EditAction::PlaceLongNote { lane, start_time } => {
                let id = map.place(lane, start_time, None);
                (AppliedAction::Placed { ids: vec![id] }, Some(id))
            }
            EditAction::ResizeLongNote { id, end_time } => {
                let Some(object) = map.object_mut(id) else {
                    log::warn!("resize of missing hit object {} skipped", id);
                    return None;
                };
                debug_assert!(end_time > object.start_time);
                let before = object.end_time;
                object.end_time = Some(end_time);
                (AppliedAction::Resized { id, before, after: Some(end_time) }, Some(id))
            }
            EditAction::DeleteHitObject { id } => {
                let Some(object) = map.remove(id) else {
                    log::warn!("delete of missing hit object {} skipped", id);
                    return None;
                };
                (AppliedAction::Removed { objects: vec![object] }, None)
            }
            EditAction::DeleteHitObjectBatch { ids } => {
                let objects: Vec<HitObject> =
                    ids.into_iter().filter_map(|id| map.remove(id)).collect();
                if objects.is_empty() {
                    return None;
                }
                (AppliedAction::Removed { objects }, None)
            }
            EditAction::RemoveLayer { layer } => {
                if layer.get() == 0 || layer.get() >= map.layers.len() {
                    log::warn!("refusing to remove layer {}", layer);
                    return None;
                }
                let index = layer.get();
                let (removed, objects) = map.remove_layer(layer);
                (AppliedAction::LayerRemoved { index, layer: removed, objects }, None)
            }
        };

        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(applied);
        self.redo_stack.clear();
        result
    }

    /// Revert the most recent command. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self, map: &mut MapModel) -> bool {
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        let inverse = revert(entry, map);
        self.redo_stack.push_back(inverse);
        true
    }

    /// Re-apply the most recently undone command.
    pub fn redo(&mut self, map: &mut MapModel) -> bool {
        let Some(entry) = self.redo_stack.pop_back() else {
            return false;
        };
        let inverse = revert(entry, map);
        self.undo_stack.push_back(inverse);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Apply the inverse of a record onto the map and return the record that
/// redoes it.
fn revert(entry: AppliedAction, map: &mut MapModel) -> AppliedAction {
    match entry {
        AppliedAction::Placed { ids } => {
            let objects = ids.into_iter().filter_map(|id| map.remove(id)).collect();
            AppliedAction::Removed { objects }
        }
        AppliedAction::Removed { objects } => {
            let ids = objects.iter().map(|o| o.id).collect();
            for object in objects {
                map.restore(object);
            }
            AppliedAction::Placed { ids }
        }
        AppliedAction::Resized { id, before, after } => {
            if let Some(object) = map.object_mut(id) {
                object.end_time = before;
            }
            AppliedAction::Resized { id, before: after, after: before }
        }
        AppliedAction::LayerRemoved { index, layer, objects } => {
            map.restore_layer(index, layer, objects);
            AppliedAction::LayerRestored { index }
        }
        AppliedAction::LayerRestored { index } => {
            let (layer, objects) = map.remove_layer(LayerId::new(index));
            AppliedAction::LayerRemoved { index, layer, objects }
        }
    }
}
