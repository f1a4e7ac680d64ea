//! Chart data model: hit objects, editor layers, and the map that owns them.
//!
//! The map is only ever mutated through the action manager in solstice-core,
//! so every structural change stays reversible.

use serde::{Deserialize, Serialize};

use crate::{GameMode, HitObjectId, LayerId};

/// A placed note. `end_time` is present only for long notes whose release has
/// been committed; a pending long note still has `end_time == None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitObject {
    pub id: HitObjectId,
    /// Start time in milliseconds.
    pub start_time: i32,
    /// Release time in milliseconds. Invariant: strictly greater than
    /// `start_time` when present.
    pub end_time: Option<i32>,
    /// 1-based lane index.
    pub lane: u8,
    pub layer: LayerId,
}

impl HitObject {
    pub fn is_long_note(&self) -> bool {
        self.end_time.is_some()
    }
}

/// A named, independently hideable grouping of hit objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorLayer {
    pub name: String,
    pub hidden: bool,
}

impl EditorLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), hidden: false }
    }
}

/// Ordered collection of hit objects plus the layer list. Objects are kept
/// sorted by `(start_time, lane)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapModel {
    pub mode: GameMode,
    pub hit_objects: Vec<HitObject>,
    pub layers: Vec<EditorLayer>,
    /// Layer newly placed objects are assigned to.
    pub active_layer: LayerId,
    /// Primary timing point: beats per minute and its offset in ms.
    pub bpm: f32,
    pub offset_ms: f64,
    next_id: u64,
}

impl MapModel {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            hit_objects: Vec::new(),
            layers: vec![EditorLayer::new("Default")],
            active_layer: LayerId::default(),
            bpm: 120.0,
            offset_ms: 0.0,
            next_id: 0,
        }
    }

    pub fn key_count(&self) -> u8 {
        self.mode.key_count()
    }

    /// Place a new object on the active layer, keeping the collection sorted.
    pub fn place(&mut self, lane: u8, start_time: i32, end_time: Option<i32>) -> HitObjectId {
        let id = HitObjectId::new(self.next_id);
        self.next_id += 1;
        let object = HitObject { id, start_time, end_time, lane, layer: self.active_layer };
        let idx = self.insertion_index(start_time, lane);
        self.hit_objects.insert(idx, object);
        id
    }

    /// Reinsert a previously removed object, preserving its id.
    pub fn restore(&mut self, object: HitObject) {
        if object.id.get() >= self.next_id {
            self.next_id = object.id.get() + 1;
        }
        let idx = self.insertion_index(object.start_time, object.lane);
        self.hit_objects.insert(idx, object);
    }

    pub fn remove(&mut self, id: HitObjectId) -> Option<HitObject> {
        let idx = self.hit_objects.iter().position(|o| o.id == id)?;
        Some(self.hit_objects.remove(idx))
    }

    pub fn object(&self, id: HitObjectId) -> Option<&HitObject> {
        self.hit_objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: HitObjectId) -> Option<&mut HitObject> {
        self.hit_objects.iter_mut().find(|o| o.id == id)
    }

    /// Object whose `(start_time, lane)` exactly matches. Used for keyboard
    /// placement, where the existing-object check is an exact-time match.
    pub fn object_at(&self, start_time: i32, lane: u8) -> Option<&HitObject> {
        self.hit_objects
            .iter()
            .find(|o| o.start_time == start_time && o.lane == lane)
    }

    pub fn layer(&self, id: LayerId) -> Option<&EditorLayer> {
        self.layers.get(id.get())
    }

    pub fn is_layer_hidden(&self, id: LayerId) -> bool {
        self.layer(id).is_some_and(|l| l.hidden)
    }

    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        self.layers.push(EditorLayer::new(name));
        LayerId::new(self.layers.len() - 1)
    }

    /// Remove a layer along with every object on it. Objects on later layers
    /// are shifted down one index. The default layer (0) cannot be removed;
    /// callers guard against that before getting here.
    pub fn remove_layer(&mut self, id: LayerId) -> (EditorLayer, Vec<HitObject>) {
        let idx = id.get();
        let layer = self.layers.remove(idx);
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.hit_objects.len() {
            if self.hit_objects[i].layer == id {
                removed.push(self.hit_objects.remove(i));
            } else {
                if self.hit_objects[i].layer.get() > idx {
                    self.hit_objects[i].layer = LayerId::new(self.hit_objects[i].layer.get() - 1);
                }
                i += 1;
            }
        }
        if self.active_layer.get() >= self.layers.len() {
            self.active_layer = LayerId::default();
        }
        (layer, removed)
    }

    /// Undo counterpart of [`remove_layer`]: reinsert the layer at its old
    /// index, shift later layer references back up, and restore the objects.
    pub fn restore_layer(&mut self, idx: usize, layer: EditorLayer, objects: Vec<HitObject>) {
        self.layers.insert(idx, layer);
        for object in &mut self.hit_objects {
            if object.layer.get() >= idx {
                object.layer = LayerId::new(object.layer.get() + 1);
            }
        }
        for object in objects {
            self.restore(object);
        }
    }

    fn insertion_index(&self, start_time: i32, lane: u8) -> usize {
        self.hit_objects
            .partition_point(|o| (o.start_time, o.lane) < (start_time, lane))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_keeps_objects_sorted() {
        let mut map = MapModel::new(GameMode::Keys4);
        map.place(2, 1000, None);
        map.place(1, 500, None);
        map.place(3, 1500, None);
        map.place(1, 1000, None);

        let times: Vec<(i32, u8)> =
            map.hit_objects.iter().map(|o| (o.start_time, o.lane)).collect();
        assert_eq!(times, vec![(500, 1), (1000, 1), (1000, 2), (1500, 3)]);
    }

    #[test]
    fn remove_and_restore_round_trip() {
        let mut map = MapModel::new(GameMode::Keys4);
        let id = map.place(1, 1000, Some(1500));
        let removed = map.remove(id).unwrap();
        assert!(map.object(id).is_none());

        map.restore(removed);
        let object = map.object(id).unwrap();
        assert_eq!(object.start_time, 1000);
        assert_eq!(object.end_time, Some(1500));
    }

    #[test]
    fn restore_does_not_reuse_ids() {
        let mut map = MapModel::new(GameMode::Keys4);
        let id = map.place(1, 1000, None);
        let removed = map.remove(id).unwrap();
        map.restore(removed);

        let next = map.place(2, 2000, None);
        assert_ne!(next, id);
    }

    #[test]
    fn object_at_requires_exact_match() {
        let mut map = MapModel::new(GameMode::Keys4);
        let id = map.place(3, 1000, None);
        assert_eq!(map.object_at(1000, 3).map(|o| o.id), Some(id));
        assert!(map.object_at(1001, 3).is_none());
        assert!(map.object_at(1000, 2).is_none());
    }

    #[test]
    fn remove_layer_shifts_later_references() {
        let mut map = MapModel::new(GameMode::Keys4);
        let middle = map.add_layer("Middle");
        let top = map.add_layer("Top");

        map.active_layer = middle;
        let on_middle = map.place(1, 100, None);
        map.active_layer = top;
        let on_top = map.place(2, 200, None);
        map.active_layer = LayerId::default();
        let on_default = map.place(3, 300, None);

        let (layer, removed) = map.remove_layer(middle);
        assert_eq!(layer.name, "Middle");
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, on_middle);

        // The top layer moved down to index 1.
        assert_eq!(map.object(on_top).unwrap().layer, LayerId::new(1));
        assert_eq!(map.object(on_default).unwrap().layer, LayerId::default());

        map.restore_layer(middle.get(), layer, removed);
        assert_eq!(map.layers.len(), 3);
        assert_eq!(map.object(on_middle).unwrap().layer, middle);
        assert_eq!(map.object(on_top).unwrap().layer, top);
    }

    #[test]
    fn remove_active_layer_falls_back_to_default() {
        let mut map = MapModel::new(GameMode::Keys4);
        let extra = map.add_layer("Extra");
        map.active_layer = extra;
        map.remove_layer(extra);
        assert_eq!(map.active_layer, LayerId::default());
    }
}
