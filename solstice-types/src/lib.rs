//! # solstice-types
//!
//! Shared type definitions for the Solstice editor ecosystem.
//! This crate contains the chart data model and composition types used
//! across solstice-core and solstice-audio.

pub mod composition;
pub mod map;
pub mod notification;

pub use composition::{CompositionTool, InputSource, NoteVisual, VisualizationGraph};
pub use map::{EditorLayer, HitObject, MapModel};
pub use notification::{Notification, NotificationLevel};

/// Unique identifier for a hit object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct HitObjectId(u64);

impl HitObjectId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for HitObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of an editor layer. Layer 0 is the default layer and always exists.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(usize);

impl LayerId {
    pub fn new(idx: usize) -> Self {
        Self(idx)
    }
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keymode of a chart. The lane count is fixed by the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameMode {
    Keys4,
    Keys7,
}

impl GameMode {
    pub fn key_count(self) -> u8 {
        match self {
            GameMode::Keys4 => 4,
            GameMode::Keys7 => 7,
        }
    }
}

/// Direction the playfield scrolls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Down,
    Up,
    /// Half the lanes scroll down, the other half up. Gameplay-only; the
    /// editor toggle never produces this value.
    Split,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_counts() {
        assert_eq!(GameMode::Keys4.key_count(), 4);
        assert_eq!(GameMode::Keys7.key_count(), 7);
    }

    #[test]
    fn hit_object_id_display() {
        assert_eq!(HitObjectId::new(42).to_string(), "42");
        assert_eq!(HitObjectId::new(42).get(), 42);
    }
}
