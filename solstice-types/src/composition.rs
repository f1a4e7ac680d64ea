//! Composition tool, visualization graph, and note visual-state enums.

use serde::{Deserialize, Serialize};

/// The selected tool while compositing the map. Ordered for up/down
/// navigation, which clamps at the ends rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositionTool {
    Select,
    Note,
    LongNote,
    Mine,
}

impl CompositionTool {
    pub const ALL: [CompositionTool; 4] = [
        CompositionTool::Select,
        CompositionTool::Note,
        CompositionTool::LongNote,
        CompositionTool::Mine,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }

    /// Previous tool in navigation order, or `None` at the first tool.
    pub fn prev(self) -> Option<CompositionTool> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Next tool in navigation order, or `None` at the last tool.
    pub fn next(self) -> Option<CompositionTool> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            CompositionTool::Select => "Select",
            CompositionTool::Note => "Note",
            CompositionTool::LongNote => "Long Note",
            CompositionTool::Mine => "Mine",
        }
    }
}

/// Auxiliary visualization view selector. Same clamped navigation as the
/// composition tool; rendering of the graphs themselves is external.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualizationGraph {
    Tick,
    Density,
}

impl VisualizationGraph {
    pub const ALL: [VisualizationGraph; 2] =
        [VisualizationGraph::Tick, VisualizationGraph::Density];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&g| g == self).unwrap_or(0)
    }

    pub fn prev(self) -> Option<VisualizationGraph> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn next(self) -> Option<VisualizationGraph> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

/// Visual state the rendering layer applies to a drawable hit object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteVisual {
    Active,
    /// Shown as dead/inactive: a long note awaiting its release position.
    Inactive,
    Selected,
    HiddenInLayer,
}

/// Which device produced a primary composition action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    Keyboard,
    Pointer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_navigation_clamps_at_bounds() {
        assert_eq!(CompositionTool::Select.prev(), None);
        assert_eq!(CompositionTool::Mine.next(), None);
        assert_eq!(CompositionTool::Select.next(), Some(CompositionTool::Note));
        assert_eq!(CompositionTool::Mine.prev(), Some(CompositionTool::LongNote));
    }

    #[test]
    fn graph_navigation_clamps_at_bounds() {
        assert_eq!(VisualizationGraph::Tick.prev(), None);
        assert_eq!(VisualizationGraph::Density.next(), None);
        assert_eq!(VisualizationGraph::Tick.next(), Some(VisualizationGraph::Density));
    }
}
