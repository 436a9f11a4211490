//! Drag-and-drop reordering of line order and background boxes
//!
//! Pointer handling stays in the UI; it reports three commands
//! (`start_drag`, `drag_over`, `drop`/`end_drag`) and the engine decides what,
//! if anything, moves.

use crate::types::LayerKind;
use tracing::debug;

/// The element being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub kind: LayerKind,
    pub id: String,
    pub source_index: usize,
}

/// Drag state machine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
    /// Hovering a drop target; a rendering hint only
    DragOver {
        drag: ActiveDrag,
        target_index: usize,
    },
}

impl DragState {
    pub fn active(&self) -> Option<&ActiveDrag> {
        match self {
            Self::Idle => None,
            Self::Dragging(drag) | Self::DragOver { drag, .. } => Some(drag),
        }
    }
}

/// A move the session should apply to one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerMove {
    pub kind: LayerKind,
    pub id: String,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Default)]
pub struct LayerReorderEngine {
    state: DragState,
}

impl LayerReorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.active().is_some()
    }

    /// Begin a drag; an already active drag is replaced
    pub fn start_drag(&mut self, kind: LayerKind, id: impl Into<String>, source_index: usize) {
        let drag = ActiveDrag {
            kind,
            id: id.into(),
            source_index,
        };
        if let Some(previous) = self.state.active() {
            debug!("Replacing active drag of '{}'", previous.id);
        }
        self.state = DragState::Dragging(drag);
    }

    /// Hover over a target; ignored without a drag of the same kind
    pub fn drag_over(&mut self, kind: LayerKind, target_index: usize) {
        let drag = match self.state.active() {
            Some(drag) if drag.kind == kind => drag.clone(),
            _ => return,
        };
        self.state = DragState::DragOver { drag, target_index };
    }

    /// Index currently hovered for `kind`, if any
    pub fn hover_target(&self, kind: LayerKind) -> Option<usize> {
        match &self.state {
            DragState::DragOver { drag, target_index } if drag.kind == kind => Some(*target_index),
            _ => None,
        }
    }

    /// Drop at `target_index`, always returning to idle
    ///
    /// Yields a move only for a drag of the same kind onto a different index.
    pub fn drop(&mut self, kind: LayerKind, target_index: usize) -> Option<LayerMove> {
        let drag = match std::mem::take(&mut self.state) {
            DragState::Idle => return None,
            DragState::Dragging(drag) | DragState::DragOver { drag, .. } => drag,
        };

        if drag.kind != kind {
            debug!("Ignoring {:?} drop for a {:?} drag", kind, drag.kind);
            return None;
        }
        if drag.source_index == target_index {
            return None;
        }

        Some(LayerMove {
            kind,
            id: drag.id,
            from: drag.source_index,
            to: target_index,
        })
    }

    /// Drag-end signal; unconditional cancel
    pub fn end_drag(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Move the element at `from` so it ends up at `to`
///
/// `to` indexes the sequence after removal, so every other element keeps its
/// relative order. Returns false, leaving `items` untouched, when nothing
/// moves or an index is out of range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
