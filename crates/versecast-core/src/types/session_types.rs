//! Editor session state types

use super::LineTypeId;
use serde::{Deserialize, Serialize};

/// What the operator currently has selected on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Line(LineTypeId),
    Reference(LineTypeId),
    Box(String),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_box(&self, box_id: &str) -> bool {
        matches!(self, Self::Box(id) if id == box_id)
    }
}

/// Save indicator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
}

/// The two reorderable collections of a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Entries of `line_order`
    Line,
    /// Entries of `background_boxes`
    Box,
}
