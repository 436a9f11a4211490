//! Core type definitions for VerseCast
//!
//! This module contains all shared types used across the engine,
//! including layout primitives, theme records, session state and
//! editor configuration.

mod layout_types;
mod session_types;
mod theme_types;

pub use layout_types::*;
pub use session_types::*;
pub use theme_types::*;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard upper bound on background boxes per theme
pub const MAX_BACKGROUND_BOXES: usize = 3;

/// Editor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// How long the "saved" indicator stays up before reverting to idle
    pub saved_status_display_ms: u64,
    /// Background box limit; never above [`MAX_BACKGROUND_BOXES`]
    pub max_background_boxes: usize,
}

impl EditorConfig {
    pub fn saved_status_display(&self) -> Duration {
        Duration::from_millis(self.saved_status_display_ms)
    }

    pub fn box_capacity(&self) -> usize {
        self.max_background_boxes.min(MAX_BACKGROUND_BOXES)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            saved_status_display_ms: 2000,
            max_background_boxes: MAX_BACKGROUND_BOXES,
        }
    }
}
