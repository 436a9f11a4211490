//! Background box management

use super::EditorSession;
use crate::error::{Result, ValidationError};
use crate::types::{BackgroundBox, Selection};
use tracing::{debug, info, warn};

/// Offset between successive boxes so new ones never sit exactly on top of each other
const BOX_STAGGER: f64 = 5.0;

/// Geometry for the box inserted at `index`
pub(crate) fn default_box(id: String, index: usize) -> BackgroundBox {
    let offset = BOX_STAGGER * index as f64;
    BackgroundBox {
        id,
        x: 10.0 + offset,
        y: 10.0 + offset,
        width: 30.0,
        height: 20.0,
        color: "#000000".to_string(),
        opacity: 0.5,
        border_radius: 8.0,
    }
}

impl EditorSession {
    /// Append a new box and select it, returning its id
    pub fn add_box(&mut self) -> Result<String> {
        let max = self.config.box_capacity();
        let count = self.theme.background_boxes.len();
        if count >= max {
            warn!("Rejecting background box: {} of {} already placed", count, max);
            return Err(ValidationError::CapacityExceeded { max }.into());
        }

        let id = format!("box-{}", uuid::Uuid::new_v4());
        let slot = self.free_stagger_slot();
        self.theme
            .background_boxes
            .push(default_box(id.clone(), slot));
        info!("Added background box {}", id);

        self.selection = Selection::Box(id.clone());
        self.mark_dirty();
        Ok(id)
    }

    /// Replace the box with the same id in place
    pub fn update_box(&mut self, updated: BackgroundBox) {
        match self
            .theme
            .background_boxes
            .iter_mut()
            .find(|b| b.id == updated.id)
        {
            Some(existing) => *existing = updated,
            None => debug!("Update for unknown background box {}", updated.id),
        }
        self.mark_dirty();
    }

    /// First stagger step whose origin no existing box sits on
    fn free_stagger_slot(&self) -> usize {
        let boxes = &self.theme.background_boxes;
        (0..=boxes.len())
            .find(|&slot| {
                let origin = default_box(String::new(), slot);
                !boxes.iter().any(|b| b.x == origin.x && b.y == origin.y)
            })
            .unwrap_or(boxes.len())
    }

    pub fn delete_box(&mut self, id: &str) {
        let before = self.theme.background_boxes.len();
        self.theme.background_boxes.retain(|b| b.id != id);
        if self.theme.background_boxes.len() < before {
            info!("Deleted background box {}", id);
        }

        if self.selection.is_box(id) {
            self.selection = Selection::None;
        }
        self.mark_dirty();
    }
}
