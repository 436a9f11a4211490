//! Canonical theme -> persisted record

use crate::types::{LinePosition, LineStyle, ReferenceLine, Theme, ThemeRecord};

/// Full record, including the store-owned `id` and `isBuiltIn` fields
pub fn to_record(theme: &Theme) -> ThemeRecord {
    let mut record = to_write_payload(theme);
    record.id = Some(theme.id.clone());
    record.is_built_in = Some(theme.is_built_in);
    record
}

/// Record as sent to create/update, without store-owned fields
pub fn to_write_payload(theme: &Theme) -> ThemeRecord {
    let (reference_position, reference_style) = split(theme.reference.as_ref());
    let (reference_english_position, reference_english_style) =
        split(theme.reference_english.as_ref());

    ThemeRecord {
        id: None,
        is_built_in: None,
        name: theme.name.clone(),
        viewer_background: theme.viewer_background.clone(),
        canvas_dimensions: theme.canvas_dimensions,
        line_order: theme.line_order.clone(),
        line_positions: theme.line_positions.clone(),
        line_styles: theme.line_styles.clone(),
        reference_position,
        reference_style,
        reference_english_position,
        reference_english_style,
        background_boxes: theme.background_boxes.clone(),
    }
}

fn split(line: Option<&ReferenceLine>) -> (Option<LinePosition>, Option<LineStyle>) {
    match line {
        Some(line) => (Some(line.position), Some(line.style.clone())),
        None => (None, None),
    }
}
