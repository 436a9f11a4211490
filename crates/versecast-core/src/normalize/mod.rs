//! Theme normalization
//!
//! Turns whatever a store hands back (current records, records persisted by
//! older releases, hand-edited or imported JSON) into a canonical [`Theme`].
//! Normalization never fails: anything malformed is replaced by the schema
//! default and logged, so the editor can always open.

mod record;

pub use record::{to_record, to_write_payload};

use crate::schema::LineTypeSchema;
use crate::types::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const DEFAULT_THEME_NAME: &str = "Untitled Theme";

/// Build the canonical theme for `schema` from a raw persisted record
pub fn normalize(schema: &LineTypeSchema, raw: &Value) -> Theme {
    let empty = Map::new();
    let fields = match raw {
        Value::Object(fields) => fields,
        Value::Null => &empty,
        other => {
            warn!(
                "Theme record is not an object ({}), using {} defaults",
                json_kind(other),
                schema.variant()
            );
            &empty
        }
    };

    let (line_positions, line_styles) = ordinary_lines(schema, fields);
    let [reference, reference_english] = reference_lines(schema, fields);

    Theme {
        id: string_field(fields, "id").unwrap_or_default(),
        name: string_field(fields, "name").unwrap_or_else(|| DEFAULT_THEME_NAME.to_string()),
        is_built_in: fields
            .get("isBuiltIn")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        variant: schema.variant(),
        viewer_background: valid_field(fields, "viewerBackground").unwrap_or_default(),
        canvas_dimensions: valid_field(fields, "canvasDimensions").unwrap_or_default(),
        line_order: line_order(schema, fields.get("lineOrder")),
        line_positions,
        line_styles,
        reference,
        reference_english,
        background_boxes: background_boxes(fields.get("backgroundBoxes")),
    }
}

/// Normalize against the schema of `variant`
pub fn normalize_for_variant(variant: ThemeVariant, raw: &Value) -> Theme {
    normalize(LineTypeSchema::for_variant(variant), raw)
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => {
            debug!("Ignoring non-string {} ({})", key, json_kind(other));
            None
        }
    }
}

fn valid_field<T>(fields: &Map<String, Value>, key: &str) -> Option<T>
where
    T: DeserializeOwned + Validate,
{
    let value = fields.get(key)?;
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) if parsed.is_valid() => Some(parsed),
        Ok(_) => {
            debug!("Ignoring invalid {}", key);
            None
        }
        Err(e) => {
            debug!("Ignoring malformed {}: {}", key, e);
            None
        }
    }
}

/// Stored order, with any missing schema line appended once
///
/// References go first so a legacy order keeps its familiar tail; ordinary
/// lines a stored order dropped follow them.
fn line_order(schema: &LineTypeSchema, raw: Option<&Value>) -> Vec<LineTypeId> {
    let mut order: Vec<LineTypeId> = match raw {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(LineTypeId::from)
            .collect(),
        _ => schema.default_line_order(),
    };

    for missing in schema
        .reference_types()
        .into_iter()
        .chain(schema.required_ordinary_types())
    {
        if !order.contains(&missing) {
            debug!("Backfilling {} into lineOrder", missing);
            order.push(missing);
        }
    }

    order
}

type LineMaps = (
    BTreeMap<LineTypeId, LinePosition>,
    BTreeMap<LineTypeId, LineStyle>,
);

fn ordinary_lines(schema: &LineTypeSchema, fields: &Map<String, Value>) -> LineMaps {
    let raw_positions = fields.get("linePositions").and_then(Value::as_object);
    let raw_styles = fields.get("lineStyles").and_then(Value::as_object);

    let mut positions = BTreeMap::new();
    let mut styles = BTreeMap::new();

    for definition in schema.definitions() {
        if schema.is_reference(&definition.id) {
            continue;
        }
        let key = definition.id.as_str();
        positions.insert(
            definition.id.clone(),
            merge_fields(&definition.position, raw_positions.and_then(|m| m.get(key))),
        );
        styles.insert(
            definition.id.clone(),
            merge_fields(&definition.style, raw_styles.and_then(|m| m.get(key))),
        );
    }

    // Entries for line types this schema does not know are kept when well formed
    keep_extra_entries(schema, raw_positions, &mut positions);
    keep_extra_entries(schema, raw_styles, &mut styles);

    (positions, styles)
}

fn keep_extra_entries<T>(
    schema: &LineTypeSchema,
    raw: Option<&Map<String, Value>>,
    target: &mut BTreeMap<LineTypeId, T>,
) where
    T: DeserializeOwned + Validate,
{
    let Some(raw) = raw else {
        return;
    };

    for (key, value) in raw {
        let id = LineTypeId::from(key.as_str());
        if schema.contains(&id) {
            continue;
        }
        match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) if parsed.is_valid() => {
                target.insert(id, parsed);
            }
            _ => debug!("Dropping malformed entry for unknown line type {}", key),
        }
    }
}

fn reference_lines(schema: &LineTypeSchema, fields: &Map<String, Value>) -> [Option<ReferenceLine>; 2] {
    let mut lines = [None, None];

    for reference in schema.references() {
        let slot = reference.slot;
        let line = ReferenceLine {
            position: merge_fields(&reference.line.position, fields.get(slot.position_field())),
            style: merge_fields(&reference.line.style, fields.get(slot.style_field())),
        };
        let index = match slot {
            ReferenceSlot::Reference => 0,
            ReferenceSlot::ReferenceEnglish => 1,
        };
        lines[index] = Some(line);
    }

    lines
}

fn background_boxes(raw: Option<&Value>) -> Vec<BackgroundBox> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let id = entry.get("id").and_then(Value::as_str).filter(|id| !id.is_empty());
            match id {
                Some(id) => Some(merge_fields(
                    &crate::editor::default_box(id.to_string(), index),
                    Some(entry),
                )),
                None => {
                    warn!("Dropping background box {} without an id", index);
                    None
                }
            }
        })
        .collect()
}

/// Shallow merge of a raw object over a default value
///
/// Keys the default does not have are ignored. A raw key is taken only if the
/// result still deserializes and validates, so a single malformed field falls
/// back to its default instead of discarding the whole override.
pub(crate) fn merge_fields<T>(default: &T, raw: Option<&Value>) -> T
where
    T: Serialize + DeserializeOwned + Validate + Clone,
{
    let overrides = match raw {
        Some(Value::Object(overrides)) => overrides,
        Some(Value::Null) | None => return default.clone(),
        Some(other) => {
            debug!("Ignoring non-object override ({})", json_kind(other));
            return default.clone();
        }
    };

    let mut merged = match serde_json::to_value(default) {
        Ok(Value::Object(merged)) => merged,
        _ => return default.clone(),
    };

    for (key, value) in overrides {
        if !merged.contains_key(key) {
            continue;
        }
        let previous = merged.insert(key.clone(), value.clone());
        let accepted = serde_json::from_value::<T>(Value::Object(merged.clone()))
            .map(|candidate| candidate.is_valid())
            .unwrap_or(false);
        if !accepted {
            debug!("Falling back to default for field {}", key);
            if let Some(previous) = previous {
                merged.insert(key.clone(), previous);
            }
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|_| default.clone())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
