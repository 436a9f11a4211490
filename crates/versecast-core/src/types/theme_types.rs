//! Theme aggregate and its persisted record shape

use super::{BackgroundBox, CanvasDimensions, LinePosition, LineStyle, ViewerBackground};
use crate::schema::LineTypeSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Content variant a theme lays out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    /// Two-line songs and captions
    Generic,
    /// Scripture with original text, translation and two reference lines
    Bible,
    /// Three-line song overlay
    Song,
}

impl ThemeVariant {
    pub const ALL: [ThemeVariant; 3] = [Self::Generic, Self::Bible, Self::Song];

    /// Persistence namespace for themes of this variant
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Generic => "themes",
            Self::Bible => "bible-themes",
            Self::Song => "song-themes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Bible => "bible",
            Self::Song => "song",
        }
    }
}

impl fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s || v.namespace() == s)
            .ok_or_else(|| format!("unknown theme variant: {}", s))
    }
}

/// Identifier of one logical text role within a theme
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineTypeId(pub String);

impl LineTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineTypeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LineTypeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<&str> for LineTypeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for LineTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named record fields that hold a reference line instead of a map entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceSlot {
    Reference,
    ReferenceEnglish,
}

impl ReferenceSlot {
    pub fn position_field(&self) -> &'static str {
        match self {
            Self::Reference => "referencePosition",
            Self::ReferenceEnglish => "referenceEnglishPosition",
        }
    }

    pub fn style_field(&self) -> &'static str {
        match self {
            Self::Reference => "referenceStyle",
            Self::ReferenceEnglish => "referenceEnglishStyle",
        }
    }
}

/// Geometry and style of a reference line
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub position: LinePosition,
    pub style: LineStyle,
}

/// Canonical, fully populated theme for one variant
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Empty until the first successful save
    pub id: String,
    pub name: String,
    pub is_built_in: bool,
    pub variant: ThemeVariant,
    pub viewer_background: ViewerBackground,
    pub canvas_dimensions: CanvasDimensions,
    pub line_order: Vec<LineTypeId>,
    pub line_positions: BTreeMap<LineTypeId, LinePosition>,
    pub line_styles: BTreeMap<LineTypeId, LineStyle>,
    pub reference: Option<ReferenceLine>,
    pub reference_english: Option<ReferenceLine>,
    pub background_boxes: Vec<BackgroundBox>,
}

impl Theme {
    /// Theme populated with the variant's schema defaults
    pub fn new_default(variant: ThemeVariant) -> Self {
        crate::normalize::normalize(
            LineTypeSchema::for_variant(variant),
            &serde_json::Value::Null,
        )
    }

    pub fn schema(&self) -> &'static LineTypeSchema {
        LineTypeSchema::for_variant(self.variant)
    }

    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    pub fn reference_line(&self, slot: ReferenceSlot) -> Option<&ReferenceLine> {
        match slot {
            ReferenceSlot::Reference => self.reference.as_ref(),
            ReferenceSlot::ReferenceEnglish => self.reference_english.as_ref(),
        }
    }

    fn reference_line_mut(&mut self, slot: ReferenceSlot) -> &mut Option<ReferenceLine> {
        match slot {
            ReferenceSlot::Reference => &mut self.reference,
            ReferenceSlot::ReferenceEnglish => &mut self.reference_english,
        }
    }

    /// Position of a line, whichever storage form backs it
    pub fn position(&self, id: &LineTypeId) -> Option<&LinePosition> {
        match self.schema().reference_slot(id) {
            Some(slot) => self.reference_line(slot).map(|line| &line.position),
            None => self.line_positions.get(id),
        }
    }

    /// Style of a line, whichever storage form backs it
    pub fn style(&self, id: &LineTypeId) -> Option<&LineStyle> {
        match self.schema().reference_slot(id) {
            Some(slot) => self.reference_line(slot).map(|line| &line.style),
            None => self.line_styles.get(id),
        }
    }

    pub fn set_position(&mut self, id: &LineTypeId, position: LinePosition) {
        let schema = self.schema();
        match schema.reference_slot(id) {
            Some(slot) => match self.reference_line_mut(slot) {
                Some(line) => line.position = position,
                empty => {
                    let style = schema.default_style(id).unwrap_or_else(|_| fallback_style());
                    *empty = Some(ReferenceLine { position, style });
                }
            },
            None => {
                self.line_positions.insert(id.clone(), position);
            }
        }
    }

    pub fn set_style(&mut self, id: &LineTypeId, style: LineStyle) {
        let schema = self.schema();
        match schema.reference_slot(id) {
            Some(slot) => match self.reference_line_mut(slot) {
                Some(line) => line.style = style,
                empty => {
                    let position = schema
                        .default_position(id)
                        .unwrap_or_else(|_| LinePosition::new(0.0, 0.0, 100.0, 10.0));
                    *empty = Some(ReferenceLine { position, style });
                }
            },
            None => {
                self.line_styles.insert(id.clone(), style);
            }
        }
    }

    pub fn background_box(&self, id: &str) -> Option<&BackgroundBox> {
        self.background_boxes.iter().find(|b| b.id == id)
    }
}

fn fallback_style() -> LineStyle {
    LineStyle::new(3.0, super::FontWeight::Normal, "#FFFFFF")
}

/// Persisted theme record
///
/// `id` and `is_built_in` are owned by the store; they are `None` in write
/// payloads and filled in on records read back or broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_built_in: Option<bool>,
    pub name: String,
    pub viewer_background: ViewerBackground,
    pub canvas_dimensions: CanvasDimensions,
    pub line_order: Vec<LineTypeId>,
    pub line_positions: BTreeMap<LineTypeId, LinePosition>,
    pub line_styles: BTreeMap<LineTypeId, LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_position: Option<LinePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_style: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_english_position: Option<LinePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_english_style: Option<LineStyle>,
    pub background_boxes: Vec<BackgroundBox>,
}

impl ThemeRecord {
    /// Same record carrying the store-assigned id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Theme summary for listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSummary {
    pub id: String,
    pub variant: ThemeVariant,
    pub name: String,
    pub is_built_in: bool,
    pub is_active: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
