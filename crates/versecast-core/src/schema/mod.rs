//! Line-type schemas
//!
//! A schema declares which text lines a theme variant carries:
//! - ordinary lines, stored in the theme's position/style maps and ordered by `lineOrder`
//! - up to two reference lines, stored in dedicated record fields
//! - default geometry, style and preview text for each of them

mod defaults;

use crate::error::{Result, ValidationError};
use crate::types::{LinePosition, LineStyle, LineTypeId, ReferenceSlot, ThemeVariant};
use once_cell::sync::Lazy;

static GENERIC_SCHEMA: Lazy<LineTypeSchema> = Lazy::new(defaults::generic);
static BIBLE_SCHEMA: Lazy<LineTypeSchema> = Lazy::new(defaults::bible);
static SONG_SCHEMA: Lazy<LineTypeSchema> = Lazy::new(defaults::song);

/// Defaults for one line type
#[derive(Debug, Clone)]
pub struct LineDefinition {
    pub id: LineTypeId,
    pub label: &'static str,
    pub position: LinePosition,
    pub style: LineStyle,
    pub sample_text: &'static str,
}

/// A reference line and the record fields that hold it
#[derive(Debug, Clone)]
pub struct ReferenceDefinition {
    pub slot: ReferenceSlot,
    pub line: LineDefinition,
}

/// How a line type is stored within a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Ordinary,
    Reference(ReferenceSlot),
}

/// Per-variant line-type descriptor
#[derive(Debug, Clone)]
pub struct LineTypeSchema {
    variant: ThemeVariant,
    ordinary: Vec<LineDefinition>,
    references: Vec<ReferenceDefinition>,
}

impl LineTypeSchema {
    pub(crate) fn new(
        variant: ThemeVariant,
        ordinary: Vec<LineDefinition>,
        references: Vec<ReferenceDefinition>,
    ) -> Self {
        debug_assert!(references.len() <= 2);
        Self {
            variant,
            ordinary,
            references,
        }
    }

    pub fn for_variant(variant: ThemeVariant) -> &'static LineTypeSchema {
        match variant {
            ThemeVariant::Generic => &GENERIC_SCHEMA,
            ThemeVariant::Bible => &BIBLE_SCHEMA,
            ThemeVariant::Song => &SONG_SCHEMA,
        }
    }

    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    /// Ordinary line types, in default display order
    pub fn required_ordinary_types(&self) -> Vec<LineTypeId> {
        self.ordinary.iter().map(|d| d.id.clone()).collect()
    }

    pub fn reference_types(&self) -> Vec<LineTypeId> {
        self.references.iter().map(|r| r.line.id.clone()).collect()
    }

    pub fn references(&self) -> &[ReferenceDefinition] {
        &self.references
    }

    /// Ordinary types followed by reference types
    pub fn default_line_order(&self) -> Vec<LineTypeId> {
        self.definitions().map(|d| d.id.clone()).collect()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &LineDefinition> {
        self.ordinary
            .iter()
            .chain(self.references.iter().map(|r| &r.line))
    }

    pub fn definition(&self, id: &LineTypeId) -> Result<&LineDefinition> {
        self.definitions()
            .find(|d| &d.id == id)
            .ok_or_else(|| ValidationError::UnknownLineType(id.to_string()).into())
    }

    pub fn default_position(&self, id: &LineTypeId) -> Result<LinePosition> {
        self.definition(id).map(|d| d.position)
    }

    pub fn default_style(&self, id: &LineTypeId) -> Result<LineStyle> {
        self.definition(id).map(|d| d.style.clone())
    }

    pub fn contains(&self, id: &LineTypeId) -> bool {
        self.definitions().any(|d| &d.id == id)
    }

    pub fn line_kind(&self, id: &LineTypeId) -> Result<LineKind> {
        if let Some(slot) = self.reference_slot(id) {
            return Ok(LineKind::Reference(slot));
        }
        self.definition(id).map(|_| LineKind::Ordinary)
    }

    pub fn reference_slot(&self, id: &LineTypeId) -> Option<ReferenceSlot> {
        self.references
            .iter()
            .find(|r| &r.line.id == id)
            .map(|r| r.slot)
    }

    pub fn is_reference(&self, id: &LineTypeId) -> bool {
        self.reference_slot(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{AlignH, AlignV};

    fn ids(raw: &[&str]) -> Vec<LineTypeId> {
        raw.iter().map(|s| LineTypeId::from(*s)).collect()
    }

    #[test]
    fn test_generic_schema_has_two_lines() {
        let schema = LineTypeSchema::for_variant(ThemeVariant::Generic);
        assert_eq!(
            schema.required_ordinary_types(),
            ids(&["original", "translation"])
        );
        assert!(schema.reference_types().is_empty());
    }

    #[test]
    fn test_bible_schema_default_order() {
        let schema = LineTypeSchema::for_variant(ThemeVariant::Bible);
        assert_eq!(
            schema.default_line_order(),
            ids(&["hebrew", "english", "reference", "referenceEnglish"])
        );
        assert_eq!(
            schema.reference_slot(&"referenceEnglish".into()),
            Some(ReferenceSlot::ReferenceEnglish)
        );
    }

    #[test]
    fn test_bible_references_sit_in_opposite_corners() {
        let schema = LineTypeSchema::for_variant(ThemeVariant::Bible);
        let left = schema.default_position(&"reference".into()).unwrap();
        let right = schema.default_position(&"referenceEnglish".into()).unwrap();

        assert_eq!(left.align_h, AlignH::Left);
        assert_eq!(right.align_h, AlignH::Right);
        assert_eq!(left.align_v, AlignV::Bottom);
        assert_eq!(right.align_v, AlignV::Bottom);
        assert!(left.x < right.x);
    }

    #[test]
    fn test_song_schema_has_three_lines() {
        let schema = LineTypeSchema::for_variant(ThemeVariant::Song);
        assert_eq!(
            schema.required_ordinary_types(),
            ids(&["original", "transliteration", "translation"])
        );
        assert_eq!(
            schema.line_kind(&"translation".into()).unwrap(),
            LineKind::Ordinary
        );
    }

    #[test]
    fn test_unknown_line_type_is_rejected() {
        let schema = LineTypeSchema::for_variant(ThemeVariant::Generic);
        let err = schema.default_style(&"hebrew".into()).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownLineType(ref id)) if id == "hebrew"
        ));
    }
}
