//! Layout primitive value types
//!
//! All geometry is expressed in percentages of the theme's canvas so the same
//! layout renders identically on any display resolution.

use serde::{Deserialize, Serialize};

/// Structural validity check for values read from persisted records
pub trait Validate {
    fn is_valid(&self) -> bool;
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Reference resolution the percentage coordinates are relative to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDimensions {
    pub width: u32,
    pub height: u32,
}

impl CanvasDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasDimensions {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Validate for CanvasDimensions {
    fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlignH {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlignV {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Placement of one text line on the canvas
///
/// `x + width` and `y + height` may exceed 100; placement outside the canvas
/// is left to the operator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinePosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub align_h: AlignH,
    pub align_v: AlignV,
}

impl LinePosition {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            padding_top: 0.0,
            padding_bottom: 0.0,
            align_h: AlignH::Center,
            align_v: AlignV::Center,
        }
    }

    pub fn aligned(mut self, align_h: AlignH, align_v: AlignV) -> Self {
        self.align_h = align_h;
        self.align_v = align_v;
        self
    }

    pub fn padded(mut self, padding_top: f64, padding_bottom: f64) -> Self {
        self.padding_top = padding_top;
        self.padding_bottom = padding_bottom;
        self
    }
}

impl Validate for LinePosition {
    fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && non_negative(self.width)
            && non_negative(self.height)
            && non_negative(self.padding_top)
            && non_negative(self.padding_bottom)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Medium,
    Semibold,
    Bold,
}

fn default_visible() -> bool {
    true
}

/// Text attributes of one line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    /// Relative size, scaled by the renderer against the canvas height
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub color: String,
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl LineStyle {
    pub fn new(font_size: f64, font_weight: FontWeight, color: impl Into<String>) -> Self {
        Self {
            font_size,
            font_weight,
            color: color.into(),
            opacity: 1.0,
            visible: true,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

impl Validate for LineStyle {
    fn is_valid(&self) -> bool {
        self.font_size.is_finite()
            && self.font_size > 0.0
            && !self.color.trim().is_empty()
            && unit_interval(self.opacity)
    }
}

/// Decorative rectangle drawn behind the text lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundBox {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub opacity: f64,
    pub border_radius: f64,
}

impl Validate for BackgroundBox {
    fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && self.x.is_finite()
            && self.y.is_finite()
            && non_negative(self.width)
            && non_negative(self.height)
            && unit_interval(self.opacity)
            && non_negative(self.border_radius)
    }
}

/// What the viewer shows behind the overlay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewerBackground {
    Color { color: String },
    Transparent,
}

impl ViewerBackground {
    pub fn color(color: impl Into<String>) -> Self {
        Self::Color {
            color: color.into(),
        }
    }
}

impl Default for ViewerBackground {
    fn default() -> Self {
        Self::color("#000000")
    }
}

impl Validate for ViewerBackground {
    fn is_valid(&self) -> bool {
        match self {
            Self::Color { color } => !color.trim().is_empty(),
            Self::Transparent => true,
        }
    }
}
