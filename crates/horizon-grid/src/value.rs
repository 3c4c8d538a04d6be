//! Cell values and per-cell formatting.
//!
//! [`CellValue`] is what a cell binding extracts from a data item and what the
//! native tree stores per data column. [`CellFormat`] is what a data source
//! may hand back when asked to format a cell before it is drawn.

use serde::{Deserialize, Serialize};

/// A value held by one data column of one row.
///
/// `CellValue::Empty` is the defined "nothing here" representation: it is
/// returned for missing fields and for columns with no cell bound.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Text for text and combo cells.
    Text(String),
    /// Boolean for check box cells.
    Bool(bool),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// Image reference (resource name or path) for image cells.
    Image(String),
}

impl CellValue {
    /// Returns `true` if this is `CellValue::Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Attempts to get the value as a string slice.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as an image reference.
    pub fn as_image(&self) -> Option<&str> {
        match self {
            CellValue::Image(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Converts the value into display text.
    ///
    /// `Empty` stays `Empty`; everything else becomes `Text`.
    pub fn into_text(self) -> CellValue {
        match self {
            CellValue::Empty => CellValue::Empty,
            CellValue::Text(s) | CellValue::Image(s) => CellValue::Text(s),
            CellValue::Bool(b) => CellValue::Text(b.to_string()),
            CellValue::Int(n) => CellValue::Text(n.to_string()),
            CellValue::Float(n) => CellValue::Text(n.to_string()),
        }
    }

    /// Converts the value into a check state.
    ///
    /// Integers are checked when non-zero and text when it reads `true`
    /// (case-insensitive). Anything else is `Empty`.
    pub fn into_bool(self) -> CellValue {
        match self {
            CellValue::Bool(b) => CellValue::Bool(b),
            CellValue::Int(n) => CellValue::Bool(n != 0),
            CellValue::Text(s) => match s.to_ascii_lowercase().as_str() {
                "true" => CellValue::Bool(true),
                "false" => CellValue::Bool(false),
                _ => CellValue::Empty,
            },
            _ => CellValue::Empty,
        }
    }

    /// Converts the value into an image reference.
    pub fn into_image(self) -> CellValue {
        match self {
            CellValue::Image(s) | CellValue::Text(s) => CellValue::Image(s),
            _ => CellValue::Empty,
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<Option<String>> for CellValue {
    fn from(opt: Option<String>) -> Self {
        opt.map_or(CellValue::Empty, CellValue::Text)
    }
}

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb8(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb8(255, 255, 255);

    /// Creates an opaque color from 8-bit channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Formatting a data source can apply to a single cell before it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellFormat {
    /// Text/foreground color.
    pub foreground: Option<Color>,
    /// Background color.
    pub background: Option<Color>,
    /// Render text in bold.
    pub bold: bool,
    /// Render text in italics.
    pub italic: bool,
}

impl CellFormat {
    /// Sets the foreground color.
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Sets the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Sets bold text.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// Horizontal alignment of a column's header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    /// Align to the left edge.
    #[default]
    Left,
    /// Align to the center.
    Center,
    /// Align to the right edge.
    Right,
}

impl TextAlignment {
    /// Returns the native x-alignment fraction (0.0 left, 1.0 right).
    pub fn to_xalign(self) -> f32 {
        match self {
            TextAlignment::Left => 0.0,
            TextAlignment::Center => 0.5,
            TextAlignment::Right => 1.0,
        }
    }

    /// Maps a native x-alignment fraction to the nearest alignment.
    pub fn from_xalign(xalign: f32) -> Self {
        if xalign < 0.25 {
            TextAlignment::Left
        } else if xalign > 0.75 {
            TextAlignment::Right
        } else {
            TextAlignment::Center
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_text() {
        assert_eq!(CellValue::Int(5).into_text(), CellValue::from("5"));
        assert_eq!(CellValue::Bool(true).into_text(), CellValue::from("true"));
        assert_eq!(CellValue::Empty.into_text(), CellValue::Empty);
    }

    #[test]
    fn test_into_bool() {
        assert_eq!(CellValue::Int(0).into_bool(), CellValue::Bool(false));
        assert_eq!(CellValue::from("TRUE").into_bool(), CellValue::Bool(true));
        assert_eq!(CellValue::from("maybe").into_bool(), CellValue::Empty);
        assert_eq!(CellValue::Float(1.0).into_bool(), CellValue::Empty);
    }

    #[test]
    fn test_into_image() {
        assert_eq!(
            CellValue::from("icons/folder.png").into_image(),
            CellValue::Image("icons/folder.png".to_string())
        );
        assert_eq!(CellValue::Int(3).into_image(), CellValue::Empty);
    }

    #[test]
    fn test_alignment_xalign() {
        for alignment in [TextAlignment::Left, TextAlignment::Center, TextAlignment::Right] {
            assert_eq!(TextAlignment::from_xalign(alignment.to_xalign()), alignment);
        }
        assert_eq!(TextAlignment::from_xalign(0.1), TextAlignment::Left);
        assert_eq!(TextAlignment::from_xalign(0.9), TextAlignment::Right);
    }
}
