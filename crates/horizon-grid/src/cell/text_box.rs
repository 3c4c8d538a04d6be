//! Editable text cell.

use super::{delegate_cell_binding, CellCore, CellKind, RendererSlot};
use crate::native::{RendererAttribute, RendererKind};
use crate::value::CellValue;

/// A cell showing a field as text, editable in place.
///
/// Non-text values (numbers, booleans) are displayed as their text form.
/// Committed edits are written back to the field as text.
pub struct TextBoxCell {
    core: CellCore,
}

impl TextBoxCell {
    /// Creates a text cell reading `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self::build(Some(field.into()))
    }

    /// Creates a text cell with no field; it shows nothing until replaced.
    pub fn unbound() -> Self {
        Self::build(None)
    }

    fn build(field: Option<String>) -> Self {
        Self {
            core: CellCore::new(vec![RendererSlot::new(
                RendererKind::Text,
                RendererAttribute::Text,
                field,
                CellValue::into_text,
            )]),
        }
    }
}

impl Default for TextBoxCell {
    fn default() -> Self {
        Self::unbound()
    }
}

delegate_cell_binding!(TextBoxCell, CellKind::Text);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellBinding;
    use crate::source::RecordItem;

    #[test]
    fn test_text_cell_extracts_text() {
        let cell = TextBoxCell::new("age");
        let item = RecordItem::new().with("age", 30);
        assert_eq!(cell.extract_value(&item, 0, 0), CellValue::from("30"));
        assert_eq!(cell.fields(), vec!["age".to_string()]);
        assert_eq!(cell.kind(), CellKind::Text);
    }

    #[test]
    fn test_unbound_text_cell_is_empty() {
        let cell = TextBoxCell::default();
        let item = RecordItem::new().with("age", 30);
        assert_eq!(cell.extract_value(&item, 0, 0), CellValue::Empty);
    }
}
