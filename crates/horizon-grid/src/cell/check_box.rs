//! Check box cell.

use super::{delegate_cell_binding, CellCore, CellKind, RendererSlot};
use crate::native::{RendererAttribute, RendererKind};
use crate::value::CellValue;

/// A cell showing a boolean field as a check box.
///
/// Integers read as checked when non-zero; `"true"`/`"false"` text is
/// accepted too. Toggling the renderer writes the inverted state back.
pub struct CheckBoxCell {
    core: CellCore,
}

impl CheckBoxCell {
    /// Creates a check box cell reading `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            core: CellCore::new(vec![RendererSlot::new(
                RendererKind::Toggle,
                RendererAttribute::Active,
                Some(field.into()),
                CellValue::into_bool,
            )]),
        }
    }
}

delegate_cell_binding!(CheckBoxCell, CellKind::CheckBox);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cell::CellBinding;
    use crate::native::NativeColumn;
    use crate::source::{CellDataSource, ListSource, RecordItem};

    #[test]
    fn test_toggle_writes_inverted_state() {
        let source: Arc<dyn CellDataSource> = Arc::new(ListSource::new(vec![Arc::new(
            RecordItem::new().with("done", 0),
        )]));
        let column = NativeColumn::new();
        let cell = CheckBoxCell::new("done");
        cell.register_with_column(&column);
        cell.apply_editable(&column, true);
        cell.bind_to_data_source(&source, &column, 0, 0);

        let item = source.item(0).unwrap();
        assert_eq!(cell.extract_value(item.as_ref(), 0, 0), CellValue::Bool(false));

        let renderer = column.renderers()[0].clone();
        assert!(renderer.toggle(0, false));
        assert_eq!(cell.extract_value(item.as_ref(), 0, 0), CellValue::Bool(true));
    }
}
