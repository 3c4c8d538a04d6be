//! Combo box cell.

use super::{delegate_cell_binding, CellCore, CellKind, RendererSlot};
use crate::native::{RendererAttribute, RendererKind};
use crate::value::CellValue;

/// A text cell whose edits are restricted to a fixed list of options.
///
/// Committed values that are not one of the options are dropped without
/// touching the data item.
pub struct ComboBoxCell {
    core: CellCore,
}

impl ComboBoxCell {
    /// Creates a combo cell reading `field` and offering `options`.
    pub fn new<I, S>(field: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slot = RendererSlot::new(
            RendererKind::Combo,
            RendererAttribute::Text,
            Some(field.into()),
            CellValue::into_text,
        );
        Self {
            core: CellCore::restricted_to(vec![slot], options.into_iter().map(Into::into).collect()),
        }
    }
}

delegate_cell_binding!(ComboBoxCell, CellKind::Combo);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cell::CellBinding;
    use crate::native::NativeColumn;
    use crate::source::{CellDataSource, ListSource, RecordItem};

    #[test]
    fn test_edits_outside_options_are_rejected() {
        let source: Arc<dyn CellDataSource> = Arc::new(ListSource::new(vec![Arc::new(
            RecordItem::new().with("size", "Small"),
        )]));
        let column = NativeColumn::new();
        let cell = ComboBoxCell::new("size", ["Small", "Large"]);
        assert_eq!(cell.options(), vec!["Small".to_string(), "Large".to_string()]);

        cell.register_with_column(&column);
        cell.apply_editable(&column, true);
        cell.bind_to_data_source(&source, &column, 0, 0);
        let renderer = column.renderers()[0].clone();
        let item = source.item(0).unwrap();

        renderer.finish_editing(0, CellValue::from("Huge"));
        assert_eq!(item.field("size"), CellValue::from("Small"));

        renderer.finish_editing(0, CellValue::from("Large"));
        assert_eq!(item.field("size"), CellValue::from("Large"));
    }

    #[test]
    fn test_text_cell_is_unrestricted() {
        let cell = crate::cell::TextBoxCell::new("name");
        assert!(cell.options().is_empty());
    }
}
