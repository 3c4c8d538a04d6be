//! Image cells.

use super::{delegate_cell_binding, CellCore, CellKind, RendererSlot};
use crate::native::{RendererAttribute, RendererKind};
use crate::value::CellValue;

/// A read-only cell showing an image reference.
///
/// Images are never edited in place; `apply_editable` leaves the renderer
/// read-only.
pub struct ImageViewCell {
    core: CellCore,
}

impl ImageViewCell {
    /// Creates an image cell reading `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            core: CellCore::new(vec![image_slot(field.into())]),
        }
    }
}

delegate_cell_binding!(ImageViewCell, CellKind::Image);

/// A cell showing an image followed by editable text.
///
/// Occupies two data columns: the image first, then the text.
pub struct ImageTextCell {
    core: CellCore,
}

impl ImageTextCell {
    /// Creates a cell reading `image_field` and `text_field`.
    pub fn new(image_field: impl Into<String>, text_field: impl Into<String>) -> Self {
        Self {
            core: CellCore::new(vec![
                image_slot(image_field.into()),
                RendererSlot::new(
                    RendererKind::Text,
                    RendererAttribute::Text,
                    Some(text_field.into()),
                    CellValue::into_text,
                ),
            ]),
        }
    }
}

delegate_cell_binding!(ImageTextCell, CellKind::ImageText);

fn image_slot(field: String) -> RendererSlot {
    RendererSlot::new(
        RendererKind::Pixbuf,
        RendererAttribute::Pixbuf,
        Some(field),
        CellValue::into_image,
    )
    .read_only()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cell::CellBinding;
    use crate::native::NativeColumn;
    use crate::source::{CellDataSource, ListSource, RecordItem};

    #[test]
    fn test_image_cell_never_editable() {
        let column = NativeColumn::new();
        let cell = ImageViewCell::new("icon");
        cell.register_with_column(&column);
        cell.apply_editable(&column, true);
        assert!(!column.renderers()[0].is_editable());
    }

    #[test]
    fn test_image_text_cell_uses_two_data_columns() {
        let source: Arc<dyn CellDataSource> = Arc::new(ListSource::new(vec![]));
        let column = NativeColumn::new();
        let cell = ImageTextCell::new("icon", "name");
        cell.register_with_column(&column);
        cell.apply_editable(&column, true);

        assert_eq!(cell.bind_to_data_source(&source, &column, 1, 5), 2);

        let renderers = column.renderers();
        assert_eq!(renderers.len(), 2);
        assert_eq!(renderers[0].data_column(RendererAttribute::Pixbuf), Some(5));
        assert_eq!(renderers[1].data_column(RendererAttribute::Text), Some(6));
        assert!(!renderers[0].is_editable());
        assert!(renderers[1].is_editable());

        let item = RecordItem::new().with("icon", "folder.png").with("name", "Docs");
        assert_eq!(
            cell.extract_value(&item, 5, 0),
            CellValue::Image("folder.png".to_string())
        );
        assert_eq!(cell.extract_value(&item, 6, 0), CellValue::from("Docs"));
        assert_eq!(cell.fields(), vec!["icon".to_string(), "name".to_string()]);
    }
}
