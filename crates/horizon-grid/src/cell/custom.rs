//! Cell with caller-supplied value extraction.

use std::sync::Arc;

use super::{CellBinding, CellCore, CellKind, RendererSlot};
use crate::error::Result;
use crate::grid::GridEvent;
use crate::native::{NativeColumn, RendererAttribute, RendererKind};
use crate::source::{CellDataSource, DataItem};
use crate::value::CellValue;

type Extractor = Box<dyn Fn(&dyn DataItem, usize) -> CellValue + Send + Sync>;

/// A read-only text cell computing its value with a closure.
///
/// ```
/// use horizon_grid::cell::{CellBinding, CustomCell};
/// use horizon_grid::source::RecordItem;
/// use horizon_grid::value::CellValue;
///
/// let cell = CustomCell::new(|item, row| {
///     format!("{}: {:?}", row, item.field("name").as_text()).into()
/// });
/// let item = RecordItem::new().with("name", "Ann");
/// assert_eq!(cell.extract_value(&item, 0, 3), CellValue::from("3: Some(\"Ann\")"));
/// ```
pub struct CustomCell {
    core: CellCore,
    extract: Extractor,
}

impl CustomCell {
    /// Creates a cell whose value is `extract(item, row)`.
    pub fn new<F>(extract: F) -> Self
    where
        F: Fn(&dyn DataItem, usize) -> CellValue + Send + Sync + 'static,
    {
        Self {
            core: CellCore::new(vec![
                RendererSlot::new(
                    RendererKind::Text,
                    RendererAttribute::Text,
                    None,
                    CellValue::into_text,
                )
                .read_only(),
            ]),
            extract: Box::new(extract),
        }
    }
}

impl CellBinding for CustomCell {
    fn kind(&self) -> CellKind {
        CellKind::Custom
    }

    fn register_with_column(&self, column: &NativeColumn) {
        self.core.register_with_column(column);
    }

    fn apply_editable(&self, _column: &NativeColumn, editable: bool) {
        self.core.apply_editable(editable);
    }

    fn bind_to_data_source(
        &self,
        source: &Arc<dyn CellDataSource>,
        _column: &NativeColumn,
        column_index: usize,
        data_index: usize,
    ) -> usize {
        self.core.bind_to_data_source(source, column_index, data_index)
    }

    fn extract_value(&self, item: &dyn DataItem, _data_column: usize, row: usize) -> CellValue {
        (self.extract)(item, row)
    }

    fn attach_event(&self, event: GridEvent) -> Result<()> {
        self.core.attach_event(event)
    }
}
