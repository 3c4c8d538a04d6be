//! Cell bindings: the renderer/editor attached to a column.
//!
//! A column owns at most one cell binding. The binding knows which native
//! renderers to pack into the column, which data fields feed them, how to
//! extract a value from a data item, and how to forward editing and
//! formatting activity to the data source. Columns only ever talk to a cell
//! through the [`CellBinding`] capability set, so custom cell kinds plug in
//! without the column knowing about them.
//!
//! # Built-in Cells
//!
//! - [`TextBoxCell`]: editable text
//! - [`CheckBoxCell`]: check box toggled in place
//! - [`ImageViewCell`]: read-only image
//! - [`ComboBoxCell`]: text restricted to a list of options
//! - [`ImageTextCell`]: image and text side by side (two data columns)
//! - [`CustomCell`]: caller-supplied value extraction
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::cell::{CellBinding, CheckBoxCell};
//! use horizon_grid::native::NativeColumn;
//! use horizon_grid::source::{CellDataSource, ListSource, RecordItem};
//!
//! let source: Arc<dyn CellDataSource> = Arc::new(ListSource::new(vec![
//!     Arc::new(RecordItem::new().with("done", true)),
//! ]));
//! let column = NativeColumn::new();
//! let cell = CheckBoxCell::new("done");
//!
//! cell.register_with_column(&column);
//! let used = cell.bind_to_data_source(&source, &column, 0, 4);
//! assert_eq!(used, 1);
//! ```

mod check_box;
mod combo_box;
mod custom;
mod image;
mod text_box;

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::grid::GridEvent;
use crate::native::{CellRenderer, NativeColumn, RendererAttribute, RendererKind};
use crate::source::{CellDataSource, DataItem};
use crate::value::CellValue;

pub use check_box::CheckBoxCell;
pub use combo_box::ComboBoxCell;
pub use custom::CustomCell;
pub use image::{ImageTextCell, ImageViewCell};
pub use text_box::TextBoxCell;

/// The kind of a cell binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    #[default]
    Text,
    CheckBox,
    Image,
    Combo,
    ImageText,
    Custom,
    /// Configuration only: the column has no cell at all.
    None,
}

/// The capability set a column requires from its cell.
pub trait CellBinding: Send + Sync {
    /// The kind of cell, for introspection and configuration snapshots.
    fn kind(&self) -> CellKind {
        CellKind::Custom
    }

    /// Packs the cell's native renderers into `column`.
    ///
    /// Registering the same cell twice must not pack its renderers twice.
    fn register_with_column(&self, column: &NativeColumn);

    /// Makes the cell's renderers accept (or refuse) in-place edits.
    fn apply_editable(&self, column: &NativeColumn, editable: bool);

    /// Binds the cell to `source` as column `column_index`, starting at data
    /// column `data_index`. Returns the number of data columns used.
    fn bind_to_data_source(
        &self,
        source: &Arc<dyn CellDataSource>,
        column: &NativeColumn,
        column_index: usize,
        data_index: usize,
    ) -> usize;

    /// Extracts the value shown at `data_column` for `item` on `row`.
    fn extract_value(&self, item: &dyn DataItem, data_column: usize, row: usize) -> CellValue;

    /// Starts forwarding a cell event to the data source.
    ///
    /// Attaching an event that is already attached does nothing.
    fn attach_event(&self, event: GridEvent) -> Result<()>;

    /// The data fields the cell reads, in renderer order.
    fn fields(&self) -> Vec<String> {
        Vec::new()
    }

    /// The values edits are restricted to; empty when unrestricted.
    fn options(&self) -> Vec<String> {
        Vec::new()
    }
}

/// One native renderer of a cell together with the field feeding it.
pub(crate) struct RendererSlot {
    renderer: Arc<CellRenderer>,
    attribute: RendererAttribute,
    field: Option<String>,
    coerce: fn(CellValue) -> CellValue,
    can_edit: bool,
}

impl RendererSlot {
    pub(crate) fn new(
        kind: RendererKind,
        attribute: RendererAttribute,
        field: Option<String>,
        coerce: fn(CellValue) -> CellValue,
    ) -> Self {
        Self {
            renderer: CellRenderer::new(kind),
            attribute,
            field,
            coerce,
            can_edit: true,
        }
    }

    pub(crate) fn read_only(mut self) -> Self {
        self.can_edit = false;
        self
    }
}

#[derive(Default)]
struct BindingState {
    source: Option<Weak<dyn CellDataSource>>,
    column_index: usize,
    data_index: Option<usize>,
    attached: HashSet<GridEvent>,
    edits_connected: bool,
}

struct CellShared {
    state: Mutex<BindingState>,
    options: Arc<[String]>,
}

impl CellShared {
    fn source(&self) -> Option<(Arc<dyn CellDataSource>, usize)> {
        let state = self.state.lock();
        let source = state.source.as_ref().and_then(Weak::upgrade)?;
        Some((source, state.column_index))
    }

    fn is_attached(&self, event: GridEvent) -> bool {
        self.state.lock().attached.contains(&event)
    }

    fn accepts(&self, value: &CellValue) -> bool {
        if self.options.is_empty() {
            return true;
        }
        value
            .clone()
            .into_text()
            .as_text()
            .is_some_and(|text| self.options.iter().any(|option| option == text))
    }
}

/// Shared machinery behind the built-in cells.
///
/// Owns the renderers and the binding state. Signal handlers installed on the
/// renderers only hold weak references back to the binding state, so a cell
/// dropped by its column stops forwarding.
pub(crate) struct CellCore {
    slots: Vec<RendererSlot>,
    shared: Arc<CellShared>,
}

impl CellCore {
    pub(crate) fn new(slots: Vec<RendererSlot>) -> Self {
        Self::restricted_to(slots, Vec::new())
    }

    /// A core whose edits are dropped unless their text is one of `options`.
    pub(crate) fn restricted_to(slots: Vec<RendererSlot>, options: Vec<String>) -> Self {
        Self {
            slots,
            shared: Arc::new(CellShared {
                state: Mutex::new(BindingState::default()),
                options: options.into(),
            }),
        }
    }

    pub(crate) fn options(&self) -> Vec<String> {
        self.shared.options.to_vec()
    }

    pub(crate) fn fields(&self) -> Vec<String> {
        self.slots.iter().filter_map(|slot| slot.field.clone()).collect()
    }

    pub(crate) fn register_with_column(&self, column: &NativeColumn) {
        let packed = column.renderers();
        for slot in &self.slots {
            if packed.iter().any(|r| Arc::ptr_eq(r, &slot.renderer)) {
                continue;
            }
            column.pack_start(slot.renderer.clone());
        }
        tracing::debug!(
            target: targets::CELL,
            renderers = self.slots.len(),
            "cell registered with column"
        );
    }

    pub(crate) fn apply_editable(&self, editable: bool) {
        for slot in &self.slots {
            slot.renderer.set_editable(editable && slot.can_edit);
        }
    }

    pub(crate) fn bind_to_data_source(
        &self,
        source: &Arc<dyn CellDataSource>,
        column_index: usize,
        data_index: usize,
    ) -> usize {
        {
            let mut state = self.shared.state.lock();
            state.source = Some(Arc::downgrade(source));
            state.column_index = column_index;
            state.data_index = Some(data_index);
        }
        for (offset, slot) in self.slots.iter().enumerate() {
            slot.renderer.add_attribute(slot.attribute, data_index + offset);
        }
        self.connect_edits();

        tracing::debug!(
            target: targets::CELL,
            column_index,
            data_index,
            count = self.slots.len(),
            "cell bound to data source"
        );
        self.slots.len()
    }

    /// Finds the slot rendering `data_column`.
    ///
    /// Once bound, only the data columns the cell was given map to a slot.
    /// Before that, `data_column` is taken as a slot offset.
    fn slot_for(&self, data_column: usize) -> Option<&RendererSlot> {
        let offset = match self.shared.state.lock().data_index {
            Some(start) => data_column.checked_sub(start)?,
            None => data_column,
        };
        self.slots.get(offset)
    }

    pub(crate) fn extract_value(&self, item: &dyn DataItem, data_column: usize) -> CellValue {
        match self.slot_for(data_column) {
            Some(RendererSlot {
                field: Some(field),
                coerce,
                ..
            }) => coerce(item.field(field)),
            _ => CellValue::Empty,
        }
    }

    pub(crate) fn attach_event(&self, event: GridEvent) -> Result<()> {
        let connect: fn(&Self) = match event {
            GridEvent::CellEditing => Self::connect_editing_started,
            GridEvent::CellEdited => Self::connect_edits,
            GridEvent::CellFormatting => Self::connect_formatting,
            GridEvent::ColumnHeaderClick => {
                return Err(GridError::unsupported_event(event.id()));
            }
        };
        if !self.shared.state.lock().attached.insert(event) {
            tracing::trace!(target: targets::CELL, %event, "event already attached");
            return Ok(());
        }

        connect(self);
        tracing::trace!(target: targets::CELL, %event, "cell event attached");
        Ok(())
    }

    fn connect_editing_started(&self) {
        for slot in &self.slots {
            let shared = Arc::downgrade(&self.shared);
            slot.renderer.editing_started.connect(move |&row| {
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                if let Some((source, column_index)) = shared.source() {
                    source.begin_cell_editing(row, column_index);
                }
            });
        }
    }

    /// Commits edits to the data item and, when attached, reports them.
    ///
    /// Connected once, on bind or on the first `CellEdited` attach.
    fn connect_edits(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.edits_connected {
                return;
            }
            state.edits_connected = true;
        }

        for slot in &self.slots {
            let shared = Arc::downgrade(&self.shared);
            let field = slot.field.clone();
            let coerce = slot.coerce;
            slot.renderer.edited.connect(move |(row, value)| {
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                let Some((source, column_index)) = shared.source() else {
                    tracing::trace!(target: targets::CELL, "edit on unbound cell ignored");
                    return;
                };
                if !shared.accepts(value) {
                    tracing::debug!(target: targets::CELL, row, "edit outside cell options rejected");
                    return;
                }
                if let (Some(field), Some(item)) = (field.as_deref(), source.item(*row)) {
                    if !item.set_field(field, coerce(value.clone())) {
                        tracing::debug!(target: targets::CELL, row, field, "item is read-only");
                    }
                }
                if shared.is_attached(GridEvent::CellEdited) {
                    source.end_cell_editing(*row, column_index);
                }
            });
        }
    }

    fn connect_formatting(&self) {
        for slot in &self.slots {
            let shared = Arc::downgrade(&self.shared);
            let renderer = Arc::downgrade(&slot.renderer);
            slot.renderer.formatting.connect(move |&row| {
                let (Some(shared), Some(renderer)) = (shared.upgrade(), renderer.upgrade()) else {
                    return;
                };
                if let Some((source, column_index)) = shared.source() {
                    renderer.set_format(source.cell_formatting(row, column_index).unwrap_or_default());
                }
            });
        }
    }
}

/// Implements [`CellBinding`] for a cell type holding a `core: CellCore`.
macro_rules! delegate_cell_binding {
    ($cell:ty, $kind:expr) => {
        impl $crate::cell::CellBinding for $cell {
            fn kind(&self) -> $crate::cell::CellKind {
                $kind
            }

            fn register_with_column(&self, column: &$crate::native::NativeColumn) {
                self.core.register_with_column(column);
            }

            fn apply_editable(&self, _column: &$crate::native::NativeColumn, editable: bool) {
                self.core.apply_editable(editable);
            }

            fn bind_to_data_source(
                &self,
                source: &std::sync::Arc<dyn $crate::source::CellDataSource>,
                _column: &$crate::native::NativeColumn,
                column_index: usize,
                data_index: usize,
            ) -> usize {
                self.core.bind_to_data_source(source, column_index, data_index)
            }

            fn extract_value(
                &self,
                item: &dyn $crate::source::DataItem,
                data_column: usize,
                _row: usize,
            ) -> $crate::value::CellValue {
                self.core.extract_value(item, data_column)
            }

            fn attach_event(&self, event: $crate::grid::GridEvent) -> $crate::error::Result<()> {
                self.core.attach_event(event)
            }

            fn fields(&self) -> Vec<String> {
                self.core.fields()
            }

            fn options(&self) -> Vec<String> {
                self.core.options()
            }
        }
    };
}

pub(crate) use delegate_cell_binding;
