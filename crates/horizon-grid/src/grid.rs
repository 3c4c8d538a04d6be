//! The grid side of the column contract.
//!
//! A column adapter needs very little from the grid that owns it: whether the
//! application listens to a given event, a way to report header clicks, and
//! access to the column's display position. That capability set is
//! [`GridContract`]. [`GridView`] is a reference host implementing it over a
//! [`NativeTree`] and a [`CellDataSource`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::{GridColumn, GridEvent, GridView};
//! use horizon_grid::cell::TextBoxCell;
//! use horizon_grid::source::{ListSource, RecordItem};
//!
//! let source = Arc::new(ListSource::new(vec![
//!     Arc::new(RecordItem::new().with("name", "Alice")),
//! ]));
//! let grid = GridView::new(source);
//!
//! let column = GridColumn::new();
//! column.set_header_text("Name");
//! column.set_cell_binding(Some(Arc::new(TextBoxCell::new("name"))));
//! grid.add_column(column.clone()).unwrap();
//!
//! grid.column_header_click.connect(|id| println!("clicked {:?}", id));
//! grid.handle_event(GridEvent::ColumnHeaderClick).unwrap();
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{PerfSpan, Signal};
use parking_lot::Mutex;

use crate::column::{ColumnId, GridColumn};
use crate::error::{GridError, Result};
use crate::native::NativeTree;
use crate::source::CellDataSource;
use crate::value::CellValue;

/// The events a column can forward to its grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridEvent {
    /// An in-place cell editor opened.
    CellEditing,
    /// A cell edit was committed.
    CellEdited,
    /// A column header was clicked.
    ColumnHeaderClick,
    /// A cell is about to be drawn and may be formatted.
    CellFormatting,
}

impl GridEvent {
    /// All recognized events, in the order columns subscribe to them.
    pub const ALL: [GridEvent; 4] = [
        GridEvent::CellEditing,
        GridEvent::CellEdited,
        GridEvent::ColumnHeaderClick,
        GridEvent::CellFormatting,
    ];

    /// The string id of the event.
    pub const fn id(self) -> &'static str {
        match self {
            GridEvent::CellEditing => "cell-editing-started",
            GridEvent::CellEdited => "cell-edited",
            GridEvent::ColumnHeaderClick => "column-header-clicked",
            GridEvent::CellFormatting => "cell-formatting",
        }
    }

}

impl fmt::Display for GridEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GridEvent {
    type Err = GridError;

    fn from_str(id: &str) -> Result<Self> {
        GridEvent::ALL
            .into_iter()
            .find(|event| event.id() == id)
            .ok_or_else(|| GridError::unsupported_event(id))
    }
}

/// What a column adapter requires from its owning grid.
///
/// Implementations must not call back into the column while holding their
/// own locks if that column may in turn call the grid.
pub trait GridContract: Send + Sync {
    /// Whether the application is listening to `event`.
    fn is_event_handled(&self, event: GridEvent) -> bool;

    /// A column header was clicked.
    fn column_clicked(&self, column: &GridColumn);

    /// The display position of `column`, or `-1` if unknown.
    fn column_display_index(&self, column: &GridColumn) -> i32;

    /// Moves `column` to display position `index`.
    fn set_column_display_index(&self, column: &GridColumn, index: i32);
}

/// A reference grid hosting column adapters on a native tree.
///
/// # Signals
///
/// - `column_header_click(ColumnId)`: a column header was clicked
pub struct GridView {
    this: Weak<GridView>,
    tree: Arc<NativeTree>,
    source: Arc<dyn CellDataSource>,
    columns: Mutex<Vec<ColumnSlot>>,
    handled_events: Mutex<HashSet<GridEvent>>,

    /// Emitted when a column header is clicked.
    pub column_header_click: Signal<ColumnId>,
}

struct ColumnSlot {
    column: GridColumn,
    data_start: usize,
    data_count: usize,
}

impl GridView {
    /// Creates a grid over a data source, with a fresh native tree.
    pub fn new(source: Arc<dyn CellDataSource>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            tree: NativeTree::new(),
            source,
            columns: Mutex::new(Vec::new()),
            handled_events: Mutex::new(HashSet::new()),
            column_header_click: Signal::new(),
        })
    }

    /// The native tree this grid drives.
    pub fn tree(&self) -> &Arc<NativeTree> {
        &self.tree
    }

    /// The data source rows are read from.
    pub fn source(&self) -> &Arc<dyn CellDataSource> {
        &self.source
    }

    fn contract(&self) -> Option<Arc<dyn GridContract>> {
        self.this
            .upgrade()
            .map(|grid| grid as Arc<dyn GridContract>)
    }

    /// Appends a column and attaches it.
    ///
    /// The column's native control joins the tree, then the column is set up
    /// with the next free data index. Returns the column index. If setup
    /// fails, the native control leaves the tree again and the column is not
    /// added.
    pub fn add_column(&self, column: GridColumn) -> Result<usize> {
        let Some(contract) = self.contract() else {
            return Err(GridError::GridDropped);
        };

        let (column_index, data_start) = {
            let columns = self.columns.lock();
            let data_start = columns.last().map_or(0, |slot| slot.data_start + slot.data_count);
            (columns.len(), data_start)
        };

        self.tree.append_column(column.native());
        let data_count = match column.setup_cell(&contract, &self.source, column_index, data_start) {
            Ok(count) => count,
            Err(err) => {
                self.tree.remove_column(column.native());
                tracing::debug!(target: targets::GRID, column_index, %err, "column setup failed, not added");
                return Err(err);
            }
        };

        tracing::debug!(
            target: targets::GRID,
            column_index,
            data_start,
            data_count,
            "column added"
        );

        self.columns.lock().push(ColumnSlot {
            column,
            data_start,
            data_count,
        });
        Ok(column_index)
    }

    /// Re-attaches every column, recomputing data indices from scratch.
    pub fn setup_columns(&self) -> Result<()> {
        let _span = PerfSpan::new("setup_columns");
        let Some(contract) = self.contract() else {
            return Ok(());
        };

        let columns: Vec<GridColumn> = self
            .columns
            .lock()
            .iter()
            .map(|slot| slot.column.clone())
            .collect();

        let mut data_index = 0;
        let mut slots = Vec::with_capacity(columns.len());
        for (column_index, column) in columns.into_iter().enumerate() {
            let data_count = column.setup_cell(&contract, &self.source, column_index, data_index)?;
            slots.push(ColumnSlot {
                column,
                data_start: data_index,
                data_count,
            });
            data_index += data_count;
        }
        *self.columns.lock() = slots;
        Ok(())
    }

    /// Returns the columns in insertion order.
    pub fn columns(&self) -> Vec<GridColumn> {
        self.columns
            .lock()
            .iter()
            .map(|slot| slot.column.clone())
            .collect()
    }

    /// Returns the column with the given id.
    pub fn column(&self, id: ColumnId) -> Option<GridColumn> {
        self.columns
            .lock()
            .iter()
            .find(|slot| slot.column.id() == id)
            .map(|slot| slot.column.clone())
    }

    /// Starts listening to `event` and wires it on every column.
    pub fn handle_event(&self, event: GridEvent) -> Result<()> {
        if !self.handled_events.lock().insert(event) {
            return Ok(());
        }
        tracing::debug!(target: targets::GRID, %event, "grid now handles event");
        for column in self.columns() {
            column.setup_events()?;
        }
        Ok(())
    }

    /// Reads the value shown at `(row, data_column)`.
    ///
    /// The column owning the data column extracts it from the row's item.
    /// Unknown rows and unowned data columns yield `CellValue::Empty`.
    pub fn cell_value(&self, row: usize, data_column: usize) -> CellValue {
        let owner = self
            .columns
            .lock()
            .iter()
            .find(|slot| (slot.data_start..slot.data_start + slot.data_count).contains(&data_column))
            .map(|slot| slot.column.clone());

        match (owner, self.source.item(row)) {
            (Some(column), Some(item)) => column.value(item.as_ref(), data_column, row),
            _ => CellValue::Empty,
        }
    }
}

impl GridContract for GridView {
    fn is_event_handled(&self, event: GridEvent) -> bool {
        self.handled_events.lock().contains(&event)
    }

    fn column_clicked(&self, column: &GridColumn) {
        tracing::trace!(target: targets::GRID, id = ?column.id(), "column header clicked");
        self.column_header_click.emit(column.id());
    }

    fn column_display_index(&self, column: &GridColumn) -> i32 {
        self.tree
            .position(column.native())
            .map_or(-1, |pos| pos as i32)
    }

    fn set_column_display_index(&self, column: &GridColumn, index: i32) {
        let index = index.max(0) as usize;
        if !self.tree.move_column(column.native(), index) {
            tracing::debug!(
                target: targets::GRID,
                id = ?column.id(),
                "column not in tree, display index ignored"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ids_round_trip() {
        for event in GridEvent::ALL {
            assert_eq!(event.id().parse::<GridEvent>().unwrap(), event);
        }
    }

    #[test]
    fn test_unknown_event_id() {
        let err = "row-double-click".parse::<GridEvent>().unwrap_err();
        assert!(matches!(err, GridError::UnsupportedEvent(ref id) if id == "row-double-click"));
    }
}
