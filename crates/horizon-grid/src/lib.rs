//! Horizon Grid: column adapters for tree-view grids.
//!
//! A [`GridColumn`] sits between a toolkit-independent grid API and a native
//! tree-view column. It forwards presentation properties, owns a pluggable
//! [`CellBinding`](cell::CellBinding) that renders and edits values, and wires
//! native callbacks (header clicks, edits, formatting requests) back to the
//! owning grid, but only for events the grid actually listens to.
//!
//! # Modules
//!
//! - [`column`]: the column adapter
//! - [`cell`]: cell bindings (text, check box, image, combo, custom)
//! - [`grid`]: the grid contract and the [`GridView`] reference host
//! - [`native`]: the native tree-view model columns drive
//! - [`source`]: row data and the data source callbacks cells report to
//! - [`config`]: TOML/JSON column configuration
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::{GridColumn, GridEvent, GridView};
//! use horizon_grid::cell::CheckBoxCell;
//! use horizon_grid::source::{ListSource, RecordItem};
//!
//! let source = Arc::new(ListSource::new(vec![
//!     Arc::new(RecordItem::new().with("done", false)),
//! ]));
//! let grid = GridView::new(source);
//! grid.handle_event(GridEvent::CellEdited).unwrap();
//!
//! let column = GridColumn::new();
//! column.set_header_text("Done");
//! column.set_cell_binding(Some(Arc::new(CheckBoxCell::new("done"))));
//! column.set_editable(true).unwrap();
//! grid.add_column(column.clone()).unwrap();
//!
//! column.native().renderers()[0].toggle(0, false);
//! assert_eq!(grid.cell_value(0, 0), true.into());
//! ```

pub mod cell;
pub mod column;
pub mod config;
pub mod error;
pub mod grid;
pub mod native;
pub mod source;
pub mod value;

pub use cell::{CellBinding, CellKind};
pub use column::{ColumnId, GridColumn};
pub use config::{CellConfig, ColumnConfig, GridConfig};
pub use error::{GridError, Result};
pub use grid::{GridContract, GridEvent, GridView};
pub use value::{CellFormat, CellValue, Color, TextAlignment};
