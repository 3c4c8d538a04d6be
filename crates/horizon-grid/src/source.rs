//! Data-source abstraction consumed by cell bindings.
//!
//! A grid shows rows of [`DataItem`]s supplied by a [`CellDataSource`]. Cell
//! bindings read named fields from items, write committed edits back through
//! [`DataItem::set_field`], and report editing and formatting activity to the
//! source.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::source::{CellDataSource, ListSource, RecordItem};
//! use horizon_grid::value::CellValue;
//!
//! let source = ListSource::new(vec![
//!     Arc::new(RecordItem::new().with("name", "Alice").with("active", true)),
//! ]);
//!
//! let item = source.item(0).unwrap();
//! assert_eq!(item.field("name"), CellValue::from("Alice"));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use horizon_grid_core::Signal;
use parking_lot::{Mutex, RwLock};

use crate::value::{CellFormat, CellValue};

/// A single row of data, addressed by field name.
pub trait DataItem: Send + Sync {
    /// Returns the value of a field, or `CellValue::Empty` if absent.
    fn field(&self, name: &str) -> CellValue;

    /// Writes a field. Returns `false` if the item is read-only or the field
    /// cannot be written.
    fn set_field(&self, name: &str, value: CellValue) -> bool {
        let _ = (name, value);
        false
    }
}

/// What a cell binding needs from the grid's data source.
pub trait CellDataSource: Send + Sync {
    /// Number of rows.
    fn row_count(&self) -> usize;

    /// The item shown on a row.
    fn item(&self, row: usize) -> Option<Arc<dyn DataItem>>;

    /// An in-place editor opened on `(row, column)`.
    fn begin_cell_editing(&self, row: usize, column: usize) {
        let _ = (row, column);
    }

    /// An edit was committed on `(row, column)`.
    fn end_cell_editing(&self, row: usize, column: usize) {
        let _ = (row, column);
    }

    /// `(row, column)` is about to be drawn; return formatting to apply.
    fn cell_formatting(&self, row: usize, column: usize) -> Option<CellFormat> {
        let _ = (row, column);
        None
    }
}

/// A mutable record of named values.
#[derive(Debug, Default)]
pub struct RecordItem {
    fields: Mutex<BTreeMap<String, CellValue>>,
}

impl RecordItem {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field (builder style).
    pub fn with(self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.lock().insert(name.into(), value.into());
        self
    }
}

impl DataItem for RecordItem {
    fn field(&self, name: &str) -> CellValue {
        self.fields.lock().get(name).cloned().unwrap_or_default()
    }

    fn set_field(&self, name: &str, value: CellValue) -> bool {
        self.fields.lock().insert(name.to_string(), value);
        true
    }
}

/// JSON objects are read-only items. Non-object values have no fields.
impl DataItem for serde_json::Value {
    fn field(&self, name: &str) -> CellValue {
        match self.get(name) {
            None | Some(serde_json::Value::Null) => CellValue::Empty,
            Some(serde_json::Value::Bool(b)) => CellValue::Bool(*b),
            Some(serde_json::Value::Number(n)) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map_or(CellValue::Empty, CellValue::Float),
            },
            Some(serde_json::Value::String(s)) => CellValue::Text(s.clone()),
            Some(other) => CellValue::Text(other.to_string()),
        }
    }
}

type Formatter = Arc<dyn Fn(usize, usize) -> Option<CellFormat> + Send + Sync>;

/// A data source backed by a list of items.
///
/// # Signals
///
/// - `cell_editing((usize, usize))`: an editor opened on `(row, column)`
/// - `cell_edited((usize, usize))`: an edit was committed on `(row, column)`
pub struct ListSource {
    items: RwLock<Vec<Arc<dyn DataItem>>>,
    formatter: RwLock<Option<Formatter>>,

    /// Emitted when an editor opens on `(row, column)`.
    pub cell_editing: Signal<(usize, usize)>,

    /// Emitted when an edit is committed on `(row, column)`.
    pub cell_edited: Signal<(usize, usize)>,
}

impl ListSource {
    /// Creates a source over the given items.
    pub fn new(items: Vec<Arc<dyn DataItem>>) -> Self {
        Self {
            items: RwLock::new(items),
            formatter: RwLock::new(None),
            cell_editing: Signal::new(),
            cell_edited: Signal::new(),
        }
    }

    /// Appends an item.
    pub fn push(&self, item: Arc<dyn DataItem>) {
        self.items.write().push(item);
    }

    /// Installs a formatter consulted for every `(row, column)` before drawing.
    pub fn set_formatter<F>(&self, formatter: F)
    where
        F: Fn(usize, usize) -> Option<CellFormat> + Send + Sync + 'static,
    {
        *self.formatter.write() = Some(Arc::new(formatter));
    }
}

impl CellDataSource for ListSource {
    fn row_count(&self) -> usize {
        self.items.read().len()
    }

    fn item(&self, row: usize) -> Option<Arc<dyn DataItem>> {
        self.items.read().get(row).cloned()
    }

    fn begin_cell_editing(&self, row: usize, column: usize) {
        self.cell_editing.emit((row, column));
    }

    fn end_cell_editing(&self, row: usize, column: usize) {
        self.cell_edited.emit((row, column));
    }

    fn cell_formatting(&self, row: usize, column: usize) -> Option<CellFormat> {
        let formatter = self.formatter.read().clone();
        formatter.and_then(|f| f(row, column))
    }
}
