//! Toolkit-agnostic model of a native tree view.
//!
//! The adapter layer never talks to a real windowing toolkit. Instead it
//! drives the objects in this module, which mirror the shape of a native
//! tree-view control:
//!
//! - [`NativeTree`]: the tree control, owning an ordered list of columns and
//!   accepting redraw and re-layout requests
//! - [`NativeColumn`]: one column, with header state, sizing state, packed
//!   cell renderers and a `clicked` signal
//! - [`CellRenderer`]: one native sub-cell inside a column, bound to data
//!   columns through attributes and emitting editing and formatting signals
//!
//! Widths use the native convention where `-1` means "unset".

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{Property, Signal};
use parking_lot::Mutex;

use crate::value::{CellFormat, CellValue};

/// How a native column computes its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnSizing {
    /// Width follows the content of the visible rows.
    #[default]
    Autosize,
    /// Width is the column's fixed width.
    Fixed,
}

/// The kind of a native cell renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// Renders (and edits) text.
    Text,
    /// Renders a check box.
    Toggle,
    /// Renders an image.
    Pixbuf,
    /// Renders text with a drop-down editor.
    Combo,
}

/// A renderer property that can be bound to a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererAttribute {
    /// Displayed text.
    Text,
    /// Check state.
    Active,
    /// Displayed image.
    Pixbuf,
}

/// A native sub-cell packed into a column.
///
/// # Signals
///
/// - `editing_started(usize)`: an in-place editor opened on a row
/// - `edited((usize, CellValue))`: an edit was committed on a row
/// - `formatting(usize)`: the row is about to be drawn
pub struct CellRenderer {
    kind: RendererKind,
    editable: Property<bool>,
    attributes: Mutex<Vec<(RendererAttribute, usize)>>,
    format: Property<CellFormat>,

    /// Emitted when an in-place editor opens on a row.
    pub editing_started: Signal<usize>,

    /// Emitted when an edit is committed on a row.
    pub edited: Signal<(usize, CellValue)>,

    /// Emitted before a row is drawn.
    pub formatting: Signal<usize>,
}

impl CellRenderer {
    /// Creates a renderer of the given kind.
    pub fn new(kind: RendererKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            editable: Property::new(false),
            attributes: Mutex::new(Vec::new()),
            format: Property::default(),
            editing_started: Signal::new(),
            edited: Signal::new(),
            formatting: Signal::new(),
        })
    }

    /// Returns the renderer kind.
    pub fn kind(&self) -> RendererKind {
        self.kind
    }

    /// Sets whether the renderer accepts in-place edits.
    pub fn set_editable(&self, editable: bool) {
        self.editable.set(editable);
    }

    /// Returns whether the renderer accepts in-place edits.
    pub fn is_editable(&self) -> bool {
        self.editable.get()
    }

    /// Binds a renderer attribute to a data column, replacing any previous
    /// binding of the same attribute.
    pub fn add_attribute(&self, attribute: RendererAttribute, data_column: usize) {
        let mut attributes = self.attributes.lock();
        attributes.retain(|(attr, _)| *attr != attribute);
        attributes.push((attribute, data_column));
    }

    /// Returns the data column bound to an attribute.
    pub fn data_column(&self, attribute: RendererAttribute) -> Option<usize> {
        self.attributes
            .lock()
            .iter()
            .find(|(attr, _)| *attr == attribute)
            .map(|(_, column)| *column)
    }

    /// Returns all attribute bindings.
    pub fn attributes(&self) -> Vec<(RendererAttribute, usize)> {
        self.attributes.lock().clone()
    }

    /// Applies formatting for the next draw.
    pub fn set_format(&self, format: CellFormat) {
        self.format.set(format);
    }

    /// Returns the formatting applied for the next draw.
    pub fn format(&self) -> CellFormat {
        self.format.get()
    }

    /// Simulates the user opening an in-place editor.
    ///
    /// Returns `false` (and emits nothing) if the renderer is not editable.
    pub fn start_editing(&self, row: usize) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.editing_started.emit(row);
        true
    }

    /// Simulates the user committing an edit.
    ///
    /// Returns `false` (and emits nothing) if the renderer is not editable.
    pub fn finish_editing(&self, row: usize, value: CellValue) -> bool {
        if !self.is_editable() {
            return false;
        }
        self.edited.emit((row, value));
        true
    }

    /// Simulates the user clicking a toggle renderer.
    ///
    /// Emits `edited` with the inverted check state. Only toggle renderers
    /// that are editable respond.
    pub fn toggle(&self, row: usize, current: bool) -> bool {
        if self.kind != RendererKind::Toggle || !self.is_editable() {
            return false;
        }
        self.edited.emit((row, CellValue::Bool(!current)));
        true
    }
}

/// A native tree-view column.
///
/// # Signals
///
/// - `clicked(())`: the header was clicked (only while clickable)
pub struct NativeColumn {
    title: Property<String>,
    resizable: Property<bool>,
    clickable: Property<bool>,
    sizing: Property<ColumnSizing>,
    fixed_width: Property<i32>,
    allocated_width: Property<i32>,
    min_width: Property<i32>,
    max_width: Property<i32>,
    visible: Property<bool>,
    expand: Property<bool>,
    xalign: Property<f32>,
    renderers: Mutex<Vec<Arc<CellRenderer>>>,
    tree: Mutex<Weak<NativeTree>>,

    /// Emitted when the header is clicked.
    pub clicked: Signal<()>,
}

impl NativeColumn {
    /// Creates a column with native defaults.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            title: Property::new(String::new()),
            resizable: Property::new(false),
            clickable: Property::new(false),
            sizing: Property::new(ColumnSizing::Autosize),
            fixed_width: Property::new(-1),
            allocated_width: Property::new(0),
            min_width: Property::new(-1),
            max_width: Property::new(-1),
            visible: Property::new(true),
            expand: Property::new(false),
            xalign: Property::new(0.0),
            renderers: Mutex::new(Vec::new()),
            tree: Mutex::new(Weak::new()),
            clicked: Signal::new(),
        })
    }

    /// Header title.
    pub fn title(&self) -> String {
        self.title.get()
    }

    /// Sets the header title.
    pub fn set_title(&self, title: impl Into<String>) {
        self.title.set(title.into());
    }

    /// Whether the user may drag the column edge.
    pub fn resizable(&self) -> bool {
        self.resizable.get()
    }

    /// Allows or forbids user resizing.
    pub fn set_resizable(&self, resizable: bool) {
        self.resizable.set(resizable);
    }

    /// Whether the header reacts to clicks.
    pub fn clickable(&self) -> bool {
        self.clickable.get()
    }

    /// Makes the header clickable.
    pub fn set_clickable(&self, clickable: bool) {
        self.clickable.set(clickable);
    }

    /// Current sizing mode.
    pub fn sizing(&self) -> ColumnSizing {
        self.sizing.get()
    }

    /// Switches the sizing mode.
    pub fn set_sizing(&self, sizing: ColumnSizing) {
        self.sizing.set(sizing);
    }

    /// Width used in fixed sizing, `-1` if never set.
    pub fn fixed_width(&self) -> i32 {
        self.fixed_width.get()
    }

    /// Sets the fixed-sizing width.
    pub fn set_fixed_width(&self, width: i32) {
        self.fixed_width.set(width);
    }

    /// Records the width the tree allocated to this column during layout.
    pub fn set_allocated_width(&self, width: i32) {
        self.allocated_width.set(width);
    }

    /// Returns the current width: the fixed width in fixed mode (when set),
    /// otherwise the width allocated by the last layout.
    pub fn width(&self) -> i32 {
        let fixed = self.fixed_width.get();
        if self.sizing.get() == ColumnSizing::Fixed && fixed >= 0 {
            fixed
        } else {
            self.allocated_width.get()
        }
    }

    /// Minimum width, `-1` when unset.
    pub fn min_width(&self) -> i32 {
        self.min_width.get()
    }

    /// Sets the minimum width.
    pub fn set_min_width(&self, width: i32) {
        self.min_width.set(width);
    }

    /// Maximum width, `-1` when unset.
    pub fn max_width(&self) -> i32 {
        self.max_width.get()
    }

    /// Sets the maximum width.
    pub fn set_max_width(&self, width: i32) {
        self.max_width.set(width);
    }

    /// Whether the column is shown.
    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    /// Shows or hides the column.
    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    /// Whether the column expands into spare width.
    pub fn expand(&self) -> bool {
        self.expand.get()
    }

    /// Sets whether the column expands.
    pub fn set_expand(&self, expand: bool) {
        self.expand.set(expand);
    }

    /// Horizontal header alignment, from `0.0` (left) to `1.0` (right).
    pub fn xalign(&self) -> f32 {
        self.xalign.get()
    }

    /// Sets the header alignment.
    pub fn set_xalign(&self, xalign: f32) {
        self.xalign.set(xalign.clamp(0.0, 1.0));
    }

    /// Packs a renderer at the end of the column.
    pub fn pack_start(&self, renderer: Arc<CellRenderer>) {
        self.renderers.lock().push(renderer);
    }

    /// Returns the packed renderers in packing order.
    pub fn renderers(&self) -> Vec<Arc<CellRenderer>> {
        self.renderers.lock().clone()
    }

    /// Returns the tree this column currently belongs to.
    pub fn tree_view(&self) -> Option<Arc<NativeTree>> {
        self.tree.lock().upgrade()
    }

    fn set_tree(&self, tree: Weak<NativeTree>) {
        *self.tree.lock() = tree;
    }

    /// Simulates a click on the column header.
    ///
    /// Headers only report clicks while clickable. Returns whether the click
    /// was delivered.
    pub fn click(&self) -> bool {
        if !self.clickable() {
            tracing::trace!(target: targets::NATIVE, "header not clickable, ignoring click");
            return false;
        }
        self.clicked.emit(());
        true
    }
}

/// A native tree-view control.
///
/// Columns are kept in display order. Redraw and re-layout requests are
/// counted rather than performed.
pub struct NativeTree {
    columns: Mutex<Vec<Arc<NativeColumn>>>,
    draw_requests: AtomicUsize,
    autosize_requests: AtomicUsize,
}

impl NativeTree {
    /// Creates an empty tree.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            columns: Mutex::new(Vec::new()),
            draw_requests: AtomicUsize::new(0),
            autosize_requests: AtomicUsize::new(0),
        })
    }

    /// Appends a column and links it to this tree. Returns its position.
    pub fn append_column(self: &Arc<Self>, column: &Arc<NativeColumn>) -> usize {
        column.set_tree(Arc::downgrade(self));
        let mut columns = self.columns.lock();
        columns.push(column.clone());
        columns.len() - 1
    }

    /// Removes a column and unlinks it. Returns `false` if it was not present.
    pub fn remove_column(&self, column: &Arc<NativeColumn>) -> bool {
        let mut columns = self.columns.lock();
        match columns.iter().position(|c| Arc::ptr_eq(c, column)) {
            Some(pos) => {
                columns.remove(pos);
                column.set_tree(Weak::new());
                true
            }
            None => false,
        }
    }

    /// Moves a column to a new position, clamped to the column range.
    pub fn move_column(&self, column: &Arc<NativeColumn>, index: usize) -> bool {
        let mut columns = self.columns.lock();
        let Some(pos) = columns.iter().position(|c| Arc::ptr_eq(c, column)) else {
            return false;
        };
        let moved = columns.remove(pos);
        let index = index.min(columns.len());
        columns.insert(index, moved);
        true
    }

    /// Returns the display position of a column.
    pub fn position(&self, column: &Arc<NativeColumn>) -> Option<usize> {
        self.columns
            .lock()
            .iter()
            .position(|c| Arc::ptr_eq(c, column))
    }

    /// Returns the columns in display order.
    pub fn columns(&self) -> Vec<Arc<NativeColumn>> {
        self.columns.lock().clone()
    }

    /// Number of columns in the tree.
    pub fn column_count(&self) -> usize {
        self.columns.lock().len()
    }

    /// Requests a redraw.
    pub fn queue_draw(&self) {
        self.draw_requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of redraw requests received.
    pub fn draw_requests(&self) -> usize {
        self.draw_requests.load(Ordering::SeqCst)
    }

    /// Requests that column widths be recomputed.
    pub fn columns_autosize(&self) {
        self.autosize_requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of re-layout requests received.
    pub fn autosize_requests(&self) -> usize {
        self.autosize_requests.load(Ordering::SeqCst)
    }

    /// Prepares a row for drawing by giving every renderer a chance to
    /// format it.
    pub fn prepare_row(&self, row: usize) {
        let renderers: Vec<Arc<CellRenderer>> = self
            .columns()
            .iter()
            .flat_map(|column| column.renderers())
            .collect();
        for renderer in renderers {
            renderer.formatting.emit(row);
        }
    }
}
