//! GridColumn: the column adapter.
//!
//! [`GridColumn`] maps the abstract grid-column API onto a [`NativeColumn`].
//! Most properties are forwarded straight through; a few carry adapter state
//! of their own:
//!
//! - **Sizing**: a width of [`AUTO_WIDTH`] (`-1`) selects auto sizing, any
//!   other width selects fixed sizing and turns auto-size off
//! - **Width limits**: `0` (min) and `i32::MAX` (max) mean "unset"
//! - **Display index**: settable before the column has a grid; the value is
//!   held back and pushed to the grid once, when the column is attached
//! - **Events**: subscribed lazily, only for events the grid reports interest
//!   in, and never twice
//!
//! # Lifecycle
//!
//! A column starts detached. [`GridColumn::setup_cell`] attaches it to a grid
//! (there is no way back). `GridColumn` is a cheap handle; the adapter lives
//! until the last handle is dropped, at which point its native header-click
//! subscription is released.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::{GridColumn, GridView};
//! use horizon_grid::source::ListSource;
//!
//! let column = GridColumn::new();
//! column.set_header_text("Size");
//! column.set_width(120);
//! assert!(!column.auto_size());
//!
//! // Held back until the column joins a grid.
//! column.set_display_index(0);
//! assert_eq!(column.display_index(), 0);
//!
//! let grid = GridView::new(Arc::new(ListSource::new(vec![])));
//! grid.add_column(column.clone()).unwrap();
//! assert!(column.is_attached());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::ConnectionId;
use parking_lot::Mutex;

use crate::cell::{CellBinding, TextBoxCell};
use crate::error::Result;
use crate::grid::{GridContract, GridEvent};
use crate::native::{ColumnSizing, NativeColumn};
use crate::source::{CellDataSource, DataItem};
use crate::value::{CellValue, TextAlignment};

/// Width sentinel selecting auto sizing.
pub const AUTO_WIDTH: i32 = -1;

/// Minimum width sentinel meaning "no minimum".
pub const UNSET_MIN_WIDTH: i32 = 0;

/// Maximum width sentinel meaning "no maximum".
pub const UNSET_MAX_WIDTH: i32 = i32::MAX;

/// Display index reported by a detached column with nothing pending.
pub const UNSET_DISPLAY_INDEX: i32 = -1;

/// Native width value meaning "unset".
const NATIVE_UNSET: i32 = -1;

static NEXT_COLUMN_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a column adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(u64);

impl ColumnId {
    fn next() -> Self {
        Self(NEXT_COLUMN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

struct ColumnState {
    data_cell: Option<Arc<dyn CellBinding>>,
    auto_size: bool,
    editable: bool,
    cells_added: bool,
    grid: Option<Weak<dyn GridContract>>,
    display_index: Option<i32>,
    header_click: Option<ConnectionId>,
}

struct ColumnInner {
    id: ColumnId,
    control: Arc<NativeColumn>,
    state: Mutex<ColumnState>,
}

impl Drop for ColumnInner {
    fn drop(&mut self) {
        if let Some(id) = self.state.get_mut().header_click.take() {
            self.control.clicked.disconnect(id);
            tracing::trace!(target: targets::COLUMN, id = ?self.id, "header click handler released");
        }
    }
}

/// A grid column adapter.
///
/// Cloning yields another handle to the same column.
#[derive(Clone)]
pub struct GridColumn {
    inner: Arc<ColumnInner>,
}

impl Default for GridColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for GridColumn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for GridColumn {}

impl std::fmt::Debug for GridColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridColumn")
            .field("id", &self.inner.id)
            .field("header_text", &self.header_text())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl GridColumn {
    /// Creates a detached column: auto-sized, resizable, with a text cell.
    pub fn new() -> Self {
        let column = Self {
            inner: Arc::new(ColumnInner {
                id: ColumnId::next(),
                control: NativeColumn::new(),
                state: Mutex::new(ColumnState {
                    data_cell: Some(Arc::new(TextBoxCell::unbound())),
                    auto_size: true,
                    editable: false,
                    cells_added: false,
                    grid: None,
                    display_index: None,
                    header_click: None,
                }),
            }),
        };
        column.set_auto_size(true);
        column.set_resizable(true);
        column
    }

    /// The column's unique id.
    pub fn id(&self) -> ColumnId {
        self.inner.id
    }

    /// The native column this adapter drives.
    pub fn native(&self) -> &Arc<NativeColumn> {
        &self.inner.control
    }

    fn control(&self) -> &NativeColumn {
        &self.inner.control
    }

    /// The owning grid, if attached and still alive.
    fn grid(&self) -> Option<Arc<dyn GridContract>> {
        self.inner.state.lock().grid.as_ref().and_then(Weak::upgrade)
    }

    /// Whether the column has been attached to a grid.
    pub fn is_attached(&self) -> bool {
        self.inner.state.lock().grid.is_some()
    }

    // -------------------------------------------------------------------------
    // Pass-through properties
    // -------------------------------------------------------------------------

    /// Header text.
    pub fn header_text(&self) -> String {
        self.control().title()
    }

    /// Sets the header text.
    pub fn set_header_text(&self, text: impl Into<String>) {
        self.control().set_title(text);
    }

    /// Whether the user may resize the column.
    pub fn resizable(&self) -> bool {
        self.control().resizable()
    }

    /// Allows or forbids user resizing.
    pub fn set_resizable(&self, resizable: bool) {
        self.control().set_resizable(resizable);
    }

    /// Whether clicking the header is reported (native "clickable").
    pub fn sortable(&self) -> bool {
        self.control().clickable()
    }

    /// Enables sorting by header click.
    pub fn set_sortable(&self, sortable: bool) {
        self.control().set_clickable(sortable);
    }

    /// Whether the column is shown.
    pub fn visible(&self) -> bool {
        self.control().visible()
    }

    /// Shows or hides the column.
    pub fn set_visible(&self, visible: bool) {
        self.control().set_visible(visible);
    }

    /// Whether the column takes extra horizontal space.
    pub fn expand(&self) -> bool {
        self.control().expand()
    }

    /// Lets the column take extra horizontal space.
    pub fn set_expand(&self, expand: bool) {
        self.control().set_expand(expand);
    }

    /// Header text alignment.
    pub fn header_alignment(&self) -> TextAlignment {
        TextAlignment::from_xalign(self.control().xalign())
    }

    /// Aligns the header text.
    pub fn set_header_alignment(&self, alignment: TextAlignment) {
        self.control().set_xalign(alignment.to_xalign());
    }

    // -------------------------------------------------------------------------
    // Sizing
    // -------------------------------------------------------------------------

    /// `true` when the column sizes itself to its content.
    pub fn auto_size(&self) -> bool {
        self.inner.state.lock().auto_size
    }

    /// Switches between auto sizing and fixed sizing at the last explicit width.
    pub fn set_auto_size(&self, auto_size: bool) {
        self.inner.state.lock().auto_size = auto_size;
        self.control().set_sizing(sizing_for(auto_size));
        tracing::trace!(target: targets::COLUMN, id = ?self.id(), auto_size, "sizing mode set");
    }

    /// The current native width.
    pub fn width(&self) -> i32 {
        self.control().width()
    }

    /// Sets a fixed width, or auto sizing for [`AUTO_WIDTH`].
    pub fn set_width(&self, width: i32) {
        let auto_size = width == AUTO_WIDTH;
        self.inner.state.lock().auto_size = auto_size;
        self.control().set_fixed_width(width);
        self.control().set_sizing(sizing_for(auto_size));
        tracing::trace!(target: targets::COLUMN, id = ?self.id(), width, auto_size, "width set");
    }

    /// Minimum width, [`UNSET_MIN_WIDTH`] when there is none.
    pub fn min_width(&self) -> i32 {
        match self.control().min_width() {
            NATIVE_UNSET => UNSET_MIN_WIDTH,
            width => width,
        }
    }

    /// Sets the minimum width; `UNSET_MIN_WIDTH` clears it.
    pub fn set_min_width(&self, width: i32) {
        let native = if width == UNSET_MIN_WIDTH { NATIVE_UNSET } else { width };
        self.control().set_min_width(native);
        self.request_relayout();
    }

    /// Maximum width, [`UNSET_MAX_WIDTH`] when there is none.
    pub fn max_width(&self) -> i32 {
        match self.control().max_width() {
            NATIVE_UNSET => UNSET_MAX_WIDTH,
            width => width,
        }
    }

    /// Sets the maximum width; `UNSET_MAX_WIDTH` clears it.
    pub fn set_max_width(&self, width: i32) {
        let native = if width == UNSET_MAX_WIDTH { NATIVE_UNSET } else { width };
        self.control().set_max_width(native);
        self.request_relayout();
    }

    fn request_relayout(&self) {
        if !self.is_attached() {
            return;
        }
        if let Some(tree) = self.control().tree_view() {
            tree.columns_autosize();
        }
    }

    // -------------------------------------------------------------------------
    // Cell binding and editing
    // -------------------------------------------------------------------------

    /// Whether cells in this column accept edits.
    pub fn editable(&self) -> bool {
        self.inner.state.lock().editable
    }

    /// Sets editability, pushes it to the cell and refreshes event wiring.
    pub fn set_editable(&self, editable: bool) -> Result<()> {
        self.inner.state.lock().editable = editable;
        self.set_cell_attributes()
    }

    /// The current cell binding, if any.
    pub fn cell_binding(&self) -> Option<Arc<dyn CellBinding>> {
        self.inner.state.lock().data_cell.clone()
    }

    /// Replaces the cell. Nothing is pushed natively until the next
    /// [`setup_cell`](Self::setup_cell) or editable change.
    pub fn set_cell_binding(&self, cell: Option<Arc<dyn CellBinding>>) {
        self.inner.state.lock().data_cell = cell;
    }

    fn set_cell_attributes(&self) -> Result<()> {
        let (cell, editable) = {
            let state = self.inner.state.lock();
            (state.data_cell.clone(), state.editable)
        };
        let Some(cell) = cell else {
            return Ok(());
        };

        cell.apply_editable(self.control(), editable);
        self.setup_events()?;
        if let Some(tree) = self.control().tree_view() {
            tree.queue_draw();
        }
        Ok(())
    }

    /// Extracts the value shown at `data_column` for `item` on `row`.
    ///
    /// Returns `CellValue::Empty` when no cell is bound.
    pub fn value(&self, item: &dyn DataItem, data_column: usize, row: usize) -> CellValue {
        match self.cell_binding() {
            Some(cell) => cell.extract_value(item, data_column, row),
            None => CellValue::Empty,
        }
    }

    // -------------------------------------------------------------------------
    // Attachment
    // -------------------------------------------------------------------------

    /// Attaches the column to `grid` as column `column_index`, binding its
    /// cell from data column `data_index` on.
    ///
    /// Returns how many data columns the cell consumed; callers add it to
    /// their running data index. Safe to call again: native cells are only
    /// ever registered once.
    ///
    /// The grid is recorded and a held-back display index is pushed before
    /// anything that can fail. If subscribing an event fails, the cell is
    /// still bound and every other event is still attached; the first error
    /// is returned.
    pub fn setup_cell(
        &self,
        grid: &Arc<dyn GridContract>,
        source: &Arc<dyn CellDataSource>,
        column_index: usize,
        data_index: usize,
    ) -> Result<usize> {
        let (cell, register) = {
            let mut state = self.inner.state.lock();
            state.grid = Some(Arc::downgrade(grid));
            let register = state.data_cell.is_some() && !state.cells_added;
            if register {
                state.cells_added = true;
            }
            (state.data_cell.clone(), register)
        };
        tracing::debug!(target: targets::COLUMN, id = ?self.id(), column_index, data_index, "column attached");
        self.reconcile_display_index();

        let mut used = 0;
        let mut wired = Ok(());
        if let Some(cell) = cell {
            if register {
                cell.register_with_column(self.control());
            }
            wired = self.set_cell_attributes();
            used = cell.bind_to_data_source(source, self.control(), column_index, data_index);
        }
        let events = self.setup_events();
        wired.and(events)?;
        Ok(used)
    }

    /// Subscribes every event the grid is interested in.
    ///
    /// Does nothing while detached. Already subscribed events are skipped.
    /// A failing event does not stop the others; the first error is returned.
    pub fn setup_events(&self) -> Result<()> {
        let Some(grid) = self.grid() else {
            return Ok(());
        };
        let mut first_error = None;
        for event in GridEvent::ALL {
            if !grid.is_event_handled(event) {
                continue;
            }
            if let Err(err) = self.attach(event) {
                tracing::debug!(target: targets::COLUMN, id = ?self.id(), %event, %err, "event not attached");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Subscribes an event by its string id.
    ///
    /// Unknown ids fail with [`GridError::UnsupportedEvent`](crate::GridError::UnsupportedEvent).
    pub fn attach_event(&self, id: &str) -> Result<()> {
        self.attach(id.parse()?)
    }

    /// Subscribes an event.
    pub fn attach(&self, event: GridEvent) -> Result<()> {
        match event {
            GridEvent::ColumnHeaderClick => {
                self.attach_header_click();
                Ok(())
            }
            _ => match self.cell_binding() {
                Some(cell) => cell.attach_event(event),
                None => {
                    tracing::trace!(target: targets::COLUMN, id = ?self.id(), %event, "no cell bound, event not attached");
                    Ok(())
                }
            },
        }
    }

    fn attach_header_click(&self) {
        let mut state = self.inner.state.lock();
        if state.header_click.is_some() {
            return;
        }

        let column = Arc::downgrade(&self.inner);
        let id = self.control().clicked.connect(move |_| {
            let Some(inner) = column.upgrade() else {
                tracing::trace!(target: targets::COLUMN, "header clicked after column dropped");
                return;
            };
            let column = GridColumn { inner };
            match column.grid() {
                Some(grid) => grid.column_clicked(&column),
                None => tracing::trace!(target: targets::COLUMN, "header clicked without a live grid"),
            }
        });
        state.header_click = Some(id);
        tracing::trace!(target: targets::COLUMN, id = ?self.id(), "header click handler installed");
    }

    // -------------------------------------------------------------------------
    // Display index
    // -------------------------------------------------------------------------

    /// The column's display position.
    ///
    /// Asks the grid when attached; otherwise returns the pending value, or
    /// [`UNSET_DISPLAY_INDEX`].
    pub fn display_index(&self) -> i32 {
        let (grid, pending) = {
            let state = self.inner.state.lock();
            (state.grid.as_ref().and_then(Weak::upgrade), state.display_index)
        };
        match grid {
            Some(grid) => grid.column_display_index(self),
            None => pending.unwrap_or(UNSET_DISPLAY_INDEX),
        }
    }

    /// Moves the column, or remembers the position until it is attached.
    pub fn set_display_index(&self, index: i32) {
        let grid = {
            let mut state = self.inner.state.lock();
            match state.grid.as_ref() {
                Some(grid) => grid.upgrade(),
                None => {
                    state.display_index = Some(index);
                    return;
                }
            }
        };
        match grid {
            Some(grid) => grid.set_column_display_index(self, index),
            None => tracing::debug!(target: targets::COLUMN, id = ?self.id(), "grid dropped, display index ignored"),
        }
    }

    /// The display index held back while detached.
    pub fn pending_display_index(&self) -> Option<i32> {
        self.inner.state.lock().display_index
    }

    /// Pushes a held-back display index to the grid, once.
    pub fn reconcile_display_index(&self) {
        let (grid, index) = {
            let mut state = self.inner.state.lock();
            let Some(grid) = state.grid.as_ref().and_then(Weak::upgrade) else {
                return;
            };
            let Some(index) = state.display_index.take() else {
                return;
            };
            (grid, index)
        };
        tracing::debug!(target: targets::COLUMN, id = ?self.id(), index, "applying deferred display index");
        grid.set_column_display_index(self, index);
    }
}

fn sizing_for(auto_size: bool) -> ColumnSizing {
    if auto_size {
        ColumnSizing::Autosize
    } else {
        ColumnSizing::Fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::error::GridError;
    use crate::native::NativeTree;
    use crate::source::{ListSource, RecordItem};

    #[derive(Debug, Clone, PartialEq)]
    enum GridCall {
        Clicked(ColumnId),
        GetDisplayIndex(ColumnId),
        SetDisplayIndex(ColumnId, i32),
    }

    #[derive(Default)]
    struct MockGrid {
        handled: Mutex<HashSet<GridEvent>>,
        calls: Mutex<Vec<GridCall>>,
        display_index: Mutex<i32>,
    }

    impl MockGrid {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn handling(events: &[GridEvent]) -> Arc<Self> {
            let grid = Self::new();
            grid.handled.lock().extend(events.iter().copied());
            grid
        }

        fn calls(&self) -> Vec<GridCall> {
            self.calls.lock().clone()
        }
    }

    impl GridContract for MockGrid {
        fn is_event_handled(&self, event: GridEvent) -> bool {
            self.handled.lock().contains(&event)
        }

        fn column_clicked(&self, column: &GridColumn) {
            self.calls.lock().push(GridCall::Clicked(column.id()));
        }

        fn column_display_index(&self, column: &GridColumn) -> i32 {
            self.calls.lock().push(GridCall::GetDisplayIndex(column.id()));
            *self.display_index.lock()
        }

        fn set_column_display_index(&self, column: &GridColumn, index: i32) {
            self.calls.lock().push(GridCall::SetDisplayIndex(column.id(), index));
            *self.display_index.lock() = index;
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum CellCall {
        Register,
        Editable(bool),
        Bind(usize, usize),
        Attach(GridEvent),
    }

    #[derive(Default)]
    struct MockCell {
        calls: Mutex<Vec<CellCall>>,
        reject_events: bool,
    }

    impl MockCell {
        fn rejecting() -> Self {
            Self {
                reject_events: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<CellCall> {
            self.calls.lock().clone()
        }

        fn count(&self, call: &CellCall) -> usize {
            self.calls.lock().iter().filter(|c| *c == call).count()
        }
    }

    impl CellBinding for MockCell {
        fn register_with_column(&self, _column: &NativeColumn) {
            self.calls.lock().push(CellCall::Register);
        }

        fn apply_editable(&self, _column: &NativeColumn, editable: bool) {
            self.calls.lock().push(CellCall::Editable(editable));
        }

        fn bind_to_data_source(
            &self,
            _source: &Arc<dyn CellDataSource>,
            _column: &NativeColumn,
            column_index: usize,
            data_index: usize,
        ) -> usize {
            self.calls.lock().push(CellCall::Bind(column_index, data_index));
            2
        }

        fn extract_value(&self, item: &dyn DataItem, _data_column: usize, _row: usize) -> CellValue {
            item.field("value")
        }

        fn attach_event(&self, event: GridEvent) -> Result<()> {
            self.calls.lock().push(CellCall::Attach(event));
            if self.reject_events {
                return Err(GridError::unsupported_event(event.id()));
            }
            Ok(())
        }
    }

    fn attach(column: &GridColumn, grid: &Arc<MockGrid>) -> usize {
        let grid: Arc<dyn GridContract> = grid.clone();
        let source: Arc<dyn CellDataSource> = Arc::new(ListSource::new(vec![]));
        column.setup_cell(&grid, &source, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let column = GridColumn::new();
        assert!(column.auto_size());
        assert!(column.resizable());
        assert!(!column.sortable());
        assert!(!column.editable());
        assert!(column.visible());
        assert!(column.cell_binding().is_some());
        assert_eq!(column.min_width(), UNSET_MIN_WIDTH);
        assert_eq!(column.max_width(), UNSET_MAX_WIDTH);
        assert_eq!(column.display_index(), UNSET_DISPLAY_INDEX);
        assert!(!column.is_attached());
        assert_ne!(column.id(), GridColumn::new().id());
    }

    #[test]
    fn test_pass_through_properties() {
        let column = GridColumn::new();
        column.set_header_text("Name");
        column.set_sortable(true);
        column.set_resizable(false);
        column.set_expand(true);
        column.set_header_alignment(TextAlignment::Right);

        let native = column.native();
        assert_eq!(native.title(), "Name");
        assert!(native.clickable());
        assert!(!native.resizable());
        assert!(native.expand());
        assert_eq!(native.xalign(), 1.0);
        assert_eq!(column.header_alignment(), TextAlignment::Right);
    }

    #[test]
    fn test_auto_size_tracks_last_sizing_call() {
        let column = GridColumn::new();

        column.set_width(150);
        assert!(!column.auto_size());
        assert_eq!(column.native().sizing(), ColumnSizing::Fixed);
        assert_eq!(column.width(), 150);

        column.set_auto_size(true);
        assert!(column.auto_size());
        assert_eq!(column.native().sizing(), ColumnSizing::Autosize);

        column.set_auto_size(false);
        assert!(!column.auto_size());
        assert_eq!(column.width(), 150);

        column.set_width(AUTO_WIDTH);
        assert!(column.auto_size());
        assert_eq!(column.native().sizing(), ColumnSizing::Autosize);

        column.set_width(80);
        column.set_auto_size(true);
        assert!(column.auto_size());
    }

    #[test]
    fn test_width_limit_sentinels() {
        let column = GridColumn::new();
        column.set_min_width(40);
        column.set_max_width(400);
        assert_eq!(column.native().min_width(), 40);
        assert_eq!(column.max_width(), 400);

        column.set_min_width(UNSET_MIN_WIDTH);
        column.set_max_width(UNSET_MAX_WIDTH);
        assert_eq!(column.native().min_width(), -1);
        assert_eq!(column.native().max_width(), -1);
        assert_eq!(column.min_width(), UNSET_MIN_WIDTH);
        assert_eq!(column.max_width(), UNSET_MAX_WIDTH);
    }

    #[test]
    fn test_width_limits_relayout_only_when_attached() {
        let tree = NativeTree::new();
        let column = GridColumn::new();
        tree.append_column(column.native());

        column.set_min_width(10);
        assert_eq!(tree.autosize_requests(), 0);

        attach(&column, &MockGrid::new());
        column.set_min_width(20);
        column.set_max_width(200);
        assert_eq!(tree.autosize_requests(), 2);
    }

    #[test]
    fn test_second_setup_cell_does_not_reregister() {
        let column = GridColumn::new();
        let cell = Arc::new(MockCell::default());
        column.set_cell_binding(Some(cell.clone()));
        let grid = MockGrid::new();

        assert_eq!(attach(&column, &grid), 2);
        assert_eq!(attach(&column, &grid), 2);

        assert_eq!(cell.count(&CellCall::Register), 1);
        assert_eq!(cell.count(&CellCall::Bind(0, 0)), 2);
    }

    #[test]
    fn test_failed_event_attach_still_binds_and_reconciles() {
        let column = GridColumn::new();
        column.set_sortable(true);
        let cell = Arc::new(MockCell::rejecting());
        column.set_cell_binding(Some(cell.clone()));
        column.set_display_index(0);

        let grid = MockGrid::handling(&[
            GridEvent::CellEditing,
            GridEvent::ColumnHeaderClick,
            GridEvent::CellFormatting,
        ]);
        let contract: Arc<dyn GridContract> = grid.clone();
        let source: Arc<dyn CellDataSource> = Arc::new(ListSource::new(vec![]));
        let err = column.setup_cell(&contract, &source, 0, 0).unwrap_err();

        assert!(matches!(err, GridError::UnsupportedEvent(ref id) if id == "cell-editing-started"));
        assert_eq!(column.pending_display_index(), None);
        assert_eq!(grid.calls(), vec![GridCall::SetDisplayIndex(column.id(), 0)]);
        assert_eq!(cell.count(&CellCall::Bind(0, 0)), 1);
        assert_eq!(cell.count(&CellCall::Attach(GridEvent::CellFormatting)), 2);
        assert_eq!(column.native().clicked.connection_count(), 1);
    }

    #[test]
    fn test_setup_cell_without_cell() {
        let column = GridColumn::new();
        column.set_cell_binding(None);
        assert_eq!(attach(&column, &MockGrid::new()), 0);
        assert!(column.is_attached());
    }

    #[test]
    fn test_setup_cell_order() {
        let column = GridColumn::new();
        let cell = Arc::new(MockCell::default());
        column.set_cell_binding(Some(cell.clone()));
        attach(&column, &MockGrid::handling(&[GridEvent::CellEdited]));

        assert_eq!(
            cell.calls(),
            vec![
                CellCall::Register,
                CellCall::Editable(false),
                CellCall::Attach(GridEvent::CellEdited),
                CellCall::Bind(0, 0),
                CellCall::Attach(GridEvent::CellEdited),
            ]
        );
    }

    #[test]
    fn test_deferred_display_index_applied_once() {
        let column = GridColumn::new();
        column.set_display_index(3);
        assert_eq!(column.display_index(), 3);
        assert_eq!(column.pending_display_index(), Some(3));

        let grid = MockGrid::new();
        attach(&column, &grid);

        let sets: Vec<_> = grid
            .calls()
            .into_iter()
            .filter(|call| matches!(call, GridCall::SetDisplayIndex(..)))
            .collect();
        assert_eq!(sets, vec![GridCall::SetDisplayIndex(column.id(), 3)]);
        assert_eq!(column.pending_display_index(), None);

        column.reconcile_display_index();
        attach(&column, &grid);
        assert_eq!(
            grid.calls()
                .iter()
                .filter(|call| matches!(call, GridCall::SetDisplayIndex(..)))
                .count(),
            1
        );

        assert_eq!(column.display_index(), 3);
        assert_eq!(grid.calls().last(), Some(&GridCall::GetDisplayIndex(column.id())));
    }

    #[test]
    fn test_attached_display_index_delegates() {
        let column = GridColumn::new();
        let grid = MockGrid::new();
        attach(&column, &grid);

        column.set_display_index(5);
        assert_eq!(grid.calls(), vec![GridCall::SetDisplayIndex(column.id(), 5)]);
        assert_eq!(column.pending_display_index(), None);
    }

    #[test]
    fn test_value_without_cell_is_empty() {
        let column = GridColumn::new();
        column.set_cell_binding(None);
        let item = RecordItem::new().with("value", 1);
        assert_eq!(column.value(&item, 0, 0), CellValue::Empty);
        assert_eq!(column.value(&item, 9, 42), CellValue::Empty);
    }

    #[test]
    fn test_value_delegates_to_cell() {
        let column = GridColumn::new();
        column.set_cell_binding(Some(Arc::new(MockCell::default())));
        let item = RecordItem::new().with("value", 1);
        assert_eq!(column.value(&item, 0, 0), CellValue::Int(1));
    }

    #[test]
    fn test_header_click_forwarded_to_grid() {
        let column = GridColumn::new();
        column.set_sortable(true);
        let grid = MockGrid::handling(&[GridEvent::ColumnHeaderClick]);
        attach(&column, &grid);

        column.native().click();
        assert_eq!(grid.calls(), vec![GridCall::Clicked(column.id())]);
    }

    #[test]
    fn test_header_click_after_drop_is_ignored() {
        let column = GridColumn::new();
        column.set_sortable(true);
        let grid = MockGrid::new();
        attach(&column, &grid);
        column.attach_event(GridEvent::ColumnHeaderClick.id()).unwrap();

        let native = column.native().clone();
        drop(column);

        assert!(native.click());
        assert!(grid.calls().is_empty());
    }

    #[test]
    fn test_header_click_after_grid_drop_is_ignored() {
        let column = GridColumn::new();
        column.set_sortable(true);
        let grid = MockGrid::handling(&[GridEvent::ColumnHeaderClick]);
        attach(&column, &grid);
        drop(grid);

        assert!(column.native().click());
        assert!(column.setup_events().is_ok());
    }

    #[test]
    fn test_setup_events_is_idempotent() {
        let column = GridColumn::new();
        let cell = Arc::new(MockCell::default());
        column.set_cell_binding(Some(cell.clone()));
        let grid = MockGrid::handling(&GridEvent::ALL);
        attach(&column, &grid);

        column.setup_events().unwrap();
        column.set_editable(true).unwrap();
        column.set_editable(true).unwrap();

        assert_eq!(column.native().clicked.connection_count(), 1);

        column.native().set_clickable(true);
        column.native().click();
        assert_eq!(grid.calls(), vec![GridCall::Clicked(column.id())]);
    }

    #[test]
    fn test_setup_events_detached_is_noop() {
        let column = GridColumn::new();
        let cell = Arc::new(MockCell::default());
        column.set_cell_binding(Some(cell.clone()));
        column.setup_events().unwrap();
        assert!(cell.calls().is_empty());
        assert_eq!(column.native().clicked.connection_count(), 0);
    }

    #[test]
    fn test_editable_without_interest_subscribes_nothing() {
        let column = GridColumn::new();
        let cell = Arc::new(MockCell::default());
        column.set_cell_binding(Some(cell.clone()));
        attach(&column, &MockGrid::new());

        column.set_editable(true).unwrap();

        assert!(column.editable());
        assert_eq!(cell.count(&CellCall::Editable(true)), 1);
        assert!(!cell.calls().iter().any(|c| matches!(c, CellCall::Attach(_))));
        assert_eq!(column.native().clicked.connection_count(), 0);
    }

    #[test]
    fn test_editable_queues_redraw_in_tree() {
        let tree = NativeTree::new();
        let column = GridColumn::new();
        tree.append_column(column.native());

        column.set_editable(true).unwrap();
        assert_eq!(tree.draw_requests(), 1);

        column.set_cell_binding(None);
        column.set_editable(false).unwrap();
        assert_eq!(tree.draw_requests(), 1);
        assert!(!column.editable());
    }

    #[test]
    fn test_unknown_event_id_is_rejected() {
        let column = GridColumn::new();
        let err = column.attach_event("row-activated").unwrap_err();
        assert!(matches!(err, GridError::UnsupportedEvent(ref id) if id == "row-activated"));
    }

    #[test]
    fn test_cell_event_without_cell_is_noop() {
        let column = GridColumn::new();
        column.set_cell_binding(None);
        assert!(column.attach(GridEvent::CellFormatting).is_ok());
    }
}
